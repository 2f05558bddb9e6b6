use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{Product, ProductFilter};
use crate::domain::sales::{EditingService, SalesError};

#[derive(Debug, Clone, Default)]
pub struct SearchProductsCommand {
  pub term: Option<String>,
  pub include_inactive: bool,
  pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDto {
  pub id: Uuid,
  pub name: String,
  pub sku: Option<String>,
  pub price: Decimal,
  pub discount_price: Option<Decimal>,
  /// Price a new line item is created with.
  pub selling_price: Decimal,
  pub stock_quantity: i32,
  pub backordered: bool,
  pub is_active: bool,
  pub sizes: Vec<String>,
  pub colors: Vec<String>,
  pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
  fn from(product: Product) -> Self {
    Self {
      selling_price: product.selling_price(),
      backordered: product.is_backordered(),
      id: product.id,
      name: product.name,
      sku: product.sku,
      price: product.price,
      discount_price: product.discount_price,
      stock_quantity: product.stock_quantity,
      is_active: product.is_active,
      sizes: product.sizes,
      colors: product.colors,
      updated_at: product.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchProductsResponse {
  pub products: Vec<ProductDto>,
}

/// Product lookup for the line-item picker
pub struct SearchProductsUseCase {
  editing_service: Arc<EditingService>,
  max_limit: i64,
}

impl SearchProductsUseCase {
  pub fn new(editing_service: Arc<EditingService>, max_limit: i64) -> Self {
    Self {
      editing_service,
      max_limit: max_limit.max(1),
    }
  }

  pub async fn execute(
    &self,
    command: SearchProductsCommand,
  ) -> Result<SearchProductsResponse, SalesError> {
    let limit = command
      .limit
      .unwrap_or(self.max_limit)
      .clamp(1, self.max_limit);

    let filter = ProductFilter {
      term: command.term,
      include_inactive: command.include_inactive,
      limit: Some(limit),
    };

    let products = self.editing_service.search_products(filter).await?;
    Ok(SearchProductsResponse {
      products: products.into_iter().map(ProductDto::from).collect(),
    })
  }
}
