use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::CatalogError;

// Product - Sellable catalog entry with its stock counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub sku: Option<String>,
  pub price: Decimal,
  pub discount_price: Option<Decimal>,
  pub stock_quantity: i32,
  pub is_active: bool,
  pub sizes: Vec<String>,
  pub colors: Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  pub fn new(
    name: String,
    sku: Option<String>,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock_quantity: i32,
  ) -> Result<Self, CatalogError> {
    let name = name.trim().to_string();
    if name.is_empty() {
      return Err(CatalogError::InvalidProduct(
        "Product name cannot be empty".to_string(),
      ));
    }
    if price.is_sign_negative() {
      return Err(CatalogError::InvalidProduct(
        "Price cannot be negative".to_string(),
      ));
    }
    if discount_price.is_some_and(|p| p.is_sign_negative()) {
      return Err(CatalogError::InvalidProduct(
        "Discount price cannot be negative".to_string(),
      ));
    }

    let now = Utc::now();
    Ok(Self {
      id: Uuid::new_v4(),
      name,
      sku: sku.filter(|s| !s.trim().is_empty()),
      price,
      discount_price,
      stock_quantity,
      is_active: true,
      sizes: Vec::new(),
      colors: Vec::new(),
      created_at: now,
      updated_at: now,
    })
  }

  /// Price a new line item is sold at: the discount price when one is set.
  pub fn selling_price(&self) -> Decimal {
    self.discount_price.unwrap_or(self.price)
  }

  pub fn deactivate(&mut self) {
    self.is_active = false;
    self.updated_at = Utc::now();
  }

  pub fn is_backordered(&self) -> bool {
    self.stock_quantity < 0
  }
}

/// Filter for catalog searches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
  pub term: Option<String>,
  pub include_inactive: bool,
  pub limit: Option<i64>,
}

impl ProductFilter {
  pub fn search(term: impl Into<String>) -> Self {
    Self {
      term: Some(term.into()),
      ..Self::default()
    }
  }

  /// Normalized search term, `None` when blank.
  pub fn normalized_term(&self) -> Option<String> {
    self
      .term
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_lowercase)
  }

  pub fn matches(&self, product: &Product) -> bool {
    if !self.include_inactive && !product.is_active {
      return false;
    }
    match self.normalized_term() {
      None => true,
      Some(term) => {
        product.name.to_lowercase().contains(&term)
          || product
            .sku
            .as_deref()
            .is_some_and(|sku| sku.to_lowercase().contains(&term))
      }
    }
  }
}
