use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogReader, Product, ProductFilter};

/// PostgreSQL implementation of the CatalogReader trait
pub struct PostgresProductRepository {
  pool: PgPool,
  default_limit: i64,
}

impl PostgresProductRepository {
  /// `default_limit` bounds searches that do not ask for a limit.
  pub fn new(pool: PgPool, default_limit: i64) -> Self {
    Self {
      pool,
      default_limit,
    }
  }
}

/// Database row structure for products table
#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  sku: Option<String>,
  price: Decimal,
  discount_price: Option<Decimal>,
  stock_quantity: i32,
  is_active: bool,
  sizes: Vec<String>,
  colors: Vec<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      sku: row.sku,
      price: row.price,
      discount_price: row.discount_price,
      stock_quantity: row.stock_quantity,
      is_active: row.is_active,
      sizes: row.sizes,
      colors: row.colors,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl CatalogReader for PostgresProductRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    let row = sqlx::query_as::<_, ProductRow>(
      r#"
            SELECT id, name, sku, price, discount_price, stock_quantity,
                   is_active, sizes, colors, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn get_stock(&self, id: Uuid) -> Result<i32, CatalogError> {
    let stock: Option<i32> =
      sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

    stock.ok_or(CatalogError::ProductNotFound(id))
  }

  async fn search(&self, filter: ProductFilter) -> Result<Vec<Product>, CatalogError> {
    let pattern = filter.normalized_term().map(|term| {
      let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
      format!("%{escaped}%")
    });
    let limit = filter.limit.unwrap_or(self.default_limit).max(0);

    let rows = sqlx::query_as::<_, ProductRow>(
      r#"
            SELECT id, name, sku, price, discount_price, stock_quantity,
                   is_active, sizes, colors, created_at, updated_at
            FROM products
            WHERE ($1::text IS NULL OR name ILIKE $1 OR sku ILIKE $1)
              AND ($2 OR is_active)
            ORDER BY name ASC, id ASC
            LIMIT $3
            "#,
    )
    .bind(pattern)
    .bind(filter.include_inactive)
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }
}
