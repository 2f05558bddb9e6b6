use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("Invalid product: {0}")]
  InvalidProduct(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Repository error: {0}")]
  Repository(String),
}
