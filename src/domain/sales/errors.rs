use super::value_objects::ValueObjectError;
use crate::domain::catalog::CatalogError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SalesError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Order not found: {0}")]
  OrderNotFound(Uuid),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("Order {0} has no line items")]
  NoLineItems(Uuid),

  #[error("Edit session not found: {0}")]
  EditSessionNotFound(Uuid),

  #[error("Line item index {index} out of range ({len} items)")]
  LineItemIndexOutOfRange { index: usize, len: usize },

  #[error("Operation not available for this discount model: {0}")]
  DiscountModelMismatch(String),

  #[error("Invoice {0} is not linked to an order; its items are read-only")]
  ReadOnlySession(Uuid),

  #[error("Product {0} is inactive")]
  ProductInactive(Uuid),

  #[error("Line item {0} was changed by someone else")]
  StaleLineItem(Uuid),

  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  InsufficientStock {
    product_id: Uuid,
    requested: i32,
    available: i32,
  },

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl From<CatalogError> for SalesError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::ProductNotFound(id) => SalesError::ProductNotFound(id),
      CatalogError::Database(e) => SalesError::Database(e),
      CatalogError::InvalidProduct(msg) | CatalogError::Repository(msg) => {
        SalesError::Repository(msg)
      }
    }
  }
}
