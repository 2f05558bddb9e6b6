use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Product, ProductFilter};
use super::errors::CatalogError;

/// Read side of the product catalog.
///
/// Stock writes are not part of this port: they only happen inside a
/// reconciliation transaction (see `ReconciliationStore`).
#[async_trait]
pub trait CatalogReader: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError>;
  async fn get_stock(&self, id: Uuid) -> Result<i32, CatalogError>;
  async fn search(&self, filter: ProductFilter) -> Result<Vec<Product>, CatalogError>;
}
