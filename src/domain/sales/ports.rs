use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Invoice, Order, OrderItem};
use super::errors::SalesError;
use super::reconciliation::{ReconciliationOutcome, ReconciliationPlan, StockPolicy};

#[async_trait]
pub trait OrderRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, SalesError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, SalesError>;
  async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<Invoice>, SalesError>;
}

#[async_trait]
pub trait OrderItemRepository: Send + Sync {
  async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<OrderItem>, SalesError>;
}

/// Applies a reconciliation plan as one unit.
///
/// Implementations must either apply every step of the plan or none of
/// them, and must adjust stock with relative updates so that concurrent
/// writers of the same product never lose each other's changes.
#[async_trait]
pub trait ReconciliationStore: Send + Sync {
  async fn apply(
    &self,
    plan: &ReconciliationPlan,
    policy: StockPolicy,
  ) -> Result<ReconciliationOutcome, SalesError>;
}
