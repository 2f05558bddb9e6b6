use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::dto::EditSessionView;
use super::session_registry::EditSessionRegistry;
use crate::domain::sales::SalesError;

#[derive(Debug, Clone)]
pub struct SetInvoiceDiscountCommand {
  pub session_id: Uuid,
  pub amount: Decimal,
}

/// Replaces the flat discount of an invoice session
pub struct SetInvoiceDiscountUseCase {
  registry: Arc<EditSessionRegistry>,
}

impl SetInvoiceDiscountUseCase {
  pub fn new(registry: Arc<EditSessionRegistry>) -> Self {
    Self { registry }
  }

  pub async fn execute(
    &self,
    command: SetInvoiceDiscountCommand,
  ) -> Result<EditSessionView, SalesError> {
    let mut session = self.registry.lock(command.session_id).await?;
    session.set_flat_discount(command.amount)?;
    Ok(EditSessionView::from(&*session))
  }
}
