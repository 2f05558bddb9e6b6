use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::dto::EditSessionView;
use super::session_registry::EditSessionRegistry;
use crate::domain::sales::SalesError;

#[derive(Debug, Clone)]
pub struct UpdateLineItemCommand {
  pub session_id: Uuid,
  pub index: usize,
  /// Clamped to at least 1.
  pub quantity: Option<i64>,
  /// Clamped to [0, 100]. Orders only.
  pub discount_percent: Option<Decimal>,
}

pub struct UpdateLineItemUseCase {
  registry: Arc<EditSessionRegistry>,
}

impl UpdateLineItemUseCase {
  pub fn new(registry: Arc<EditSessionRegistry>) -> Self {
    Self { registry }
  }

  pub async fn execute(
    &self,
    command: UpdateLineItemCommand,
  ) -> Result<EditSessionView, SalesError> {
    let mut session = self.registry.lock(command.session_id).await?;

    // Work on a copy so a rejected discount does not leave a half-applied quantity.
    let mut working = session.clone();
    if let Some(quantity) = command.quantity {
      working.set_quantity(command.index, quantity)?;
    }
    if let Some(percent) = command.discount_percent {
      working.set_discount_percent(command.index, percent)?;
    }
    *session = working;

    Ok(EditSessionView::from(&*session))
  }
}
