use std::sync::Arc;
use uuid::Uuid;

use super::dto::EditSessionView;
use super::session_registry::EditSessionRegistry;
use crate::domain::sales::{EditingService, SalesError};

#[derive(Debug, Clone)]
pub struct AddLineItemCommand {
  pub session_id: Uuid,
  pub product_id: Uuid,
}

/// Appends a catalog product to the session as a new line of quantity 1
pub struct AddLineItemUseCase {
  editing_service: Arc<EditingService>,
  registry: Arc<EditSessionRegistry>,
}

impl AddLineItemUseCase {
  pub fn new(editing_service: Arc<EditingService>, registry: Arc<EditSessionRegistry>) -> Self {
    Self {
      editing_service,
      registry,
    }
  }

  pub async fn execute(&self, command: AddLineItemCommand) -> Result<EditSessionView, SalesError> {
    let mut session = self.registry.lock(command.session_id).await?;
    let product = self
      .editing_service
      .find_product(command.product_id)
      .await?;

    let item_id = session.add_item(&product)?.id;

    tracing::debug!(
      session_id = %command.session_id,
      product_id = %product.id,
      %item_id,
      "Line item added"
    );
    Ok(EditSessionView::from(&*session))
  }
}
