use std::sync::Arc;
use uuid::Uuid;

use super::dto::EditSessionView;
use super::session_registry::EditSessionRegistry;
use crate::domain::sales::SalesError;

#[derive(Debug, Clone)]
pub struct RemoveLineItemCommand {
  pub session_id: Uuid,
  pub index: usize,
}

pub struct RemoveLineItemUseCase {
  registry: Arc<EditSessionRegistry>,
}

impl RemoveLineItemUseCase {
  pub fn new(registry: Arc<EditSessionRegistry>) -> Self {
    Self { registry }
  }

  pub async fn execute(
    &self,
    command: RemoveLineItemCommand,
  ) -> Result<EditSessionView, SalesError> {
    let mut session = self.registry.lock(command.session_id).await?;
    let removed = session.remove_item(command.index)?;

    tracing::debug!(
      session_id = %command.session_id,
      item_id = %removed.id,
      origin = ?removed.origin,
      "Line item removed"
    );
    Ok(EditSessionView::from(&*session))
  }
}
