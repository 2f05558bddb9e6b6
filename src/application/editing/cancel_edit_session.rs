use std::sync::Arc;
use uuid::Uuid;

use super::session_registry::EditSessionRegistry;
use crate::domain::sales::SalesError;

#[derive(Debug, Clone)]
pub struct CancelEditSessionCommand {
  pub session_id: Uuid,
}

/// Discards a session without writing anything
pub struct CancelEditSessionUseCase {
  registry: Arc<EditSessionRegistry>,
}

impl CancelEditSessionUseCase {
  pub fn new(registry: Arc<EditSessionRegistry>) -> Self {
    Self { registry }
  }

  pub async fn execute(&self, command: CancelEditSessionCommand) -> Result<(), SalesError> {
    self.registry.remove(command.session_id).await?;
    tracing::info!(session_id = %command.session_id, "Edit session cancelled");
    Ok(())
  }
}
