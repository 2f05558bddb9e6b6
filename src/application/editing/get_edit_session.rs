use std::sync::Arc;
use uuid::Uuid;

use super::dto::EditSessionView;
use super::session_registry::EditSessionRegistry;
use crate::domain::sales::SalesError;

#[derive(Debug, Clone)]
pub struct GetEditSessionCommand {
  pub session_id: Uuid,
}

pub struct GetEditSessionUseCase {
  registry: Arc<EditSessionRegistry>,
}

impl GetEditSessionUseCase {
  pub fn new(registry: Arc<EditSessionRegistry>) -> Self {
    Self { registry }
  }

  pub async fn execute(
    &self,
    command: GetEditSessionCommand,
  ) -> Result<EditSessionView, SalesError> {
    let session = self.registry.lock(command.session_id).await?;
    Ok(EditSessionView::from(&*session))
  }
}
