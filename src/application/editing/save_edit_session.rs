use std::sync::Arc;
use uuid::Uuid;

use super::dto::SaveEditSessionResponse;
use super::session_registry::EditSessionRegistry;
use crate::domain::sales::{EditingService, SalesError};

#[derive(Debug, Clone)]
pub struct SaveEditSessionCommand {
  pub session_id: Uuid,
}

/// Commits a session's changes and closes it.
///
/// A failed save writes nothing and keeps the session open, so the caller
/// can adjust it and retry or cancel.
pub struct SaveEditSessionUseCase {
  editing_service: Arc<EditingService>,
  registry: Arc<EditSessionRegistry>,
}

impl SaveEditSessionUseCase {
  pub fn new(editing_service: Arc<EditingService>, registry: Arc<EditSessionRegistry>) -> Self {
    Self {
      editing_service,
      registry,
    }
  }

  pub async fn execute(
    &self,
    command: SaveEditSessionCommand,
  ) -> Result<SaveEditSessionResponse, SalesError> {
    let session = self.registry.lock(command.session_id).await?;

    let outcome = self.editing_service.save(&session).await?;
    let response = SaveEditSessionResponse::new(session.id(), session.target(), outcome);

    // Unregister before releasing the lock so a queued save finds nothing to replay.
    // Already gone if it was cancelled while the save ran.
    let _ = self.registry.remove(command.session_id).await;
    drop(session);

    tracing::info!(
      session_id = %command.session_id,
      total = %response.totals.total,
      "Edit session saved"
    );
    Ok(response)
  }
}
