use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dto::EditSessionView;
use super::session_registry::EditSessionRegistry;
use crate::domain::sales::{EditingService, SalesError};

/// What kind of record the session edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditTargetKind {
  Order,
  Invoice,
}

#[derive(Debug, Clone)]
pub struct OpenEditSessionCommand {
  pub target: EditTargetKind,
  /// Order id or invoice id, depending on `target`.
  pub id: Uuid,
}

/// Opens an editor over an order's or an invoice's line items
pub struct OpenEditSessionUseCase {
  editing_service: Arc<EditingService>,
  registry: Arc<EditSessionRegistry>,
}

impl OpenEditSessionUseCase {
  pub fn new(editing_service: Arc<EditingService>, registry: Arc<EditSessionRegistry>) -> Self {
    Self {
      editing_service,
      registry,
    }
  }

  pub async fn execute(
    &self,
    command: OpenEditSessionCommand,
  ) -> Result<EditSessionView, SalesError> {
    let session = match command.target {
      EditTargetKind::Order => self.editing_service.open_order_session(command.id).await?,
      EditTargetKind::Invoice => {
        self
          .editing_service
          .open_invoice_session(command.id)
          .await?
      }
    };

    let view = EditSessionView::from(&session);
    self.registry.insert(session).await;

    tracing::info!(
      session_id = %view.session_id,
      target = ?command.target,
      id = %command.id,
      "Edit session opened"
    );
    Ok(view)
  }
}
