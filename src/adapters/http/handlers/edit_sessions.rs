use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{
      AddLineItemRequest, OpenEditSessionRequest, SetDiscountRequest, SuccessResponse,
      UpdateLineItemRequest,
    },
    errors::ApiError,
    middleware::RequestIdExt,
  },
  application::editing::*,
};

/// Open an edit session
/// POST /api/v1/edit-sessions
pub async fn open_edit_session_handler(
  request: web::Json<OpenEditSessionRequest>,
  use_case: web::Data<Arc<OpenEditSessionUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = OpenEditSessionCommand {
    target: request.target,
    id: request.id,
  };

  let view = use_case.execute(command).await?;

  tracing::debug!(
    request_id = ?http_req.request_id().map(|r| r.value()),
    session_id = %view.session_id,
    "Opened edit session over HTTP"
  );

  Ok(
    HttpResponse::Created()
      .insert_header((
        "Location",
        format!("/api/v1/edit-sessions/{}", view.session_id),
      ))
      .json(view),
  )
}

/// Current state of an edit session
/// GET /api/v1/edit-sessions/:session_id
pub async fn get_edit_session_handler(
  session_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetEditSessionUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetEditSessionCommand {
    session_id: *session_id,
  };

  let view = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(view))
}

/// Discard an edit session
/// DELETE /api/v1/edit-sessions/:session_id
pub async fn cancel_edit_session_handler(
  session_id: web::Path<Uuid>,
  use_case: web::Data<Arc<CancelEditSessionUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = CancelEditSessionCommand {
    session_id: *session_id,
  };

  use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Edit session discarded".to_string(),
  }))
}

/// Add a product as a new line
/// POST /api/v1/edit-sessions/:session_id/items
pub async fn add_line_item_handler(
  session_id: web::Path<Uuid>,
  request: web::Json<AddLineItemRequest>,
  use_case: web::Data<Arc<AddLineItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = AddLineItemCommand {
    session_id: *session_id,
    product_id: request.product_id,
  };

  let view = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(view))
}

/// Change a line's quantity and/or discount percent
/// PATCH /api/v1/edit-sessions/:session_id/items/:index
pub async fn update_line_item_handler(
  path: web::Path<(Uuid, usize)>,
  request: web::Json<UpdateLineItemRequest>,
  use_case: web::Data<Arc<UpdateLineItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let (session_id, index) = path.into_inner();
  let request = request.into_inner();
  let command = UpdateLineItemCommand {
    session_id,
    index,
    quantity: request.quantity,
    discount_percent: request.discount_percent,
  };

  let view = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(view))
}

/// Remove a line
/// DELETE /api/v1/edit-sessions/:session_id/items/:index
pub async fn remove_line_item_handler(
  path: web::Path<(Uuid, usize)>,
  use_case: web::Data<Arc<RemoveLineItemUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let (session_id, index) = path.into_inner();
  let command = RemoveLineItemCommand { session_id, index };

  let view = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(view))
}

/// Set an invoice session's flat discount
/// PUT /api/v1/edit-sessions/:session_id/discount
pub async fn set_invoice_discount_handler(
  session_id: web::Path<Uuid>,
  request: web::Json<SetDiscountRequest>,
  use_case: web::Data<Arc<SetInvoiceDiscountUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = SetInvoiceDiscountCommand {
    session_id: *session_id,
    amount: request.amount,
  };

  let view = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(view))
}

/// Commit a session
/// POST /api/v1/edit-sessions/:session_id/save
pub async fn save_edit_session_handler(
  session_id: web::Path<Uuid>,
  use_case: web::Data<Arc<SaveEditSessionUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let session_id = session_id.into_inner();
  let command = SaveEditSessionCommand { session_id };

  let response = use_case.execute(command).await.inspect_err(|e| {
    tracing::warn!(
      request_id = ?http_req.request_id().map(|r| r.value()),
      %session_id,
      error = %e,
      "Edit session save failed"
    );
  })?;

  Ok(HttpResponse::Ok().json(response))
}
