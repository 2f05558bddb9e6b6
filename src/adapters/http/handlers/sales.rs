use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::{adapters::http::errors::ApiError, application::sales::*};

/// Get an order with its items and linked invoices
/// GET /api/v1/orders/:order_id
pub async fn get_order_details_handler(
  order_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetOrderDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetOrderDetailsCommand {
    order_id: *order_id,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(response))
}

/// Get an invoice with the items of its order
/// GET /api/v1/invoices/:invoice_id
pub async fn get_invoice_details_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetInvoiceDetailsCommand {
    invoice_id: *invoice_id,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(response))
}
