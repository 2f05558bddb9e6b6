use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dto::OrderItemDto;
use crate::domain::sales::{EditingService, SalesError};

#[derive(Debug, Clone)]
pub struct GetInvoiceDetailsCommand {
  pub invoice_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetailsResponse {
  pub id: Uuid,
  pub invoice_number: String,
  pub order_id: Option<Uuid>,
  /// Items of the linked order; empty when the invoice has none.
  pub items: Vec<OrderItemDto>,
  pub subtotal: Decimal,
  pub discount_amount: Decimal,
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct GetInvoiceDetailsUseCase {
  editing_service: Arc<EditingService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(editing_service: Arc<EditingService>) -> Self {
    Self { editing_service }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceDetailsCommand,
  ) -> Result<InvoiceDetailsResponse, SalesError> {
    let (invoice, items) = self
      .editing_service
      .get_invoice_with_details(command.invoice_id)
      .await?;

    Ok(InvoiceDetailsResponse {
      id: invoice.id,
      invoice_number: invoice.invoice_number,
      order_id: invoice.order_id,
      items: items.into_iter().map(OrderItemDto::from).collect(),
      subtotal: invoice.subtotal,
      discount_amount: invoice.discount_amount,
      total_amount: invoice.total_amount,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
    })
  }
}
