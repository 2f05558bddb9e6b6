use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dto::{InvoiceSummaryDto, OrderItemDto};
use crate::domain::sales::{EditingService, SalesError};

#[derive(Debug, Clone)]
pub struct GetOrderDetailsCommand {
  pub order_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetailsResponse {
  pub id: Uuid,
  pub order_number: String,
  pub customer_name: String,
  pub items: Vec<OrderItemDto>,
  pub subtotal: Decimal,
  pub discount_amount: Decimal,
  pub total_amount: Decimal,
  pub invoices: Vec<InvoiceSummaryDto>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct GetOrderDetailsUseCase {
  editing_service: Arc<EditingService>,
}

impl GetOrderDetailsUseCase {
  pub fn new(editing_service: Arc<EditingService>) -> Self {
    Self { editing_service }
  }

  pub async fn execute(
    &self,
    command: GetOrderDetailsCommand,
  ) -> Result<OrderDetailsResponse, SalesError> {
    let (order, items, invoices) = self
      .editing_service
      .get_order_with_details(command.order_id)
      .await?;

    Ok(OrderDetailsResponse {
      id: order.id,
      order_number: order.order_number,
      customer_name: order.customer_name,
      items: items.into_iter().map(OrderItemDto::from).collect(),
      subtotal: order.subtotal,
      discount_amount: order.discount_amount,
      total_amount: order.total_amount,
      invoices: invoices.into_iter().map(InvoiceSummaryDto::from).collect(),
      created_at: order.created_at,
      updated_at: order.updated_at,
    })
  }
}
