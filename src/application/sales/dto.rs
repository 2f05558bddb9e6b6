use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::sales::{Invoice, OrderItem};

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDto {
  pub id: Uuid,
  pub product_id: Option<Uuid>,
  pub product_name: String,
  pub product_sku: Option<String>,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub total_price: Decimal,
  pub size: Option<String>,
  pub color: Option<String>,
}

impl From<OrderItem> for OrderItemDto {
  fn from(item: OrderItem) -> Self {
    Self {
      id: item.id,
      product_id: item.product_id,
      product_name: item.product_name,
      product_sku: item.product_sku,
      quantity: item.quantity.value(),
      unit_price: item.unit_price.value(),
      total_price: item.total_price,
      size: item.size,
      color: item.color,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSummaryDto {
  pub id: Uuid,
  pub invoice_number: String,
  pub subtotal: Decimal,
  pub discount_amount: Decimal,
  pub total_amount: Decimal,
  pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceSummaryDto {
  fn from(invoice: Invoice) -> Self {
    Self {
      id: invoice.id,
      invoice_number: invoice.invoice_number,
      subtotal: invoice.subtotal,
      discount_amount: invoice.discount_amount,
      total_amount: invoice.total_amount,
      updated_at: invoice.updated_at,
    }
  }
}
