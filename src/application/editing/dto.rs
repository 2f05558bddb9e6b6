use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::sales::{
  DiscountModel, EditSession, EditTarget, LineItem, LineOrigin, ReconciliationOutcome, Totals,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsDto {
  pub subtotal: Decimal,
  pub discount_total: Decimal,
  pub total: Decimal,
}

impl From<Totals> for TotalsDto {
  fn from(totals: Totals) -> Self {
    Self {
      subtotal: totals.subtotal,
      discount_total: totals.discount_total,
      total: totals.total,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemDto {
  /// Position in the visible list; what item operations address.
  pub index: Option<usize>,
  pub id: Uuid,
  pub product_id: Option<Uuid>,
  pub name: String,
  pub sku: Option<String>,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub discount_percent: Decimal,
  pub line_total: Decimal,
  pub size: Option<String>,
  pub color: Option<String>,
  pub origin: LineOrigin,
}

impl LineItemDto {
  fn from_item(index: Option<usize>, item: &LineItem) -> Self {
    Self {
      index,
      id: item.id,
      product_id: item.product_id,
      name: item.name.clone(),
      sku: item.sku.clone(),
      quantity: item.quantity.value(),
      unit_price: item.unit_price.value(),
      discount_percent: item.discount_percent.value(),
      line_total: item.line_total,
      size: item.size.clone(),
      color: item.color.clone(),
      origin: item.origin,
    }
  }
}

/// Snapshot of an open edit session.
#[derive(Debug, Clone, Serialize)]
pub struct EditSessionView {
  pub session_id: Uuid,
  pub target: EditTarget,
  pub discount_model: DiscountModel,
  pub read_only: bool,
  pub has_changes: bool,
  pub items: Vec<LineItemDto>,
  pub removed: Vec<LineItemDto>,
  pub totals: TotalsDto,
  pub opened_at: DateTime<Utc>,
  pub touched_at: DateTime<Utc>,
}

impl From<&EditSession> for EditSessionView {
  fn from(session: &EditSession) -> Self {
    Self {
      session_id: session.id(),
      target: session.target(),
      discount_model: session.discount_model(),
      read_only: session.is_read_only(),
      has_changes: session.has_item_changes(),
      items: session
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| LineItemDto::from_item(Some(i), item))
        .collect(),
      removed: session
        .removed()
        .iter()
        .map(|item| LineItemDto::from_item(None, item))
        .collect(),
      totals: session.totals().into(),
      opened_at: session.opened_at(),
      touched_at: session.touched_at(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockLevelDto {
  pub product_id: Uuid,
  pub stock_quantity: i32,
  pub backordered: bool,
}

/// Result of a committed session.
#[derive(Debug, Clone, Serialize)]
pub struct SaveEditSessionResponse {
  pub session_id: Uuid,
  pub target: EditTarget,
  pub totals: TotalsDto,
  pub stock_levels: Vec<StockLevelDto>,
}

impl SaveEditSessionResponse {
  pub fn new(session_id: Uuid, target: EditTarget, outcome: ReconciliationOutcome) -> Self {
    Self {
      session_id,
      target,
      totals: outcome.totals.into(),
      stock_levels: outcome
        .stock_levels
        .into_iter()
        .map(|level| StockLevelDto {
          product_id: level.product_id,
          stock_quantity: level.stock_quantity,
          backordered: level.stock_quantity < 0,
        })
        .collect(),
    }
  }
}
