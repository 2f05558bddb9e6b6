//! Line-item editor.
//!
//! An [`EditSession`] is the working state of one open editor for an order
//! or an invoice. It never touches storage: every change is kept in memory
//! until the session is turned into a reconciliation plan on save.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::entities::{EditTarget, Invoice, LineItem, LineOrigin, Order, OrderItem};
use super::errors::SalesError;
use super::totals::{DiscountModel, Totals};
use super::value_objects::{DiscountPercent, Quantity};
use crate::domain::catalog::Product;

/// State of an existing item when the session was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Baseline {
  pub quantity: Quantity,
  pub line_total: Decimal,
}

#[derive(Debug, Clone)]
pub struct EditSession {
  id: Uuid,
  target: EditTarget,
  discount_model: DiscountModel,
  items: Vec<LineItem>,
  removed: Vec<LineItem>,
  added: HashSet<Uuid>,
  baseline: HashMap<Uuid, Baseline>,
  stored_totals: Totals,
  opened_at: DateTime<Utc>,
  touched_at: DateTime<Utc>,
}

impl EditSession {
  /// Opens a per-item-discount session over an order's items.
  pub fn for_order(order: &Order, items: &[OrderItem]) -> Self {
    Self::open(
      EditTarget::Order { order_id: order.id },
      DiscountModel::PerItemPercent,
      items,
      order.totals(),
    )
  }

  /// Opens a flat-discount session over the items of the invoice's order.
  ///
  /// An invoice without an order has nothing to edit; pass no items and the
  /// session is read-only.
  pub fn for_invoice(invoice: &Invoice, items: &[OrderItem]) -> Self {
    Self::open(
      EditTarget::Invoice {
        invoice_id: invoice.id,
        order_id: invoice.order_id,
      },
      DiscountModel::flat(invoice.discount_amount),
      items,
      invoice.totals(),
    )
  }

  fn open(
    target: EditTarget,
    discount_model: DiscountModel,
    items: &[OrderItem],
    stored_totals: Totals,
  ) -> Self {
    let items: Vec<LineItem> = items.iter().map(LineItem::from_order_item).collect();
    let baseline = items
      .iter()
      .map(|item| {
        (
          item.id,
          Baseline {
            quantity: item.quantity,
            line_total: item.line_total,
          },
        )
      })
      .collect();

    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      target,
      discount_model,
      items,
      removed: Vec::new(),
      added: HashSet::new(),
      baseline,
      stored_totals,
      opened_at: now,
      touched_at: now,
    }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn target(&self) -> EditTarget {
    self.target
  }

  pub fn discount_model(&self) -> DiscountModel {
    self.discount_model
  }

  pub fn items(&self) -> &[LineItem] {
    &self.items
  }

  pub fn removed(&self) -> &[LineItem] {
    &self.removed
  }

  pub fn added_ids(&self) -> &HashSet<Uuid> {
    &self.added
  }

  pub fn baseline(&self, item_id: Uuid) -> Option<Baseline> {
    self.baseline.get(&item_id).copied()
  }

  pub fn opened_at(&self) -> DateTime<Utc> {
    self.opened_at
  }

  pub fn touched_at(&self) -> DateTime<Utc> {
    self.touched_at
  }

  pub fn touch(&mut self) {
    self.touched_at = Utc::now();
  }

  pub fn is_read_only(&self) -> bool {
    self.target.order_id().is_none()
  }

  /// True when saving would write anything besides the totals.
  pub fn has_item_changes(&self) -> bool {
    !self.removed.is_empty()
      || !self.added.is_empty()
      || self.items.iter().any(|item| {
        self
          .baseline(item.id)
          .is_some_and(|b| b.quantity != item.quantity || b.line_total != item.line_total)
      })
  }

  pub fn totals(&self) -> Totals {
    if self.is_read_only() {
      return self.stored_totals;
    }
    Totals::calculate(&self.items, &self.discount_model)
  }

  pub fn remove_item(&mut self, index: usize) -> Result<LineItem, SalesError> {
    self.ensure_editable()?;
    self.check_index(index)?;

    let mut item = self.items.remove(index);
    match item.origin {
      LineOrigin::Added => {
        self.added.remove(&item.id);
      }
      LineOrigin::Existing | LineOrigin::Removed => {
        item.origin = LineOrigin::Removed;
        self.removed.push(item.clone());
      }
    }
    self.touch();
    Ok(item)
  }

  pub fn add_item(&mut self, product: &Product) -> Result<&LineItem, SalesError> {
    self.ensure_editable()?;
    if !product.is_active {
      return Err(SalesError::ProductInactive(product.id));
    }

    let mut item = LineItem::from_product(product)?;
    item.recompute_total(&self.discount_model);
    self.added.insert(item.id);
    self.items.push(item);
    self.touch();

    let last = self.items.len() - 1;
    Ok(&self.items[last])
  }

  pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<&LineItem, SalesError> {
    self.ensure_editable()?;
    self.check_index(index)?;

    let model = self.discount_model;
    let item = &mut self.items[index];
    item.quantity = Quantity::clamped(quantity);
    item.recompute_total(&model);
    self.touch();
    Ok(&self.items[index])
  }

  pub fn set_discount_percent(
    &mut self,
    index: usize,
    percent: Decimal,
  ) -> Result<&LineItem, SalesError> {
    self.ensure_editable()?;
    if !self.discount_model.is_per_item() {
      return Err(SalesError::DiscountModelMismatch(
        "Invoices take a single flat discount, not per-item percentages".to_string(),
      ));
    }
    self.check_index(index)?;

    let model = self.discount_model;
    let item = &mut self.items[index];
    item.discount_percent = DiscountPercent::clamped(percent);
    item.recompute_total(&model);
    self.touch();
    Ok(&self.items[index])
  }

  pub fn set_flat_discount(&mut self, amount: Decimal) -> Result<(), SalesError> {
    self.ensure_editable()?;
    if self.discount_model.is_per_item() {
      return Err(SalesError::DiscountModelMismatch(
        "Orders take per-item discount percentages, not a flat amount".to_string(),
      ));
    }
    self.discount_model = DiscountModel::flat(amount);
    self.touch();
    Ok(())
  }

  fn ensure_editable(&self) -> Result<(), SalesError> {
    match self.target {
      EditTarget::Invoice {
        invoice_id,
        order_id: None,
      } => Err(SalesError::ReadOnlySession(invoice_id)),
      _ => Ok(()),
    }
  }

  fn check_index(&self, index: usize) -> Result<(), SalesError> {
    if index >= self.items.len() {
      return Err(SalesError::LineItemIndexOutOfRange {
        index,
        len: self.items.len(),
      });
    }
    Ok(())
  }
}
