//! Translation of a finished edit session into storage effects.
//!
//! The plan lists, in application order, every item row to delete, insert
//! and update, the net stock adjustment per product, and the totals to
//! write on the aggregate. Applying it is the job of a
//! [`ReconciliationStore`](super::ports::ReconciliationStore), which must do
//! so atomically.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::entities::{EditTarget, LineOrigin, OrderItem};
use super::errors::SalesError;
use super::session::EditSession;
use super::totals::Totals;
use super::value_objects::{Quantity, UnitPrice};

/// Whether deductions may drive a product's stock below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StockPolicy {
  /// Negative stock is a backorder.
  #[default]
  AllowNegative,
  RejectNegative,
}

impl StockPolicy {
  pub fn from_allow_negative(allow_negative: bool) -> Self {
    if allow_negative {
      StockPolicy::AllowNegative
    } else {
      StockPolicy::RejectNegative
    }
  }
}

/// Existing item deleted on save. Its baseline quantity goes back to stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRemoval {
  pub item_id: Uuid,
  pub product_id: Option<Uuid>,
  pub baseline_quantity: Quantity,
}

/// Existing item whose quantity or total differs from its baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChange {
  pub item_id: Uuid,
  pub product_id: Option<Uuid>,
  pub baseline_quantity: Quantity,
  pub quantity: Quantity,
  pub unit_price: UnitPrice,
  pub total_price: Decimal,
}

impl ItemChange {
  /// Units to take from stock; negative when the quantity went down.
  pub fn stock_delta(&self) -> i32 {
    self.quantity.value() - self.baseline_quantity.value()
  }
}

/// Stock movement for one product. A negative `deduct` returns units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockAdjustment {
  pub product_id: Uuid,
  pub deduct: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationPlan {
  pub target: EditTarget,
  pub order_id: Uuid,
  pub removals: Vec<ItemRemoval>,
  pub additions: Vec<OrderItem>,
  pub changes: Vec<ItemChange>,
  pub totals: Totals,
}

impl ReconciliationPlan {
  pub fn from_session(session: &EditSession) -> Result<Self, SalesError> {
    let target = session.target();
    let order_id = match target.order_id() {
      Some(order_id) => order_id,
      None => {
        let invoice_id = match target {
          EditTarget::Invoice { invoice_id, .. } => invoice_id,
          EditTarget::Order { order_id } => order_id,
        };
        return Err(SalesError::ReadOnlySession(invoice_id));
      }
    };

    let mut removals = Vec::with_capacity(session.removed().len());
    for item in session.removed() {
      let baseline = session.baseline(item.id).ok_or_else(|| {
        SalesError::Repository(format!("Removed item {} has no baseline", item.id))
      })?;
      removals.push(ItemRemoval {
        item_id: item.id,
        product_id: item.product_id,
        baseline_quantity: baseline.quantity,
      });
    }

    let additions = session
      .items()
      .iter()
      .filter(|item| item.origin == LineOrigin::Added)
      .map(|item| item.to_order_item(order_id))
      .collect();

    let changes = session
      .items()
      .iter()
      .filter(|item| item.origin == LineOrigin::Existing)
      .filter_map(|item| {
        let baseline = session.baseline(item.id)?;
        if baseline.quantity == item.quantity && baseline.line_total == item.line_total {
          return None;
        }
        Some(ItemChange {
          item_id: item.id,
          product_id: item.product_id,
          baseline_quantity: baseline.quantity,
          quantity: item.quantity,
          unit_price: item.unit_price,
          total_price: item.line_total,
        })
      })
      .collect();

    Ok(Self {
      target,
      order_id,
      removals,
      additions,
      changes,
      totals: session.totals(),
    })
  }

  /// Net stock movement per product, one entry per product in the order
  /// the product first appears among removals, additions and quantity
  /// changes. Lines without a catalog reference and products whose
  /// movements cancel out produce nothing.
  pub fn stock_adjustments(&self) -> Vec<StockAdjustment> {
    let removals = self
      .removals
      .iter()
      .filter_map(|r| r.product_id.map(|id| (id, -r.baseline_quantity.value())));
    let additions = self
      .additions
      .iter()
      .filter_map(|a| a.product_id.map(|id| (id, a.quantity.value())));
    let changes = self
      .changes
      .iter()
      .filter_map(|c| c.product_id.map(|id| (id, c.stock_delta())));

    let mut net: Vec<StockAdjustment> = Vec::new();
    for (product_id, deduct) in removals.chain(additions).chain(changes) {
      match net.iter_mut().find(|adj| adj.product_id == product_id) {
        Some(adj) => adj.deduct = adj.deduct.saturating_add(deduct),
        None => net.push(StockAdjustment { product_id, deduct }),
      }
    }
    net.retain(|adj| adj.deduct != 0);
    net
  }

  /// Invoices linked to the order receive the order's totals.
  pub fn propagates_to_linked_invoices(&self) -> bool {
    matches!(self.target, EditTarget::Order { .. })
  }
}

/// Result of a committed plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationOutcome {
  pub totals: Totals,
  /// Stock of every touched product after the commit.
  pub stock_levels: Vec<StockLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockLevel {
  pub product_id: Uuid,
  pub stock_quantity: i32,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::catalog::Product;
  use crate::domain::sales::entities::{Invoice, Order};
  use rust_decimal_macros::dec;

  fn item(order_id: Uuid, product_id: Option<Uuid>, quantity: i32, price: Decimal) -> OrderItem {
    let quantity = Quantity::new(quantity).unwrap();
    let unit_price = UnitPrice::new(price).unwrap();
    OrderItem {
      id: Uuid::new_v4(),
      order_id,
      product_id,
      product_name: "Item".to_string(),
      product_sku: None,
      quantity,
      unit_price,
      total_price: unit_price.times(quantity),
      size: None,
      color: None,
    }
  }

  #[test]
  fn test_unchanged_session_plans_totals_only() {
    let order = Order::new("NC-1".to_string(), "Customer".to_string());
    let items = vec![item(order.id, Some(Uuid::new_v4()), 2, dec!(500))];
    let session = EditSession::for_order(&order, &items);

    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert!(plan.removals.is_empty());
    assert!(plan.additions.is_empty());
    assert!(plan.changes.is_empty());
    assert!(plan.stock_adjustments().is_empty());
    assert_eq!(plan.totals.total, dec!(1000));
    assert!(plan.propagates_to_linked_invoices());
  }

  #[test]
  fn test_quantity_change_deducts_difference() {
    let order = Order::new("NC-2".to_string(), "Customer".to_string());
    let product_id = Uuid::new_v4();
    let items = vec![item(order.id, Some(product_id), 2, dec!(500))];
    let mut session = EditSession::for_order(&order, &items);
    session.set_quantity(0, 5).unwrap();

    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert_eq!(plan.changes.len(), 1);
    assert_eq!(plan.changes[0].stock_delta(), 3);
    assert_eq!(
      plan.stock_adjustments(),
      vec![StockAdjustment {
        product_id,
        deduct: 3
      }]
    );
  }

  #[test]
  fn test_discount_only_change_has_no_stock_effect() {
    let order = Order::new("NC-3".to_string(), "Customer".to_string());
    let items = vec![item(order.id, Some(Uuid::new_v4()), 2, dec!(500))];
    let mut session = EditSession::for_order(&order, &items);
    session.set_discount_percent(0, dec!(10)).unwrap();

    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert_eq!(plan.changes.len(), 1);
    assert_eq!(plan.changes[0].total_price, dec!(900));
    assert!(plan.stock_adjustments().is_empty());
  }

  #[test]
  fn test_removal_restores_baseline_quantity() {
    let order = Order::new("NC-4".to_string(), "Customer".to_string());
    let product_id = Uuid::new_v4();
    let items = vec![item(order.id, Some(product_id), 3, dec!(500))];
    let mut session = EditSession::for_order(&order, &items);
    // An edit before removal does not change what goes back to stock.
    session.set_quantity(0, 9).unwrap();
    session.remove_item(0).unwrap();

    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert_eq!(plan.removals.len(), 1);
    assert!(plan.changes.is_empty());
    assert_eq!(
      plan.stock_adjustments(),
      vec![StockAdjustment {
        product_id,
        deduct: -3
      }]
    );
  }

  #[test]
  fn test_invoice_plan_with_removal_and_addition() {
    let order = Order::new("NC-5".to_string(), "Customer".to_string());
    let q = Uuid::new_v4();
    let items = vec![
      item(order.id, Some(q), 3, dec!(700)),
      item(order.id, Some(Uuid::new_v4()), 1, dec!(1500)),
    ];
    let invoice = Invoice::new("INV-5".to_string(), Some(order.id));
    let mut session = EditSession::for_invoice(&invoice, &items);
    session.remove_item(0).unwrap();
    let r = Product::new("Clutch".to_string(), None, dec!(800), None, 6).unwrap();
    session.add_item(&r).unwrap();

    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert_eq!(plan.order_id, order.id);
    assert!(!plan.propagates_to_linked_invoices());
    assert_eq!(plan.additions.len(), 1);
    assert_eq!(plan.additions[0].order_id, order.id);
    assert_eq!(
      plan.stock_adjustments(),
      vec![
        StockAdjustment {
          product_id: q,
          deduct: -3
        },
        StockAdjustment {
          product_id: r.id,
          deduct: 1
        },
      ]
    );
    assert_eq!(plan.totals.subtotal, dec!(2300));
  }

  #[test]
  fn test_movements_of_one_product_are_netted() {
    let order = Order::new("NC-7".to_string(), "Customer".to_string());
    let p = Product::new("Shawl".to_string(), None, dec!(1200), None, 0).unwrap();
    let items = vec![item(order.id, Some(p.id), 3, dec!(1200))];
    let mut session = EditSession::for_order(&order, &items);
    session.set_quantity(0, 1).unwrap();
    session.add_item(&p).unwrap();

    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert_eq!(
      plan.stock_adjustments(),
      vec![StockAdjustment {
        product_id: p.id,
        deduct: -1
      }]
    );

    // Returning two and taking two again leaves stock alone.
    session.add_item(&p).unwrap();
    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert!(plan.stock_adjustments().is_empty());
  }

  #[test]
  fn test_lines_without_product_skip_stock() {
    let order = Order::new("NC-6".to_string(), "Customer".to_string());
    let items = vec![item(order.id, None, 2, dec!(100))];
    let mut session = EditSession::for_order(&order, &items);
    session.set_quantity(0, 4).unwrap();

    let plan = ReconciliationPlan::from_session(&session).unwrap();
    assert_eq!(plan.changes.len(), 1);
    assert!(plan.stock_adjustments().is_empty());
  }

  #[test]
  fn test_read_only_session_has_no_plan() {
    let invoice = Invoice::new("INV-6".to_string(), None);
    let session = EditSession::for_invoice(&invoice, &[]);
    assert!(matches!(
      ReconciliationPlan::from_session(&session),
      Err(SalesError::ReadOnlySession(id)) if id == invoice.id
    ));
  }
}
