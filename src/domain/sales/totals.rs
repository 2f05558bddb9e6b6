use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entities::LineItem;

/// How discounts are expressed while editing.
///
/// Orders carry a percentage per line; invoices carry a single absolute
/// amount taken off the subtotal once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", content = "amount", rename_all = "snake_case")]
pub enum DiscountModel {
  PerItemPercent,
  FlatAmount(Decimal),
}

impl DiscountModel {
  pub fn flat(amount: Decimal) -> Self {
    DiscountModel::FlatAmount(amount.max(Decimal::ZERO))
  }

  pub fn is_per_item(&self) -> bool {
    matches!(self, DiscountModel::PerItemPercent)
  }
}

// Totals - Derived, persisted only as the aggregate's columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
  pub subtotal: Decimal,
  pub discount_total: Decimal,
  pub total: Decimal,
}

impl Totals {
  pub fn calculate(items: &[LineItem], model: &DiscountModel) -> Self {
    let subtotal: Decimal = items.iter().map(LineItem::gross).sum();

    let discount_total = match model {
      DiscountModel::PerItemPercent => items
        .iter()
        .map(|item| item.gross() - item.line_total)
        .sum(),
      DiscountModel::FlatAmount(amount) => (*amount).clamp(Decimal::ZERO, subtotal),
    };

    Self {
      subtotal,
      discount_total,
      total: subtotal - discount_total,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::sales::entities::LineOrigin;
  use crate::domain::sales::value_objects::{DiscountPercent, Quantity, UnitPrice};
  use rust_decimal_macros::dec;
  use uuid::Uuid;

  fn line(quantity: i32, unit_price: Decimal, discount: Decimal) -> LineItem {
    let mut item = LineItem {
      id: Uuid::new_v4(),
      product_id: None,
      name: "Item".to_string(),
      sku: None,
      quantity: Quantity::new(quantity).unwrap(),
      unit_price: UnitPrice::new(unit_price).unwrap(),
      discount_percent: DiscountPercent::clamped(discount),
      line_total: Decimal::ZERO,
      size: None,
      color: None,
      origin: LineOrigin::Existing,
    };
    item.recompute_total(&DiscountModel::PerItemPercent);
    item
  }

  #[test]
  fn test_per_item_totals() {
    let items = vec![line(2, dec!(500), dec!(10)), line(1, dec!(800), dec!(0))];
    let totals = Totals::calculate(&items, &DiscountModel::PerItemPercent);
    assert_eq!(totals.subtotal, dec!(1800));
    assert_eq!(totals.discount_total, dec!(100));
    assert_eq!(totals.total, dec!(1700));
  }

  #[test]
  fn test_flat_amount_totals() {
    let items = vec![line(2, dec!(500), dec!(0)), line(1, dec!(800), dec!(0))];
    let totals = Totals::calculate(&items, &DiscountModel::flat(dec!(250)));
    assert_eq!(totals.subtotal, dec!(1800));
    assert_eq!(totals.discount_total, dec!(250));
    assert_eq!(totals.total, dec!(1550));
  }

  #[test]
  fn test_flat_amount_never_exceeds_subtotal() {
    let items = vec![line(1, dec!(100), dec!(0))];
    let totals = Totals::calculate(&items, &DiscountModel::flat(dec!(500)));
    assert_eq!(totals.discount_total, dec!(100));
    assert_eq!(totals.total, dec!(0));
  }

  #[test]
  fn test_negative_flat_amount_is_zero() {
    assert_eq!(DiscountModel::flat(dec!(-20)), DiscountModel::FlatAmount(dec!(0)));
  }

  #[test]
  fn test_empty_items() {
    let totals = Totals::calculate(&[], &DiscountModel::PerItemPercent);
    assert_eq!(totals, Totals::default());
  }
}
