use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::totals::{DiscountModel, Totals};
use super::value_objects::{DiscountPercent, Quantity, UnitPrice, ValueObjectError, round_amount};
use crate::domain::catalog::Product;

// Order - Customer order placed through the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: Uuid,
  pub order_number: String,
  pub customer_name: String,
  pub subtotal: Decimal,
  pub discount_amount: Decimal,
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  pub fn new(order_number: String, customer_name: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      order_number,
      customer_name,
      subtotal: Decimal::ZERO,
      discount_amount: Decimal::ZERO,
      total_amount: Decimal::ZERO,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn totals(&self) -> Totals {
    Totals {
      subtotal: self.subtotal,
      discount_total: self.discount_amount,
      total: self.total_amount,
    }
  }

  pub fn apply_totals(&mut self, totals: &Totals) {
    self.subtotal = totals.subtotal;
    self.discount_amount = totals.discount_total;
    self.total_amount = totals.total;
    self.updated_at = Utc::now();
  }
}

// Invoice - Billing document, optionally generated from an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub order_id: Option<Uuid>,
  pub invoice_number: String,
  pub subtotal: Decimal,
  pub discount_amount: Decimal,
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Invoice {
  pub fn new(invoice_number: String, order_id: Option<Uuid>) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      order_id,
      invoice_number,
      subtotal: Decimal::ZERO,
      discount_amount: Decimal::ZERO,
      total_amount: Decimal::ZERO,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn totals(&self) -> Totals {
    Totals {
      subtotal: self.subtotal,
      discount_total: self.discount_amount,
      total: self.total_amount,
    }
  }

  pub fn apply_totals(&mut self, totals: &Totals) {
    self.subtotal = totals.subtotal;
    self.discount_amount = totals.discount_total;
    self.total_amount = totals.total;
    self.updated_at = Utc::now();
  }
}

// Order Item - Persisted line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Option<Uuid>,
  pub product_name: String,
  pub product_sku: Option<String>,
  pub quantity: Quantity,
  pub unit_price: UnitPrice,
  pub total_price: Decimal,
  pub size: Option<String>,
  pub color: Option<String>,
}

/// What the order or invoice currently being edited is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EditTarget {
  Order { order_id: Uuid },
  Invoice { invoice_id: Uuid, order_id: Option<Uuid> },
}

impl EditTarget {
  /// Order whose items are edited, if any.
  pub fn order_id(&self) -> Option<Uuid> {
    match self {
      EditTarget::Order { order_id } => Some(*order_id),
      EditTarget::Invoice { order_id, .. } => *order_id,
    }
  }

  pub fn is_invoice(&self) -> bool {
    matches!(self, EditTarget::Invoice { .. })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineOrigin {
  Existing,
  Added,
  Removed,
}

// Line Item - Working copy of an order line inside an edit session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
  pub id: Uuid,
  pub product_id: Option<Uuid>,
  pub name: String,
  pub sku: Option<String>,
  pub quantity: Quantity,
  pub unit_price: UnitPrice,
  pub discount_percent: DiscountPercent,
  pub line_total: Decimal,
  pub size: Option<String>,
  pub color: Option<String>,
  pub origin: LineOrigin,
}

impl LineItem {
  pub fn from_order_item(item: &OrderItem) -> Self {
    let gross = item.unit_price.times(item.quantity);
    Self {
      id: item.id,
      product_id: item.product_id,
      name: item.product_name.clone(),
      sku: item.product_sku.clone(),
      quantity: item.quantity,
      unit_price: item.unit_price,
      discount_percent: DiscountPercent::implied_by(gross, item.total_price),
      line_total: item.total_price,
      size: item.size.clone(),
      color: item.color.clone(),
      origin: LineOrigin::Existing,
    }
  }

  pub fn from_product(product: &Product) -> Result<Self, ValueObjectError> {
    let unit_price = UnitPrice::new(product.selling_price())?;
    Ok(Self {
      id: Uuid::new_v4(),
      product_id: Some(product.id),
      name: product.name.clone(),
      sku: product.sku.clone(),
      quantity: Quantity::ONE,
      unit_price,
      discount_percent: DiscountPercent::ZERO,
      line_total: round_amount(unit_price.times(Quantity::ONE)),
      size: None,
      color: None,
      origin: LineOrigin::Added,
    })
  }

  pub fn gross(&self) -> Decimal {
    self.unit_price.times(self.quantity)
  }

  /// Recomputes `line_total` under the given discount model.
  pub fn recompute_total(&mut self, model: &DiscountModel) {
    self.line_total = match model {
      DiscountModel::PerItemPercent => {
        round_amount(self.gross() * (Decimal::ONE - self.discount_percent.as_fraction()))
      }
      DiscountModel::FlatAmount(_) => round_amount(self.gross()),
    };
  }

  pub fn to_order_item(&self, order_id: Uuid) -> OrderItem {
    OrderItem {
      id: self.id,
      order_id,
      product_id: self.product_id,
      product_name: self.name.clone(),
      product_sku: self.sku.clone(),
      quantity: self.quantity,
      unit_price: self.unit_price,
      total_price: self.line_total,
      size: self.size.clone(),
      color: self.color.clone(),
    }
  }
}
