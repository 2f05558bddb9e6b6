use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places of the shop currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid line item name: {0}")]
  InvalidName(String),
}

/// Rounds an amount to the currency minor unit, half away from zero.
pub fn round_amount(amount: Decimal) -> Decimal {
  amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// Quantity - Whole units, always at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
  pub const ONE: Quantity = Quantity(1);

  pub fn new(value: i32) -> Result<Self, ValueObjectError> {
    if value < 1 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be positive".to_string(),
      ));
    }
    Ok(Self(value))
  }

  /// Operator input is clamped, never rejected.
  pub fn clamped(value: i64) -> Self {
    Self(value.clamp(1, i64::from(i32::MAX)) as i32)
  }

  pub fn value(&self) -> i32 {
    self.0
  }

  pub fn as_decimal(&self) -> Decimal {
    Decimal::from(self.0)
  }
}

impl fmt::Display for Quantity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Discount Percent - Per-item discount in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
  pub const ZERO: DiscountPercent = DiscountPercent(Decimal::ZERO);

  pub fn clamped(value: Decimal) -> Self {
    Self(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
  }

  /// Recovers the percentage baked into a stored line total.
  pub fn implied_by(gross: Decimal, line_total: Decimal) -> Self {
    if gross <= Decimal::ZERO {
      return Self::ZERO;
    }
    let pct = (Decimal::ONE - line_total / gross) * Decimal::ONE_HUNDRED;
    Self::clamped(pct.round_dp(2))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  pub fn as_fraction(&self) -> Decimal {
    self.0 / Decimal::ONE_HUNDRED
  }
}

// Unit Price - Non-negative currency amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
  pub fn new(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() {
      return Err(ValueObjectError::InvalidAmount(
        "Unit price cannot be negative".to_string(),
      ));
    }
    Ok(Self(amount))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  pub fn times(&self, quantity: Quantity) -> Decimal {
    self.0 * quantity.as_decimal()
  }
}
