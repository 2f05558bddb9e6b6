use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::application::editing::EditTargetKind;

/// Request to open an edit session
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OpenEditSessionRequest {
  /// `order` or `invoice`
  pub target: EditTargetKind,

  /// Id of the order or invoice
  pub id: Uuid,
}

/// Request to add a catalog product as a new line
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddLineItemRequest {
  pub product_id: Uuid,
}

/// Request to change one line's quantity and/or discount
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_line_item_update"))]
pub struct UpdateLineItemRequest {
  /// Values below 1 are raised to 1
  pub quantity: Option<i64>,

  /// Percent; clamped to [0, 100]. Orders only.
  pub discount_percent: Option<Decimal>,
}

fn validate_line_item_update(request: &UpdateLineItemRequest) -> Result<(), ValidationError> {
  if request.quantity.is_none() && request.discount_percent.is_none() {
    let mut error = ValidationError::new("empty_update");
    error.message = Some("Provide a quantity or a discount_percent".into());
    return Err(error);
  }
  Ok(())
}

/// Request to set an invoice's flat discount
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetDiscountRequest {
  /// Absolute amount; negative values are treated as zero
  pub amount: Decimal,
}

/// Query parameters for product search
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchProductsQuery {
  /// Matched against name and SKU, case-insensitively
  pub q: Option<String>,

  #[serde(default)]
  pub include_inactive: bool,

  #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
  pub limit: Option<i64>,
}

/// Generic success response
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  /// Success message
  pub message: String,
}

/// Error response structure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_update_request_needs_a_field() {
    let empty = UpdateLineItemRequest {
      quantity: None,
      discount_percent: None,
    };
    assert!(empty.validate().is_err());

    let quantity_only = UpdateLineItemRequest {
      quantity: Some(0),
      discount_percent: None,
    };
    assert!(quantity_only.validate().is_ok());

    let discount_only = UpdateLineItemRequest {
      quantity: None,
      discount_percent: Some(dec!(150)),
    };
    assert!(discount_only.validate().is_ok());
  }

  #[test]
  fn test_search_limit_range() {
    let query = SearchProductsQuery {
      limit: Some(0),
      ..Default::default()
    };
    assert!(query.validate().is_err());

    let query = SearchProductsQuery {
      limit: Some(25),
      ..Default::default()
    };
    assert!(query.validate().is_ok());
  }

  #[test]
  fn test_open_request_deserialization() {
    let id = Uuid::new_v4();
    let json = format!(r#"{{"target": "invoice", "id": "{}"}}"#, id);
    let request: OpenEditSessionRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(request.target, EditTargetKind::Invoice);
    assert_eq!(request.id, id);

    let bad = r#"{"target": "quote", "id": "00000000-0000-0000-0000-000000000000"}"#;
    assert!(serde_json::from_str::<OpenEditSessionRequest>(bad).is_err());
  }

  #[test]
  fn test_error_response_skips_empty_details() {
    let response = ErrorResponse {
      error: "not_found".to_string(),
      message: "Order not found".to_string(),
      details: None,
    };
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("details").is_none());
  }
}
