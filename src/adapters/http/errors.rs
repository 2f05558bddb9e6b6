use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::catalog::CatalogError;
use crate::domain::sales::SalesError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Invalid input or an operation the session does not allow (400 Bad Request)
  Validation(String),

  /// Missing order, invoice, product or session (404 Not Found)
  NotFound(String),

  /// Save rejected because stored data moved underneath it (409 Conflict)
  Conflict(ConflictKind),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Conflict error kinds
#[derive(Debug, Serialize)]
pub enum ConflictKind {
  /// An item was edited or deleted since the session was opened
  StaleLineItem { item_id: uuid::Uuid },

  /// The stock policy forbids the deduction
  InsufficientStock {
    product_id: uuid::Uuid,
    requested: i32,
    available: i32,
  },
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(kind) => write!(f, "Conflict: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message, details) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone(), None),
      ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
      ApiError::Conflict(kind) => match kind {
        ConflictKind::StaleLineItem { item_id } => (
          "stale_line_item",
          "The order was changed by someone else. Reopen it and try again".to_string(),
          Some(serde_json::json!({ "item_id": item_id })),
        ),
        ConflictKind::InsufficientStock {
          product_id,
          requested,
          available,
        } => (
          "insufficient_stock",
          "Not enough stock to save these changes".to_string(),
          Some(serde_json::json!({
            "product_id": product_id,
            "requested": requested,
            "available": available,
          })),
        ),
      },
      ApiError::Internal(msg) => {
        // Details stay in the logs
        tracing::error!("Internal error: {}", msg);
        ("internal_error", "Failed to update".to_string(), None)
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert SalesError to ApiError
impl From<SalesError> for ApiError {
  fn from(error: SalesError) -> Self {
    match error {
      SalesError::OrderNotFound(_)
      | SalesError::InvoiceNotFound(_)
      | SalesError::ProductNotFound(_)
      | SalesError::NoLineItems(_)
      | SalesError::EditSessionNotFound(_) => ApiError::NotFound(error.to_string()),
      SalesError::Validation(_)
      | SalesError::LineItemIndexOutOfRange { .. }
      | SalesError::DiscountModelMismatch(_)
      | SalesError::ReadOnlySession(_)
      | SalesError::ProductInactive(_) => ApiError::Validation(error.to_string()),
      SalesError::StaleLineItem(item_id) => {
        ApiError::Conflict(ConflictKind::StaleLineItem { item_id })
      }
      SalesError::InsufficientStock {
        product_id,
        requested,
        available,
      } => ApiError::Conflict(ConflictKind::InsufficientStock {
        product_id,
        requested,
        available,
      }),
      SalesError::Repository(e) => ApiError::Internal(format!("Repository error: {}", e)),
      SalesError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

/// Convert CatalogError to ApiError
impl From<CatalogError> for ApiError {
  fn from(error: CatalogError) -> Self {
    SalesError::from(error).into()
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();
    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;
  use uuid::Uuid;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::NotFound("test".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Conflict(ConflictKind::StaleLineItem {
        item_id: Uuid::new_v4()
      })
      .status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_sales_error_conversion() {
    let id = Uuid::new_v4();

    let api_error: ApiError = SalesError::NoLineItems(id).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = SalesError::LineItemIndexOutOfRange { index: 3, len: 1 }.into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = SalesError::ReadOnlySession(id).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = SalesError::InsufficientStock {
      product_id: id,
      requested: 3,
      available: 1,
    }
    .into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = SalesError::Repository("boom".to_string()).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let api_error: ApiError = CatalogError::ProductNotFound(id).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_internal_error_hides_details() {
    let response = ApiError::Internal("connection refused".to_string()).error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "internal_error");
    assert_eq!(json["message"], "Failed to update");
    assert!(!body.windows(7).any(|w| w == b"refused"));
  }

  #[actix_web::test]
  async fn test_insufficient_stock_details() {
    let product_id = Uuid::new_v4();
    let response = ApiError::Conflict(ConflictKind::InsufficientStock {
      product_id,
      requested: 4,
      available: 1,
    })
    .error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "insufficient_stock");
    assert_eq!(json["details"]["requested"], 4);
    assert_eq!(json["details"]["available"], 1);
    assert_eq!(json["details"]["product_id"], product_id.to_string());
  }
}
