pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  AddLineItemRequest, ErrorResponse, OpenEditSessionRequest, SearchProductsQuery,
  SetDiscountRequest, SuccessResponse, UpdateLineItemRequest,
};
pub use errors::{ApiError, ConflictKind};
pub use handlers::health_handler;
pub use middleware::{REQUEST_ID_HEADER, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{ApiRouteDependencies, configure_api_routes};
