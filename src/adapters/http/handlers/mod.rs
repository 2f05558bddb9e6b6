pub mod catalog;
pub mod edit_sessions;
pub mod sales;

use actix_web::HttpResponse;

/// Liveness probe
/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
