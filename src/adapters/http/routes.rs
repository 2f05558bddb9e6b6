use actix_web::{HttpRequest, error, web};
use std::sync::Arc;

use crate::application::catalog::{GetProductUseCase, SearchProductsUseCase};
use crate::application::editing::{
  AddLineItemUseCase, CancelEditSessionUseCase, EditSessionRegistry, GetEditSessionUseCase,
  OpenEditSessionUseCase, RemoveLineItemUseCase, SaveEditSessionUseCase,
  SetInvoiceDiscountUseCase, UpdateLineItemUseCase,
};
use crate::application::sales::{GetInvoiceDetailsUseCase, GetOrderDetailsUseCase};
use crate::domain::sales::EditingService;

use super::errors::ApiError;
use super::handlers::catalog::{get_product_handler, search_products_handler};
use super::handlers::edit_sessions::{
  add_line_item_handler, cancel_edit_session_handler, get_edit_session_handler,
  open_edit_session_handler, remove_line_item_handler, save_edit_session_handler,
  set_invoice_discount_handler, update_line_item_handler,
};
use super::handlers::sales::{get_invoice_details_handler, get_order_details_handler};

/// Use cases served by the JSON API
#[derive(Clone)]
pub struct ApiRouteDependencies {
  pub search_products: Arc<SearchProductsUseCase>,
  pub get_product: Arc<GetProductUseCase>,
  pub get_order_details: Arc<GetOrderDetailsUseCase>,
  pub get_invoice_details: Arc<GetInvoiceDetailsUseCase>,
  pub open_edit_session: Arc<OpenEditSessionUseCase>,
  pub get_edit_session: Arc<GetEditSessionUseCase>,
  pub cancel_edit_session: Arc<CancelEditSessionUseCase>,
  pub add_line_item: Arc<AddLineItemUseCase>,
  pub update_line_item: Arc<UpdateLineItemUseCase>,
  pub remove_line_item: Arc<RemoveLineItemUseCase>,
  pub set_invoice_discount: Arc<SetInvoiceDiscountUseCase>,
  pub save_edit_session: Arc<SaveEditSessionUseCase>,
}

impl ApiRouteDependencies {
  /// Builds every use case over one editing service and session registry.
  pub fn new(
    editing_service: Arc<EditingService>,
    registry: Arc<EditSessionRegistry>,
    search_limit: i64,
  ) -> Self {
    Self {
      search_products: Arc::new(SearchProductsUseCase::new(
        editing_service.clone(),
        search_limit,
      )),
      get_product: Arc::new(GetProductUseCase::new(editing_service.clone())),
      get_order_details: Arc::new(GetOrderDetailsUseCase::new(editing_service.clone())),
      get_invoice_details: Arc::new(GetInvoiceDetailsUseCase::new(editing_service.clone())),
      open_edit_session: Arc::new(OpenEditSessionUseCase::new(
        editing_service.clone(),
        registry.clone(),
      )),
      get_edit_session: Arc::new(GetEditSessionUseCase::new(registry.clone())),
      cancel_edit_session: Arc::new(CancelEditSessionUseCase::new(registry.clone())),
      add_line_item: Arc::new(AddLineItemUseCase::new(
        editing_service.clone(),
        registry.clone(),
      )),
      update_line_item: Arc::new(UpdateLineItemUseCase::new(registry.clone())),
      remove_line_item: Arc::new(RemoveLineItemUseCase::new(registry.clone())),
      set_invoice_discount: Arc::new(SetInvoiceDiscountUseCase::new(registry.clone())),
      save_edit_session: Arc::new(SaveEditSessionUseCase::new(editing_service, registry)),
    }
  }
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid path parameter: {}", err)).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid query parameter: {}", err)).into()
}

/// Configure the JSON API
///
/// Mounts catalog, sales and edit-session endpoints under the provided scope
/// (e.g. /api/v1). Malformed bodies, paths and query strings are answered
/// with the same JSON error shape as domain errors.
///
/// # Routes
///
/// - GET /products - Search the catalog
/// - GET /products/{id} - Get one product
/// - GET /orders/{id} - Order with items and linked invoices
/// - GET /invoices/{id} - Invoice with the items of its order
/// - POST /edit-sessions - Open an edit session
/// - GET /edit-sessions/{sid} - Current session state
/// - DELETE /edit-sessions/{sid} - Discard a session
/// - POST /edit-sessions/{sid}/items - Add a product
/// - PATCH /edit-sessions/{sid}/items/{index} - Change quantity or discount
/// - DELETE /edit-sessions/{sid}/items/{index} - Remove a line
/// - PUT /edit-sessions/{sid}/discount - Set an invoice's flat discount
/// - POST /edit-sessions/{sid}/save - Commit a session
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// # use noor_backoffice::adapters::http::routes::{ApiRouteDependencies, configure_api_routes};
///
/// # fn example(deps: ApiRouteDependencies) {
/// let app = App::new().service(
///   web::scope("/api/v1").configure(|cfg| configure_api_routes(cfg, deps.clone())),
/// );
/// # }
/// ```
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, deps: ApiRouteDependencies) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler));

  configure_catalog_routes(cfg, &deps);
  configure_sales_routes(cfg, &deps);
  configure_edit_session_routes(cfg, &deps);
}

fn configure_catalog_routes(cfg: &mut web::ServiceConfig, deps: &ApiRouteDependencies) {
  cfg.service(
    web::scope("/products")
      .app_data(web::Data::new(deps.search_products.clone()))
      .app_data(web::Data::new(deps.get_product.clone()))
      .route("", web::get().to(search_products_handler))
      .route("/{product_id}", web::get().to(get_product_handler)),
  );
}

fn configure_sales_routes(cfg: &mut web::ServiceConfig, deps: &ApiRouteDependencies) {
  cfg
    .service(
      web::scope("/orders")
        .app_data(web::Data::new(deps.get_order_details.clone()))
        .route("/{order_id}", web::get().to(get_order_details_handler)),
    )
    .service(
      web::scope("/invoices")
        .app_data(web::Data::new(deps.get_invoice_details.clone()))
        .route("/{invoice_id}", web::get().to(get_invoice_details_handler)),
    );
}

fn configure_edit_session_routes(cfg: &mut web::ServiceConfig, deps: &ApiRouteDependencies) {
  cfg.service(
    web::scope("/edit-sessions")
      .app_data(web::Data::new(deps.open_edit_session.clone()))
      .app_data(web::Data::new(deps.get_edit_session.clone()))
      .app_data(web::Data::new(deps.cancel_edit_session.clone()))
      .app_data(web::Data::new(deps.add_line_item.clone()))
      .app_data(web::Data::new(deps.update_line_item.clone()))
      .app_data(web::Data::new(deps.remove_line_item.clone()))
      .app_data(web::Data::new(deps.set_invoice_discount.clone()))
      .app_data(web::Data::new(deps.save_edit_session.clone()))
      .route("", web::post().to(open_edit_session_handler))
      .route("/{session_id}", web::get().to(get_edit_session_handler))
      .route("/{session_id}", web::delete().to(cancel_edit_session_handler))
      .route("/{session_id}/items", web::post().to(add_line_item_handler))
      .route(
        "/{session_id}/items/{index}",
        web::patch().to(update_line_item_handler),
      )
      .route(
        "/{session_id}/items/{index}",
        web::delete().to(remove_line_item_handler),
      )
      .route(
        "/{session_id}/discount",
        web::put().to(set_invoice_discount_handler),
      )
      .route("/{session_id}/save", web::post().to(save_edit_session_handler)),
  );
}
