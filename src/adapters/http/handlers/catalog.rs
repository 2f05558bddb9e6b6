use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{dtos::SearchProductsQuery, errors::ApiError},
  application::catalog::*,
};

/// Search the catalog
/// GET /api/v1/products?q=&include_inactive=&limit=
pub async fn search_products_handler(
  query: web::Query<SearchProductsQuery>,
  use_case: web::Data<Arc<SearchProductsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  query.validate()?;

  let query = query.into_inner();
  let command = SearchProductsCommand {
    term: query.q,
    include_inactive: query.include_inactive,
    limit: query.limit,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(response))
}

/// Get one product
/// GET /api/v1/products/:product_id
pub async fn get_product_handler(
  product_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetProductCommand {
    product_id: *product_id,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(response))
}
