use std::sync::Arc;
use uuid::Uuid;

use super::search_products::ProductDto;
use crate::domain::sales::{EditingService, SalesError};

#[derive(Debug, Clone)]
pub struct GetProductCommand {
  pub product_id: Uuid,
}

pub struct GetProductUseCase {
  editing_service: Arc<EditingService>,
}

impl GetProductUseCase {
  pub fn new(editing_service: Arc<EditingService>) -> Self {
    Self { editing_service }
  }

  pub async fn execute(&self, command: GetProductCommand) -> Result<ProductDto, SalesError> {
    let product = self
      .editing_service
      .find_product(command.product_id)
      .await?;
    Ok(product.into())
  }
}
