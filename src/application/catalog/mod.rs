pub mod get_product;
pub mod search_products;

pub use get_product::{GetProductCommand, GetProductUseCase};
pub use search_products::{
  ProductDto, SearchProductsCommand, SearchProductsResponse, SearchProductsUseCase,
};
