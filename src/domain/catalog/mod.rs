pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{Product, ProductFilter};
pub use errors::CatalogError;
pub use ports::CatalogReader;
