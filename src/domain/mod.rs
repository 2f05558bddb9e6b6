pub mod catalog;
pub mod sales;
