pub mod invoice_repository;
pub mod order_item_repository;
pub mod order_repository;
pub mod product_repository;
pub mod reconciliation_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use invoice_repository::PostgresInvoiceRepository;
pub use order_item_repository::PostgresOrderItemRepository;
pub use order_repository::PostgresOrderRepository;
pub use product_repository::PostgresProductRepository;
pub use reconciliation_store::PostgresReconciliationStore;
