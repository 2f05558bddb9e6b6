pub mod entities;
pub mod errors;
pub mod ports;
pub mod reconciliation;
pub mod services;
pub mod session;
pub mod totals;
pub mod value_objects;

pub use entities::{EditTarget, Invoice, LineItem, LineOrigin, Order, OrderItem};
pub use errors::SalesError;
pub use ports::{InvoiceRepository, OrderItemRepository, OrderRepository, ReconciliationStore};
pub use reconciliation::{
  ItemChange, ItemRemoval, ReconciliationOutcome, ReconciliationPlan, StockAdjustment, StockLevel,
  StockPolicy,
};
pub use services::{EditingService, EditingServiceDependencies};
pub use session::{Baseline, EditSession};
pub use totals::{DiscountModel, Totals};
pub use value_objects::{DiscountPercent, Quantity, UnitPrice, ValueObjectError};
