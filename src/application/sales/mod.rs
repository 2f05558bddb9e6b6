pub mod dto;
pub mod get_invoice_details;
pub mod get_order_details;

pub use dto::{InvoiceSummaryDto, OrderItemDto};
pub use get_invoice_details::{
  GetInvoiceDetailsCommand, GetInvoiceDetailsUseCase, InvoiceDetailsResponse,
};
pub use get_order_details::{GetOrderDetailsCommand, GetOrderDetailsUseCase, OrderDetailsResponse};
