pub mod add_line_item;
pub mod cancel_edit_session;
pub mod dto;
pub mod get_edit_session;
pub mod open_edit_session;
pub mod remove_line_item;
pub mod save_edit_session;
pub mod session_registry;
pub mod set_invoice_discount;
pub mod update_line_item;

pub use add_line_item::{AddLineItemCommand, AddLineItemUseCase};
pub use cancel_edit_session::{CancelEditSessionCommand, CancelEditSessionUseCase};
pub use dto::{EditSessionView, LineItemDto, SaveEditSessionResponse, StockLevelDto, TotalsDto};
pub use get_edit_session::{GetEditSessionCommand, GetEditSessionUseCase};
pub use open_edit_session::{EditTargetKind, OpenEditSessionCommand, OpenEditSessionUseCase};
pub use remove_line_item::{RemoveLineItemCommand, RemoveLineItemUseCase};
pub use save_edit_session::{SaveEditSessionCommand, SaveEditSessionUseCase};
pub use session_registry::{EditSessionRegistry, SharedEditSession};
pub use set_invoice_discount::{SetInvoiceDiscountCommand, SetInvoiceDiscountUseCase};
pub use update_line_item::{UpdateLineItemCommand, UpdateLineItemUseCase};
