//! Back office for Noor Creations: order and invoice line-item editing with
//! stock reconciliation.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
