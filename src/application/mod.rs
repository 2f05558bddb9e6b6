//! Application layer
//!
//! Use cases that drive the catalog and sales domain for the HTTP adapter.
//! Edit sessions live in the [`editing::EditSessionRegistry`] between
//! requests.

pub mod catalog;
pub mod editing;
pub mod sales;
