//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `TransactionFields` used to create or update one
//! - The per-session `TransactionStore`
//! - View handlers and endpoints for adding, editing, deleting and exporting transactions

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod export;
mod form;
mod manage_page;
mod store;

#[cfg(test)]
pub use core::TransactionFields;
pub use core::{Transaction, TransactionId, TransactionType, sort_by_date_descending};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use export::get_export_transactions;
pub use manage_page::get_manage_transactions_page;
pub use store::TransactionStore;
