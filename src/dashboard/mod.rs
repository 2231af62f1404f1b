//! Dashboard module
//!
//! Provides an overview page with the session's totals and transactions.
//! Includes a filter panel for narrowing the data by date, type and category.

mod cards;
mod handlers;
mod query;
mod tables;

pub use handlers::get_dashboard_page;
pub use query::{DashboardQuery, displayed_transactions};
