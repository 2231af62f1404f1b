//! Analytics module
//!
//! Charts and summary tables of the session's income and expenses by month
//! and by category.

mod charts;
mod handlers;

pub use handlers::get_analytics_page;
