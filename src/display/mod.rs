//! Display formatting for terminal output
//!
//! Tables and detail views for categories and transactions, plus shared
//! amount, date and percentage formatting.

pub mod category;
pub mod format;
pub mod transaction;

pub use category::{format_category_details, format_category_table};
pub use format::{format_amount, format_change, format_date, format_percentage, truncate};
pub use transaction::{format_transaction_details, format_transaction_table};
