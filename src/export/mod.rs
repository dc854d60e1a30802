//! Export module for vatbook
//!
//! Spreadsheet-compatible CSV export of transactions and categories. Report
//! exports live next to each report in [`crate::reports`].

pub mod csv;

pub use self::csv::{export_categories_csv, export_transactions_csv};
