//! CLI command handlers
//!
//! Bridges the clap argument parsing with the finance book.

pub mod backup;
pub mod category;
pub mod export;
pub mod report;
pub mod settings;
pub mod transaction;

pub use backup::{auto_backup, handle_backup_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportArgs};
pub use report::{handle_report_command, ReportCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate};

use crate::error::{VatbookError, VatbookResult};

/// Parse a date as `YYYY-MM-DD`, `DD.MM.YYYY` or `today`
pub fn parse_date(input: &str) -> VatbookResult<NaiveDate> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d.%m.%Y"))
        .map_err(|_| {
            VatbookError::Validation(format!(
                "Invalid date '{}' (expected YYYY-MM-DD or DD.MM.YYYY)",
                input
            ))
        })
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
