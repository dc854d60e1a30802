//! Export CLI command

use std::path::PathBuf;

use clap::Args;

use crate::error::VatbookResult;
use crate::export::{export_categories_csv, export_transactions_csv};
use crate::services::{FinanceBook, SortDirection, SortField, TransactionQuery};
use crate::storage::FinanceBackend;

use super::report::write_csv;

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Export categories instead of transactions
    #[arg(long)]
    categories: bool,
}

/// Write all transactions (oldest first) or all categories as CSV
pub fn handle_export_command<B: FinanceBackend>(
    book: &FinanceBook<B>,
    args: ExportArgs,
) -> VatbookResult<()> {
    let target = args.output.unwrap_or_else(|| PathBuf::from("-"));

    if args.categories {
        let rows: Vec<_> = book
            .categories()
            .all()
            .iter()
            .map(|c| (c, book.transactions().count_for_category(c.id)))
            .collect();
        return write_csv(&target, |w| export_categories_csv(&rows, w));
    }

    let query = TransactionQuery::new().sort_by(SortField::Date, SortDirection::Ascending);
    let views = book.list_transactions(&query);
    write_csv(&target, |w| export_transactions_csv(&views, w))
}
