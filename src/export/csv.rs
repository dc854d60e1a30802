//! CSV export
//!
//! Amounts are written as plain decimals with a dot separator so the files
//! load into any spreadsheet regardless of locale.

use std::io::Write;

use crate::error::VatbookResult;
use crate::models::Category;
use crate::services::TransactionView;

/// Export transactions in the order given
pub fn export_transactions_csv<W: Write>(views: &[TransactionView<'_>], writer: W) -> VatbookResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "Date",
        "Type",
        "Category",
        "Description",
        "Amount",
        "VAT",
        "Total",
        "VAT Exempt",
        "Notes",
        "Has Invoice",
    ])?;

    for view in views {
        let txn = view.transaction;
        csv.write_record([
            txn.date.format("%Y-%m-%d").to_string().as_str(),
            txn.kind.to_string().as_str(),
            view.category_name(),
            txn.description.as_str(),
            txn.amount.to_decimal_string().as_str(),
            txn.vat.to_decimal_string().as_str(),
            txn.total_amount.to_decimal_string().as_str(),
            yes_no(txn.vat_exempt),
            txn.notes.as_deref().unwrap_or(""),
            yes_no(txn.has_invoice()),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Export categories with their usage counts
pub fn export_categories_csv<W: Write>(categories: &[(&Category, usize)], writer: W) -> VatbookResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Name", "Type", "Color", "VAT Applicable", "Transactions"])?;

    for (category, usage) in categories {
        csv.write_record([
            category.name.as_str(),
            category.kind.to_string().as_str(),
            category.display_color(),
            yes_no(category.vat_applicable),
            usage.to_string().as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
