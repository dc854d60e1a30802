//! Transaction display formatting
//!
//! Table view for listings and a detail view for a single transaction.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Transaction;
use crate::services::transaction::TransactionView;

use super::format::{format_amount, format_date, truncate};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Net")]
    amount: String,
    #[tabled(rename = "VAT")]
    vat: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

impl TransactionRow {
    fn new(view: &TransactionView<'_>, show_currency: bool) -> Self {
        let txn = view.transaction;
        Self {
            id: txn.id.to_string(),
            date: format_date(txn.date),
            kind: kind_label(txn).to_string(),
            category: truncate(view.category_name(), 20),
            description: truncate(&txn.description, 30),
            amount: format_amount(txn.amount, show_currency),
            vat: format_amount(txn.vat, show_currency),
            total: format_amount(txn.total_amount, show_currency),
            flags: flags(txn),
        }
    }
}

fn kind_label(txn: &Transaction) -> &'static str {
    if txn.is_revenue() {
        "Einnahme"
    } else {
        "Ausgabe"
    }
}

/// Short markers: R = recurring, F = VAT-exempt, I = invoice attached
fn flags(txn: &Transaction) -> String {
    let mut flags = String::new();
    if txn.recurring {
        flags.push('R');
    }
    if txn.vat_exempt {
        flags.push('F');
    }
    if txn.has_invoice() {
        flags.push('I');
    }
    flags
}

/// Format a transaction listing as a table
pub fn format_transaction_table(views: &[TransactionView<'_>], show_currency: bool) -> String {
    if views.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = views
        .iter()
        .map(|view| TransactionRow::new(view, show_currency))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{}\n{} transaction(s)\n", table, views.len())
}

/// Format transaction details for display
pub fn format_transaction_details(view: &TransactionView<'_>, show_currency: bool) -> String {
    let txn = view.transaction;
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", format_date(txn.date)));
    output.push_str(&format!("Type:        {}\n", kind_label(txn)));
    output.push_str(&format!("Category:    {}\n", view.category_name()));
    output.push_str(&format!("Description: {}\n", txn.description));
    output.push_str(&format!("Net:         {}\n", format_amount(txn.amount, show_currency)));
    output.push_str(&format!("VAT:         {}\n", format_amount(txn.vat, show_currency)));
    output.push_str(&format!(
        "Total:       {}\n",
        format_amount(txn.total_amount, show_currency)
    ));

    if txn.vat_exempt {
        output.push_str("VAT-exempt:  yes\n");
    }
    if let Some(frequency) = txn.recurring_frequency.filter(|_| txn.recurring) {
        output.push_str(&format!("Recurring:   {}\n", frequency));
    }
    if let Some(notes) = &txn.notes {
        output.push_str(&format!("Notes:       {}\n", notes));
    }
    if let Some(path) = &txn.invoice_path {
        output.push_str(&format!("Invoice:     {}\n", path));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryKind, Money, RecurringFrequency, TransactionType};
    use chrono::NaiveDate;

    fn sample() -> (Category, Transaction) {
        let category = Category::new("Software", CategoryKind::Expense);
        let mut txn = Transaction::new(
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            TransactionType::Expense,
            category.id,
            "IDE licence",
            Money::from_cents(10_000),
        );
        txn.set_amounts(txn.amount, Money::from_cents(1_900));
        txn.recurring = true;
        txn.recurring_frequency = Some(RecurringFrequency::Yearly);
        (category, txn)
    }

    #[test]
    fn test_table_contains_amounts() {
        let (category, txn) = sample();
        let view = TransactionView {
            transaction: &txn,
            category: Some(&category),
        };

        let output = format_transaction_table(&[view], true);
        assert!(output.contains("01.10.2026"));
        assert!(output.contains("Software"));
        assert!(output.contains("119,00 €"));
        assert!(output.contains("1 transaction(s)"));

        let plain = format_transaction_table(&[view], false);
        assert!(!plain.contains('€'));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_transaction_table(&[], true), "No transactions found.\n");
    }

    #[test]
    fn test_details() {
        let (_, txn) = sample();
        let view = TransactionView {
            transaction: &txn,
            category: None,
        };

        let output = format_transaction_details(&view, true);
        assert!(output.contains("Category:    Unknown"));
        assert!(output.contains("VAT:         19,00 €"));
        assert!(output.contains("Recurring:   yearly"));
    }
}
