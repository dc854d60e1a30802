//! Expense breakdown report
//!
//! Gross expenses per category with each category's share of the total.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::display::{format_amount, format_percentage};
use crate::error::VatbookResult;
use crate::models::{Category, Money, ReportTimeframe, Transaction};

use super::breakdown::{report_expense_breakdown, CategoryTotal};
use super::in_timeframe;

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseShare {
    #[serde(flatten)]
    pub category: CategoryTotal,
    /// Share of total gross expenses in percent
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseBreakdownReport {
    pub timeframe: ReportTimeframe,
    pub label: String,
    pub entries: Vec<ExpenseShare>,
    pub total_expenses: Money,
}

impl ExpenseBreakdownReport {
    pub fn generate(
        transactions: &[Transaction],
        categories: &[Category],
        timeframe: ReportTimeframe,
        reference: NaiveDate,
    ) -> Self {
        let selected = in_timeframe(transactions, timeframe, reference);
        let total_expenses = selected
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.total_amount)
            .sum::<Money>();

        let entries = report_expense_breakdown(&selected, categories)
            .into_iter()
            .map(|category| {
                let percentage = if total_expenses.is_zero() {
                    0.0
                } else {
                    category.total.cents() as f64 / total_expenses.cents() as f64 * 100.0
                };
                ExpenseShare {
                    category,
                    percentage,
                }
            })
            .collect();

        Self {
            timeframe,
            label: timeframe.label(reference),
            entries,
            total_expenses,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, show_currency: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("Expense Breakdown: {}\n", self.label));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!("{:<32} {:>16} {:>8} {:>5}\n", "Category", "Amount", "%", "Count"));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for entry in &self.entries {
            output.push_str(&format!(
                "{:<32} {:>16} {:>8} {:>5}\n",
                entry.category.name,
                format_amount(entry.category.total, show_currency),
                format_percentage(entry.percentage),
                entry.category.transaction_count
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<32} {:>16}\n",
            "TOTAL EXPENSES",
            format_amount(self.total_expenses, show_currency)
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> VatbookResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Period", "Category", "Amount", "Percentage", "Transactions"])?;
        for entry in &self.entries {
            csv.write_record([
                self.label.clone(),
                entry.category.name.clone(),
                entry.category.total.to_decimal_string(),
                format!("{:.2}", entry.percentage),
                entry.category.transaction_count.to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}
