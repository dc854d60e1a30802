//! Dashboard summary
//!
//! Six-month trend, current month figures, year-to-date totals and VAT
//! totals. Revenue and expense figures use net amounts throughout.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::display::{format_amount, format_change};
use crate::models::{Category, Money, MonthKey, Transaction, TransactionType};

use super::breakdown::{dashboard_expense_breakdown, CategoryTotal};
use super::monthly::{monthly_buckets, period_change_percentage, MonthBucket};

/// Number of months in the dashboard trend
pub const DASHBOARD_MONTHS: u32 = 6;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub reference_date: NaiveDate,
    /// Oldest first, the last bucket is the reference month
    pub months: Vec<MonthBucket>,
    pub current_revenue: Money,
    pub current_expense: Money,
    pub current_balance: Money,
    /// Balance change against the previous month in percent
    pub change_percentage: f64,
    pub transaction_count: usize,
    /// Expenses per category by net amount
    pub expense_breakdown: Vec<CategoryTotal>,
    pub ytd_revenue: Money,
    pub ytd_expense: Money,
    /// VAT on all expenses ever booked
    pub vat_paid: Money,
    /// VAT on all revenue ever booked
    pub vat_collected: Money,
}

impl DashboardSummary {
    pub fn generate(
        transactions: &[Transaction],
        categories: &[Category],
        reference: NaiveDate,
    ) -> Self {
        let months = monthly_buckets(transactions, DASHBOARD_MONTHS, reference);

        let current_month = MonthKey::from_date(reference);
        let current = MonthBucket::for_month(current_month, transactions);
        let previous = MonthBucket::for_month(current_month.prev(), transactions);

        let change_percentage = if transactions.is_empty() {
            0.0
        } else {
            period_change_percentage(&current, &previous)
        };

        let year = reference.year();
        let sum = |kind: TransactionType, year_only: bool, field: fn(&Transaction) -> Money| {
            transactions
                .iter()
                .filter(|t| t.kind == kind && (!year_only || t.date.year() == year))
                .map(field)
                .sum::<Money>()
        };

        Self {
            reference_date: reference,
            current_revenue: current.revenue,
            current_expense: current.expense,
            current_balance: current.balance,
            change_percentage,
            transaction_count: transactions.len(),
            expense_breakdown: dashboard_expense_breakdown(transactions, categories),
            ytd_revenue: sum(TransactionType::Revenue, true, |t| t.amount),
            ytd_expense: sum(TransactionType::Expense, true, |t| t.amount),
            vat_paid: sum(TransactionType::Expense, false, |t| t.vat),
            vat_collected: sum(TransactionType::Revenue, false, |t| t.vat),
            months,
        }
    }

    /// Format the dashboard for terminal display
    pub fn format_terminal(&self, show_currency: bool) -> String {
        let amount = |m: Money| format_amount(m, show_currency);
        let mut output = String::new();

        output.push_str(&format!(
            "Dashboard ({})\n",
            self.reference_date.format("%d.%m.%Y")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str(&format!("{:<24} {:>16}\n", "Revenue this month:", amount(self.current_revenue)));
        output.push_str(&format!("{:<24} {:>16}\n", "Expenses this month:", amount(self.current_expense)));
        output.push_str(&format!(
            "{:<24} {:>16}  ({} vs. last month)\n",
            "Balance this month:",
            amount(self.current_balance),
            format_change(self.change_percentage)
        ));
        output.push_str(&format!("{:<24} {:>16}\n", "Transactions:", self.transaction_count));
        output.push('\n');

        output.push_str(&format!("{:<24} {:>16}\n", "Revenue year to date:", amount(self.ytd_revenue)));
        output.push_str(&format!("{:<24} {:>16}\n", "Expenses year to date:", amount(self.ytd_expense)));
        output.push_str(&format!("{:<24} {:>16}\n", "VAT collected:", amount(self.vat_collected)));
        output.push_str(&format!("{:<24} {:>16}\n", "VAT paid:", amount(self.vat_paid)));
        output.push('\n');

        output.push_str(&format!(
            "{:<10} {:>16} {:>16} {:>16}\n",
            "Month", "Revenue", "Expenses", "Balance"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for bucket in &self.months {
            output.push_str(&format!(
                "{:<10} {:>16} {:>16} {:>16}\n",
                bucket.label,
                amount(bucket.revenue),
                amount(bucket.expense),
                amount(bucket.balance)
            ));
        }

        if !self.expense_breakdown.is_empty() {
            output.push_str("\nExpenses by category (net)\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for entry in &self.expense_breakdown {
                output.push_str(&format!("{:<42} {:>16}\n", entry.name, amount(entry.total)));
            }
        }

        output
    }
}
