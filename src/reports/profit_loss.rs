//! Profit & Loss report
//!
//! Revenue is summed by net amount, expenses by gross amount.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::display::format_amount;
use crate::error::VatbookResult;
use crate::models::{Category, Money, ReportTimeframe, Transaction};

use super::breakdown::{report_expense_breakdown, report_revenue_breakdown, CategoryTotal};
use super::in_timeframe;

#[derive(Debug, Clone, Serialize)]
pub struct ProfitLossReport {
    pub timeframe: ReportTimeframe,
    pub label: String,
    pub start_date: NaiveDate,
    /// Net revenue per category
    pub revenue_by_category: Vec<CategoryTotal>,
    /// Gross expenses per category
    pub expenses_by_category: Vec<CategoryTotal>,
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
}

impl ProfitLossReport {
    pub fn generate(
        transactions: &[Transaction],
        categories: &[Category],
        timeframe: ReportTimeframe,
        reference: NaiveDate,
    ) -> Self {
        let selected = in_timeframe(transactions, timeframe, reference);

        let total_revenue = selected
            .iter()
            .filter(|t| t.is_revenue())
            .map(|t| t.amount)
            .sum::<Money>();
        let total_expenses = selected
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.total_amount)
            .sum::<Money>();

        Self {
            timeframe,
            label: timeframe.label(reference),
            start_date: timeframe.start_date(reference),
            revenue_by_category: report_revenue_breakdown(&selected, categories),
            expenses_by_category: report_expense_breakdown(&selected, categories),
            total_revenue,
            total_expenses,
            net_profit: total_revenue - total_expenses,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, show_currency: bool) -> String {
        let amount = |m: Money| format_amount(m, show_currency);
        let mut output = String::new();

        output.push_str(&format!("Profit & Loss: {}\n", self.label));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str("\nREVENUE (net)\n");
        if self.revenue_by_category.is_empty() {
            output.push_str("  (none)\n");
        }
        for entry in &self.revenue_by_category {
            output.push_str(&format!("  {:<40} {:>16}\n", entry.name, amount(entry.total)));
        }
        output.push_str(&format!("  {:<40} {:>16}\n", "Total revenue", amount(self.total_revenue)));

        output.push_str("\nEXPENSES (gross)\n");
        if self.expenses_by_category.is_empty() {
            output.push_str("  (none)\n");
        }
        for entry in &self.expenses_by_category {
            output.push_str(&format!("  {:<40} {:>16}\n", entry.name, amount(entry.total)));
        }
        output.push_str(&format!("  {:<40} {:>16}\n", "Total expenses", amount(self.total_expenses)));

        output.push_str(&"-".repeat(60));
        output.push('\n');
        let label = if self.net_profit.is_negative() {
            "NET LOSS"
        } else {
            "NET PROFIT"
        };
        output.push_str(&format!("{:<42} {:>16}\n", label, amount(self.net_profit)));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> VatbookResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Period", "Section", "Category", "Amount"])?;

        for entry in &self.revenue_by_category {
            csv.write_record([
                self.label.as_str(),
                "Revenue",
                entry.name.as_str(),
                entry.total.to_decimal_string().as_str(),
            ])?;
        }
        for entry in &self.expenses_by_category {
            csv.write_record([
                self.label.as_str(),
                "Expenses",
                entry.name.as_str(),
                entry.total.to_decimal_string().as_str(),
            ])?;
        }
        csv.write_record([
            self.label.as_str(),
            "Total",
            "Net profit",
            self.net_profit.to_decimal_string().as_str(),
        ])?;

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKind, TransactionType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(category: &Category, date: NaiveDate, kind: TransactionType, net: i64, vat: i64) -> Transaction {
        let mut txn = Transaction::new(date, kind, category.id, "test", Money::from_cents(net));
        txn.set_amounts(txn.amount, Money::from_cents(vat));
        txn
    }

    fn fixture() -> (Vec<Category>, Vec<Transaction>) {
        let sales = Category::new("Sales", CategoryKind::Revenue);
        let office = Category::new("Office", CategoryKind::Expense);
        let transactions = vec![
            txn(&sales, date(2026, 10, 2), TransactionType::Revenue, 100_000, 19_000),
            txn(&office, date(2026, 10, 3), TransactionType::Expense, 20_000, 3_800),
            txn(&office, date(2026, 8, 1), TransactionType::Expense, 10_000, 1_900),
            txn(&sales, date(2025, 12, 31), TransactionType::Revenue, 50_000, 9_500),
        ];
        (vec![sales, office], transactions)
    }

    #[test]
    fn test_month_report() {
        let (categories, transactions) = fixture();
        let report = ProfitLossReport::generate(
            &transactions,
            &categories,
            ReportTimeframe::Month,
            date(2026, 10, 19),
        );

        assert_eq!(report.label, "Oktober 2026");
        assert_eq!(report.total_revenue, Money::from_cents(100_000));
        assert_eq!(report.total_expenses, Money::from_cents(23_800));
        assert_eq!(report.net_profit, Money::from_cents(76_200));
        assert_eq!(report.expenses_by_category[0].total, Money::from_cents(23_800));
    }

    #[test]
    fn test_year_report_excludes_previous_year() {
        let (categories, transactions) = fixture();
        let report = ProfitLossReport::generate(
            &transactions,
            &categories,
            ReportTimeframe::Year,
            date(2026, 10, 19),
        );

        assert_eq!(report.total_revenue, Money::from_cents(100_000));
        assert_eq!(report.total_expenses, Money::from_cents(35_700));
    }

    #[test]
    fn test_empty_report() {
        let report = ProfitLossReport::generate(&[], &[], ReportTimeframe::Quarter, date(2026, 10, 19));
        assert_eq!(report.net_profit, Money::zero());
        assert!(report.revenue_by_category.is_empty());
        assert!(report.format_terminal(true).contains("(none)"));
    }

    #[test]
    fn test_export_csv() {
        let (categories, transactions) = fixture();
        let report = ProfitLossReport::generate(
            &transactions,
            &categories,
            ReportTimeframe::Month,
            date(2026, 10, 19),
        );

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.starts_with("Period,Section,Category,Amount\n"));
        assert!(csv.contains("Oktober 2026,Revenue,Sales,1000.00"));
        assert!(csv.contains("Oktober 2026,Expenses,Office,238.00"));
        assert!(csv.contains("Oktober 2026,Total,Net profit,762.00"));
    }
}
