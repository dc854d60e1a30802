//! Reports module for vatbook
//!
//! Pure aggregations over the transaction list: monthly buckets, category
//! breakdowns, the dashboard and the timeframe reports.

pub mod breakdown;
pub mod dashboard;
pub mod expense_breakdown;
pub mod monthly;
pub mod profit_loss;
pub mod vat_summary;

pub use breakdown::{
    category_breakdown, dashboard_expense_breakdown, report_expense_breakdown,
    report_revenue_breakdown, AmountBasis, CategoryTotal,
};
pub use dashboard::{DashboardSummary, DASHBOARD_MONTHS};
pub use expense_breakdown::{ExpenseBreakdownReport, ExpenseShare};
pub use monthly::{monthly_buckets, period_change_percentage, MonthBucket};
pub use profit_loss::ProfitLossReport;
pub use vat_summary::{VatPosition, VatSummary};

use chrono::NaiveDate;

use crate::models::{ReportTimeframe, Transaction};

/// Transactions dated on or after the start of the timeframe
pub(crate) fn in_timeframe(
    transactions: &[Transaction],
    timeframe: ReportTimeframe,
    reference: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| timeframe.includes(t.date, reference))
        .cloned()
        .collect()
}
