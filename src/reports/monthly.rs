//! Monthly buckets
//!
//! Groups transactions by calendar month for the dashboard trend.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Money, MonthKey, Transaction, TransactionType};

/// Net revenue and expense of one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub month: MonthKey,
    /// Chart label, e.g. "Okt 2026"
    pub label: String,
    pub revenue: Money,
    pub expense: Money,
    pub balance: Money,
}

impl MonthBucket {
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            label: month.short_label(),
            revenue: Money::zero(),
            expense: Money::zero(),
            balance: Money::zero(),
        }
    }

    /// Sum the net amounts of the transactions dated in this month
    pub fn for_month<'a>(month: MonthKey, transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut bucket = Self::empty(month);
        for txn in transactions
            .into_iter()
            .filter(|t| month.contains(t.date))
        {
            match txn.kind {
                TransactionType::Revenue => bucket.revenue += txn.amount,
                TransactionType::Expense => bucket.expense += txn.amount,
            }
        }
        bucket.balance = bucket.revenue - bucket.expense;
        bucket
    }
}

/// Exactly `months_back` buckets ending with the reference month, oldest first
///
/// Months without transactions still appear with zero sums.
pub fn monthly_buckets(
    transactions: &[Transaction],
    months_back: u32,
    reference: NaiveDate,
) -> Vec<MonthBucket> {
    let current = MonthKey::from_date(reference);
    (0..months_back)
        .rev()
        .map(|offset| MonthBucket::for_month(current.months_before(offset), transactions))
        .collect()
}

/// Balance change from `previous` to `current` in percent, one decimal
///
/// A previous balance of zero counts as a full positive swing (100).
pub fn period_change_percentage(current: &MonthBucket, previous: &MonthBucket) -> f64 {
    if previous.balance.is_zero() {
        return 100.0;
    }

    let change = (current.balance - previous.balance).cents() as f64;
    let base = previous.balance.abs().cents() as f64;
    round1(change / base * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
