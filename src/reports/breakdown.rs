//! Per-category totals
//!
//! The dashboard and the reports sum different amounts per category. Each
//! combination has its own named function so the difference stays visible.

use serde::Serialize;

use crate::models::{Category, CategoryId, Money, Transaction, TransactionType};
use crate::services::category::filter_applicable;

/// Which amount of a transaction to sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AmountBasis {
    /// Net amount before VAT
    Net,
    /// Total including VAT
    Gross,
}

impl AmountBasis {
    pub fn of(&self, txn: &Transaction) -> Money {
        match self {
            Self::Net => txn.amount,
            Self::Gross => txn.total_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub color: String,
    pub total: Money,
    pub transaction_count: usize,
}

/// Totals for every category applicable to `kind`, largest first
///
/// Only transactions of `kind` are summed. Categories with a zero total are
/// left out.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    kind: TransactionType,
    basis: AmountBasis,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = filter_applicable(categories, kind)
        .into_iter()
        .map(|category| {
            let matching = transactions
                .iter()
                .filter(|t| t.kind == kind && t.category_id == category.id);
            let (total, transaction_count) = matching
                .fold((Money::zero(), 0), |(sum, count), t| (sum + basis.of(t), count + 1));
            CategoryTotal {
                category_id: category.id,
                name: category.name.clone(),
                color: category.display_color().to_string(),
                total,
                transaction_count,
            }
        })
        .filter(|entry| !entry.total.is_zero())
        .collect();

    // Stable: equal totals keep category order
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Dashboard pie chart: expenses by net amount
pub fn dashboard_expense_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    category_breakdown(transactions, categories, TransactionType::Expense, AmountBasis::Net)
}

/// Reports: expenses by gross amount
pub fn report_expense_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    category_breakdown(transactions, categories, TransactionType::Expense, AmountBasis::Gross)
}

/// Reports: revenue by net amount
pub fn report_revenue_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    category_breakdown(transactions, categories, TransactionType::Revenue, AmountBasis::Net)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryKind;
    use chrono::NaiveDate;

    fn txn(category: &Category, kind: TransactionType, net: i64, vat: i64) -> Transaction {
        let mut txn = Transaction::new(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            kind,
            category.id,
            "test",
            Money::from_cents(net),
        );
        txn.set_amounts(txn.amount, Money::from_cents(vat));
        txn
    }

    fn fixture() -> (Vec<Category>, Vec<Transaction>) {
        let rent = Category::new("Rent", CategoryKind::Expense);
        let travel = Category::new("Travel", CategoryKind::Expense);
        let misc = Category::new("Misc", CategoryKind::Both);
        let unused = Category::new("Unused", CategoryKind::Expense);
        let sales = Category::new("Sales", CategoryKind::Revenue);

        let transactions = vec![
            txn(&rent, TransactionType::Expense, 50_000, 0),
            txn(&travel, TransactionType::Expense, 20_000, 3_800),
            txn(&travel, TransactionType::Expense, 10_000, 1_900),
            txn(&misc, TransactionType::Expense, 40_000, 7_600),
            txn(&misc, TransactionType::Revenue, 5_000, 950),
            txn(&sales, TransactionType::Revenue, 80_000, 15_200),
        ];
        (vec![rent, travel, misc, unused, sales], transactions)
    }

    #[test]
    fn test_dashboard_uses_net_amounts() {
        let (categories, transactions) = fixture();
        let breakdown = dashboard_expense_breakdown(&transactions, &categories);

        let rows: Vec<(&str, i64)> = breakdown
            .iter()
            .map(|c| (c.name.as_str(), c.total.cents()))
            .collect();
        assert_eq!(rows, vec![("Rent", 50_000), ("Misc", 40_000), ("Travel", 30_000)]);
    }

    #[test]
    fn test_report_expenses_use_gross_amounts() {
        let (categories, transactions) = fixture();
        let breakdown = report_expense_breakdown(&transactions, &categories);

        let rows: Vec<(&str, i64)> = breakdown
            .iter()
            .map(|c| (c.name.as_str(), c.total.cents()))
            .collect();
        assert_eq!(rows, vec![("Rent", 50_000), ("Misc", 47_600), ("Travel", 35_700)]);
        assert_eq!(breakdown[2].transaction_count, 2);
    }

    #[test]
    fn test_revenue_excludes_expense_transactions_of_shared_categories() {
        let (categories, transactions) = fixture();
        let breakdown = report_revenue_breakdown(&transactions, &categories);

        let rows: Vec<(&str, i64)> = breakdown
            .iter()
            .map(|c| (c.name.as_str(), c.total.cents()))
            .collect();
        assert_eq!(rows, vec![("Sales", 80_000), ("Misc", 5_000)]);
    }

    #[test]
    fn test_zero_totals_are_dropped() {
        let (categories, transactions) = fixture();
        let breakdown = dashboard_expense_breakdown(&transactions, &categories);
        assert!(breakdown.iter().all(|c| !c.total.is_zero()));
        assert!(breakdown.iter().all(|c| c.name != "Unused"));

        assert!(dashboard_expense_breakdown(&[], &categories).is_empty());
    }
}
