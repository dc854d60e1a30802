//! Core data models for vatbook
//!
//! This module contains the data structures of the bookkeeping domain:
//! categories, transactions, money amounts and report periods.

pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use category::{Category, CategoryKind, CategoryValidationError};
pub use ids::{CategoryId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use period::{german_month_name, MonthKey, ReportTimeframe};
pub use transaction::{
    RecurringFrequency, Transaction, TransactionType, TransactionValidationError,
};
