//! Custom error types for vatbook
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every variant carries a message suitable
//! for showing to the end user.

use thiserror::Error;

use crate::models::{CategoryKind, TransactionType};

/// The main error type for vatbook operations
#[derive(Error, Debug)]
pub enum VatbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Net amount missing, non-numeric or not positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Selected category cannot be used for this transaction type
    #[error(
        "Category '{category}' ({category_kind}) cannot be used for {transaction_kind} transactions"
    )]
    CategoryTypeMismatch {
        category: String,
        category_kind: CategoryKind,
        transaction_kind: TransactionType,
    },

    /// Category deletion blocked by referencing transactions
    #[error(
        "Cannot delete category '{category}' because it has {count} {} assigned to it. Please reassign or delete these transactions first.",
        transaction_noun(.count)
    )]
    CategoryInUse { category: String, count: usize },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Any failure reported by the persistence backend
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Backup errors
    #[error("Backup error: {0}")]
    Backup(String),
}

fn transaction_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "transaction"
    } else {
        "transactions"
    }
}

impl VatbookError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error (including amount and category checks)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidAmount(_) | Self::CategoryTypeMismatch { .. }
        )
    }

    /// Check if the persistence backend rejected the operation
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<std::io::Error> for VatbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VatbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for VatbookError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for vatbook operations
pub type VatbookResult<T> = Result<T, VatbookError>;
