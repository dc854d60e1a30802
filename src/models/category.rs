//! Category model
//!
//! Categories classify transactions. A category's kind decides which
//! transaction types may use it, and its VAT flag can force zero VAT on every
//! transaction filed under it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::CategoryId;
use super::transaction::TransactionType;

/// Maximum category name length
pub const MAX_NAME_LEN: usize = 50;

/// Which transaction types a category applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Revenue,
    Both,
}

impl CategoryKind {
    /// Whether a transaction of the given type may reference this kind
    pub fn accepts(&self, transaction_type: TransactionType) -> bool {
        match self {
            Self::Both => true,
            Self::Expense => transaction_type == TransactionType::Expense,
            Self::Revenue => transaction_type == TransactionType::Revenue,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Revenue => write!(f, "revenue"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "revenue" | "income" => Ok(Self::Revenue),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "Unknown category type '{}' (expected expense, revenue or both)",
                other
            )),
        }
    }
}

fn default_vat_applicable() -> bool {
    true
}

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Transaction types this category applies to
    #[serde(rename = "type")]
    pub kind: CategoryKind,

    /// Display colour ("#RRGGBB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// When false, every transaction in this category carries zero VAT.
    /// Records written before the flag existed default to true.
    #[serde(default = "default_vat_applicable")]
    pub vat_applicable: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new VAT-applicable category without a colour
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            color: None,
            vat_applicable: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style colour setter
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder-style VAT flag setter
    pub fn with_vat_applicable(mut self, vat_applicable: bool) -> Self {
        self.vat_applicable = vat_applicable;
        self
    }

    /// Whether a transaction of the given type may reference this category
    pub fn accepts(&self, transaction_type: TransactionType) -> bool {
        self.kind.accepts(transaction_type)
    }

    /// Colour for charts, falling back to neutral grey
    pub fn display_color(&self) -> &str {
        self.color.as_deref().unwrap_or("#9CA3AF")
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(CategoryValidationError::InvalidColor(color.clone()));
            }
        }

        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::InvalidColor(color) => {
                write!(f, "Invalid colour '{}' (expected #RRGGBB)", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_accepts() {
        assert!(CategoryKind::Expense.accepts(TransactionType::Expense));
        assert!(!CategoryKind::Expense.accepts(TransactionType::Revenue));
        assert!(CategoryKind::Revenue.accepts(TransactionType::Revenue));
        assert!(!CategoryKind::Revenue.accepts(TransactionType::Expense));
        assert!(CategoryKind::Both.accepts(TransactionType::Expense));
        assert!(CategoryKind::Both.accepts(TransactionType::Revenue));
    }

    #[test]
    fn test_new_category_defaults() {
        let category = Category::new("Office", CategoryKind::Expense);
        assert!(category.vat_applicable);
        assert!(category.color.is_none());
        assert_eq!(category.display_color(), "#9CA3AF");
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Valid", CategoryKind::Both).with_color("#1a2B3c");
        assert!(category.validate().is_ok());

        category.name = "  ".into();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "x".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        category.name = "Valid".into();
        category.color = Some("red".into());
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_missing_vat_flag_defaults_to_applicable() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Legacy",
            "type": "expense",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert!(category.vat_applicable);
        assert_eq!(category.kind, CategoryKind::Expense);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Revenue".parse::<CategoryKind>(), Ok(CategoryKind::Revenue));
        assert_eq!("income".parse::<CategoryKind>(), Ok(CategoryKind::Revenue));
        assert!("other".parse::<CategoryKind>().is_err());
    }
}
