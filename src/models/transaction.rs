//! Transaction model
//!
//! A transaction is a single income or expense booking. Amounts are stored as
//! net amount, VAT and gross total; the total is always derived from the other
//! two and never edited on its own.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Revenue,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Revenue => write!(f, "revenue"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "e" => Ok(Self::Expense),
            "revenue" | "income" | "r" => Ok(Self::Revenue),
            other => Err(format!(
                "Unknown transaction type '{}' (expected expense or revenue)",
                other
            )),
        }
    }
}

/// How often a recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for RecurringFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for RecurringFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annually" => Ok(Self::Yearly),
            other => Err(format!(
                "Unknown frequency '{}' (expected daily, weekly, monthly or yearly)",
                other
            )),
        }
    }
}

/// A booked income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Booking date
    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    pub category_id: CategoryId,

    pub description: String,

    /// Net amount, always positive
    pub amount: Money,

    /// VAT on top of the net amount
    pub vat: Money,

    /// Gross total, `amount + vat`
    pub total_amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Storage path of an attached invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_path: Option<String>,

    #[serde(default)]
    pub recurring: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<RecurringFrequency>,

    /// Explicitly carries zero VAT regardless of the global mode
    #[serde(default)]
    pub vat_exempt: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction without VAT
    ///
    /// Call `set_amounts` with the calculator's result to attach VAT.
    pub fn new(
        date: NaiveDate,
        kind: TransactionType,
        category_id: CategoryId,
        description: impl Into<String>,
        amount: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date,
            kind,
            category_id,
            description: description.into(),
            amount,
            vat: Money::zero(),
            total_amount: amount,
            notes: None,
            invoice_path: None,
            recurring: false,
            recurring_frequency: None,
            vat_exempt: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_revenue(&self) -> bool {
        self.kind == TransactionType::Revenue
    }

    pub fn has_invoice(&self) -> bool {
        self.invoice_path.is_some()
    }

    /// Set net amount and VAT; the total is derived
    pub fn set_amounts(&mut self, amount: Money, vat: Money) {
        self.amount = amount;
        self.vat = vat;
        self.total_amount = amount + vat;
    }

    /// Drop VAT so that the total equals the net amount
    pub fn clear_vat(&mut self) {
        self.set_amounts(self.amount, Money::zero());
    }

    /// Mark as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the amount invariants and recurrence settings
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.vat.is_negative() {
            return Err(TransactionValidationError::NegativeVat(self.vat));
        }

        if self.total_amount != self.amount + self.vat {
            return Err(TransactionValidationError::TotalMismatch {
                amount: self.amount,
                vat: self.vat,
                total: self.total_amount,
            });
        }

        if self.vat_exempt && !self.vat.is_zero() {
            return Err(TransactionValidationError::VatOnExempt(self.vat));
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        if self.recurring && self.recurring_frequency.is_none() {
            return Err(TransactionValidationError::MissingFrequency);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.description,
            self.total_amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    NegativeVat(Money),
    TotalMismatch { amount: Money, vat: Money, total: Money },
    VatOnExempt(Money),
    EmptyDescription,
    MissingFrequency,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::NegativeVat(vat) => write!(f, "VAT cannot be negative (got {})", vat),
            Self::TotalMismatch { amount, vat, total } => write!(
                f,
                "Total ({}) does not equal amount ({}) plus VAT ({})",
                total, amount, vat
            ),
            Self::VatOnExempt(vat) => {
                write!(f, "VAT-exempt transaction cannot carry VAT ({})", vat)
            }
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::MissingFrequency => {
                write!(f, "Recurring transactions need a frequency")
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            TransactionType::Expense,
            CategoryId::new(),
            "Printer paper",
            Money::from_cents(10_000),
        )
    }

    #[test]
    fn test_new_transaction_has_no_vat() {
        let txn = sample();
        assert_eq!(txn.vat, Money::zero());
        assert_eq!(txn.total_amount, txn.amount);
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_set_amounts_derives_total() {
        let mut txn = sample();
        txn.set_amounts(Money::from_cents(5_000), Money::from_cents(500));
        assert_eq!(txn.total_amount, Money::from_cents(5_500));

        txn.clear_vat();
        assert_eq!(txn.vat, Money::zero());
        assert_eq!(txn.total_amount, Money::from_cents(5_000));
    }

    #[test]
    fn test_validation_rejects_broken_invariants() {
        let mut txn = sample();
        txn.amount = Money::zero();
        txn.total_amount = Money::zero();
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));

        let mut txn = sample();
        txn.total_amount = Money::from_cents(1);
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::TotalMismatch { .. })
        ));

        let mut txn = sample();
        txn.vat_exempt = true;
        txn.set_amounts(txn.amount, Money::from_cents(100));
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::VatOnExempt(_))
        ));

        let mut txn = sample();
        txn.recurring = true;
        assert_eq!(txn.validate(), Err(TransactionValidationError::MissingFrequency));
        txn.recurring_frequency = Some(RecurringFrequency::Monthly);
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_serialization_uses_type_key() {
        let txn = sample();
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert!(json.get("notes").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Revenue));
        assert_eq!("weekly".parse::<RecurringFrequency>(), Ok(RecurringFrequency::Weekly));
        assert!("hourly".parse::<RecurringFrequency>().is_err());
    }
}
