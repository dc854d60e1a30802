//! Money type for representing euro amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic, half-up rounding for rate calculations,
//! and German (de-DE) formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as euro cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use vatbook::models::Money;
    /// let amount = Money::from_cents(1050); // 10,50 €
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from euros and cents
    ///
    /// # Examples
    /// ```
    /// use vatbook::models::Money;
    /// let amount = Money::from_euros_cents(10, 50);
    /// assert_eq!(amount.cents(), 1050);
    /// ```
    pub const fn from_euros_cents(euros: i64, cents: i64) -> Self {
        Self(euros * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole euros portion (truncated toward zero)
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Amount as a floating point number of euros (for percentages only)
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a rate given in basis points, rounding half-up to the cent
    ///
    /// Rounding happens once, after the multiplication. Halves round away
    /// from zero so that negative amounts mirror positive ones.
    pub fn apply_basis_points(&self, basis_points: u32) -> Self {
        let product = self.0 as i128 * basis_points as i128;
        let half = 5_000i128;
        let rounded = if product >= 0 {
            (product + half) / 10_000
        } else {
            (product - half) / 10_000
        };
        Self(rounded as i64)
    }

    /// Parse a money amount from user input
    ///
    /// Accepts "10.50", "10,50", "1.234,56", "1,234.56", "10", "-10.50",
    /// optionally with a "€" or "EUR" marker. More than two fractional
    /// digits are rounded half-up.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s;
        let mut s = s.trim().to_string();
        for marker in ["EUR", "€"] {
            s = s.replace(marker, "");
        }
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped.trim()),
            None => (false, s),
        };

        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        let (integer_part, fraction_part) = split_decimal(s)
            .ok_or_else(|| MoneyParseError::InvalidFormat(original.to_string()))?;

        let integer_digits: String = integer_part.chars().filter(|c| *c != '.' && *c != ',').collect();
        if integer_digits.is_empty() && fraction_part.is_empty() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }
        if !integer_digits.chars().all(|c| c.is_ascii_digit())
            || !fraction_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        let euros: i64 = if integer_digits.is_empty() {
            0
        } else {
            integer_digits
                .parse()
                .map_err(|_| MoneyParseError::InvalidFormat(original.to_string()))?
        };

        let digits: Vec<i64> = fraction_part
            .chars()
            .filter_map(|c| c.to_digit(10).map(i64::from))
            .collect();
        let mut cents = digits.first().copied().unwrap_or(0) * 10 + digits.get(1).copied().unwrap_or(0);
        if digits.get(2).copied().unwrap_or(0) >= 5 {
            cents += 1;
        }

        let total = euros
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(|| MoneyParseError::InvalidFormat(original.to_string()))?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format in German notation, optionally with the euro sign
    ///
    /// `1234.5` becomes `"1.234,50 €"` or `"1.234,50"`.
    pub fn format_de(&self, show_currency: bool) -> String {
        let euros = self.euros().abs().to_string();
        let mut grouped = String::with_capacity(euros.len() + euros.len() / 3);
        for (i, ch) in euros.chars().enumerate() {
            if i > 0 && (euros.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        let number = format!("{}{},{:02}", sign, grouped, self.cents_part());
        if show_currency {
            format!("{} €", number)
        } else {
            number
        }
    }

    /// Plain decimal representation with a dot separator ("1234.50")
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }
}

/// Split into integer and fraction parts, deciding which separator is decimal
fn split_decimal(s: &str) -> Option<(&str, &str)> {
    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');

    let decimal_at = match (last_dot, last_comma) {
        (Some(d), Some(c)) => Some(d.max(c)),
        (None, Some(c)) => {
            // A single comma is the German decimal separator
            if s.matches(',').count() == 1 {
                Some(c)
            } else {
                None
            }
        }
        (Some(d), None) => {
            // Several dots can only be German thousands separators
            if s.matches('.').count() == 1 {
                Some(d)
            } else {
                None
            }
        }
        (None, None) => None,
    };

    match decimal_at {
        Some(idx) => {
            let (integer, fraction) = s.split_at(idx);
            let decimal_char = &fraction[..1];
            let fraction = &fraction[1..];
            if fraction.contains('.') || fraction.contains(',') || integer.contains(decimal_char) {
                return None;
            }
            Some((integer, fraction))
        }
        None => Some((s, "")),
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_de(true))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
