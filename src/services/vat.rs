//! VAT and amount calculation
//!
//! Derives VAT and gross total from a net amount. Every function here is pure:
//! the same inputs always give the same breakdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::settings::Settings;
use crate::error::{VatbookError, VatbookResult};
use crate::models::Money;

/// How VAT is determined for new transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VatMode {
    /// VAT is the net amount times the configured rate
    #[default]
    Auto,
    /// VAT is entered by the user
    Manual,
}

impl fmt::Display for VatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for VatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "automatic" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            other => Err(format!("Unknown VAT mode '{}' (expected auto or manual)", other)),
        }
    }
}

/// A VAT rate in basis points (1900 = 19%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VatRate(u32);

impl VatRate {
    /// German standard rate, 19%
    pub const GERMAN_STANDARD: VatRate = VatRate(1900);

    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    pub const fn basis_points(&self) -> u32 {
        self.0
    }

    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for VatRate {
    fn default() -> Self {
        Self::GERMAN_STANDARD
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{},{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

impl FromStr for VatRate {
    type Err = String;

    /// Parse "19", "19%", "7,5" or "7.5" as a percentage
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim();
        let money = Money::parse(trimmed).map_err(|_| format!("Invalid VAT rate: '{}'", s))?;
        if money.is_negative() || money.cents() > 10_000 {
            return Err(format!("VAT rate must be between 0 and 100%: '{}'", s));
        }
        // Two fractional digits of a percentage are exactly basis points
        Ok(Self(money.cents() as u32))
    }
}

/// Net amount, VAT and gross total of one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBreakdown {
    pub net: Money,
    pub vat: Money,
    pub total: Money,
}

impl AmountBreakdown {
    fn new(net: Money, vat: Money) -> Self {
        Self {
            net,
            vat,
            total: net + vat,
        }
    }

    /// Same net amount with VAT forced to zero
    ///
    /// Applied when the transaction's category is not VAT-applicable.
    pub fn without_vat(self) -> Self {
        Self::new(self.net, Money::zero())
    }
}

/// Computes VAT and totals under the configured mode and rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountCalculator {
    mode: VatMode,
    rate: VatRate,
}

impl Default for AmountCalculator {
    fn default() -> Self {
        Self::new(VatMode::Auto, VatRate::GERMAN_STANDARD)
    }
}

impl AmountCalculator {
    pub fn new(mode: VatMode, rate: VatRate) -> Self {
        Self { mode, rate }
    }

    /// Capture the VAT mode and rate from the user's settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.vat_mode(), settings.vat_rate())
    }

    pub fn mode(&self) -> VatMode {
        self.mode
    }

    pub fn rate(&self) -> VatRate {
        self.rate
    }

    /// Compute a breakdown with this calculator's mode and rate
    pub fn calculate(
        &self,
        net: Money,
        manual_vat: Option<Money>,
        vat_exempt: bool,
    ) -> VatbookResult<AmountBreakdown> {
        compute(net, self.mode, manual_vat, vat_exempt, self.rate)
    }

    /// Compute a breakdown from raw form input
    ///
    /// An unparsable amount is rejected. An empty, unparsable or negative
    /// manual VAT counts as zero.
    pub fn compute_from_form(
        &self,
        amount: &str,
        manual_vat: &str,
        vat_exempt: bool,
    ) -> VatbookResult<AmountBreakdown> {
        let net = parse_net_amount(amount)?;
        let manual = match self.mode {
            VatMode::Manual => Some(parse_manual_vat(manual_vat)),
            VatMode::Auto => None,
        };
        self.calculate(net, manual, vat_exempt)
    }
}

/// Derive VAT and total from a net amount
///
/// Exempt transactions carry no VAT. In auto mode VAT is the net amount times
/// `rate`, rounded half-up to the cent after the multiplication. In manual
/// mode the supplied VAT is used, or zero when none was given.
pub fn compute(
    net: Money,
    mode: VatMode,
    manual_vat: Option<Money>,
    vat_exempt: bool,
    rate: VatRate,
) -> VatbookResult<AmountBreakdown> {
    if !net.is_positive() {
        return Err(VatbookError::InvalidAmount(format!(
            "Amount must be greater than zero (got {})",
            net
        )));
    }

    let vat = if vat_exempt {
        Money::zero()
    } else {
        match mode {
            VatMode::Auto => net.apply_basis_points(rate.basis_points()),
            VatMode::Manual => manual_vat
                .filter(|vat| !vat.is_negative())
                .unwrap_or_default(),
        }
    };

    tracing::debug!(net = net.cents(), vat = vat.cents(), %mode, vat_exempt, "computed amounts");
    Ok(AmountBreakdown::new(net, vat))
}

/// Parse a net amount entered by the user
pub fn parse_net_amount(input: &str) -> VatbookResult<Money> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(VatbookError::InvalidAmount("Amount is required".into()));
    }

    let amount = Money::parse(trimmed)
        .map_err(|_| VatbookError::InvalidAmount(format!("'{}' is not a number", trimmed)))?;

    if !amount.is_positive() {
        return Err(VatbookError::InvalidAmount(format!(
            "Amount must be greater than zero (got {})",
            amount
        )));
    }

    Ok(amount)
}

/// Parse a manually entered VAT, falling back to zero
pub fn parse_manual_vat(input: &str) -> Money {
    Money::parse(input.trim())
        .ok()
        .filter(|vat| !vat.is_negative())
        .unwrap_or_default()
}
