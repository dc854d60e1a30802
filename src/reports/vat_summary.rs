//! VAT summary
//!
//! Collected VAT comes from revenue, paid VAT from expenses. A positive
//! balance is owed to the tax office, anything else is a refund.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::display::format_amount;
use crate::error::VatbookResult;
use crate::models::{Money, ReportTimeframe, Transaction};

use super::in_timeframe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VatPosition {
    /// VAT must be paid to the tax office
    Payable,
    /// VAT is refunded (also when the balance is zero)
    Refund,
}

impl fmt::Display for VatPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payable => write!(f, "payable"),
            Self::Refund => write!(f, "refund"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VatSummary {
    pub timeframe: ReportTimeframe,
    pub label: String,
    pub vat_collected: Money,
    pub vat_paid: Money,
    /// Collected minus paid
    pub balance: Money,
    pub position: VatPosition,
}

impl VatSummary {
    pub fn generate(
        transactions: &[Transaction],
        timeframe: ReportTimeframe,
        reference: NaiveDate,
    ) -> Self {
        let selected = in_timeframe(transactions, timeframe, reference);

        let vat_collected = selected
            .iter()
            .filter(|t| t.is_revenue())
            .map(|t| t.vat)
            .sum::<Money>();
        let vat_paid = selected
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.vat)
            .sum::<Money>();
        let balance = vat_collected - vat_paid;

        Self {
            timeframe,
            label: timeframe.label(reference),
            vat_collected,
            vat_paid,
            balance,
            position: if balance.is_positive() {
                VatPosition::Payable
            } else {
                VatPosition::Refund
            },
        }
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, show_currency: bool) -> String {
        let amount = |m: Money| format_amount(m, show_currency);
        let mut output = String::new();

        output.push_str(&format!("VAT Summary: {}\n", self.label));
        output.push_str(&"=".repeat(44));
        output.push('\n');
        output.push_str(&format!("{:<26} {:>16}\n", "VAT collected (revenue):", amount(self.vat_collected)));
        output.push_str(&format!("{:<26} {:>16}\n", "VAT paid (expenses):", amount(self.vat_paid)));
        output.push_str(&"-".repeat(44));
        output.push('\n');

        let label = match self.position {
            VatPosition::Payable => "VAT payable:",
            VatPosition::Refund => "VAT refund:",
        };
        output.push_str(&format!("{:<26} {:>16}\n", label, amount(self.balance.abs())));

        output
    }

    /// Export the summary to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> VatbookResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Period", "VAT Collected", "VAT Paid", "Balance", "Position"])?;
        csv.write_record([
            self.label.clone(),
            self.vat_collected.to_decimal_string(),
            self.vat_paid.to_decimal_string(),
            self.balance.to_decimal_string(),
            self.position.to_string(),
        ])?;
        csv.flush()?;
        Ok(())
    }
}
