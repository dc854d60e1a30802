//! Shared formatting helpers
//!
//! Amounts use German notation. Whether the euro sign is shown follows the
//! `currency_display` setting, which callers pass in.

use chrono::NaiveDate;

use crate::models::Money;

/// Format an amount, with or without the euro sign
pub fn format_amount(amount: Money, show_currency: bool) -> String {
    amount.format_de(show_currency)
}

/// German date notation ("19.10.2026")
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Percentage with one decimal and a comma ("12,5%")
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value).replace('.', ",")
}

/// Percentage change with an explicit sign ("+12,5%")
pub fn format_change(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{}{}", sign, format_percentage(value))
}

/// Shorten text to `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
