//! Calendar periods used by the reports
//!
//! `MonthKey` identifies a calendar month bucket; `ReportTimeframe` selects the
//! month, quarter or year a report covers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Full German month name for a 1-based month number
pub fn german_month_name(month: u32) -> &'static str {
    let idx = (month.clamp(1, 12) - 1) as usize;
    GERMAN_MONTHS[idx]
}

/// A calendar month, compared by (year, month)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Create a month key; `month` is 1-based
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    /// The month a date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The month `n` months before this one
    pub fn months_before(&self, n: u32) -> Self {
        Self::from_index(self.index() - n as i64)
    }

    pub fn prev(&self) -> Self {
        self.months_before(1)
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Whether a date belongs to this month (year and month equality)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Chart label: 3-letter German month abbreviation plus year ("Okt 2026")
    pub fn short_label(&self) -> String {
        let abbrev: String = german_month_name(self.month).chars().take(3).collect();
        format!("{} {}", abbrev, self.year)
    }

    /// Long label: full German month name plus year ("Oktober 2026")
    pub fn long_label(&self) -> String {
        format!("{} {}", german_month_name(self.month), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The span a profit & loss, VAT or expense report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTimeframe {
    /// From the first day of the reference month
    #[default]
    Month,
    /// From the first day of the reference quarter
    Quarter,
    /// From January 1st of the reference year
    Year,
}

impl ReportTimeframe {
    /// First day included in the report
    pub fn start_date(&self, reference: NaiveDate) -> NaiveDate {
        let month = match self {
            Self::Month => reference.month(),
            Self::Quarter => ((reference.month() - 1) / 3) * 3 + 1,
            Self::Year => 1,
        };
        // Day 1 exists for every month, so this never falls back
        NaiveDate::from_ymd_opt(reference.year(), month, 1).unwrap_or(reference)
    }

    /// Whether a transaction date falls inside the report
    ///
    /// Reports have no upper bound: future-dated entries are included.
    pub fn includes(&self, date: NaiveDate, reference: NaiveDate) -> bool {
        date >= self.start_date(reference)
    }

    /// Human-readable label ("Oktober 2026", "Q4 2026", "2026")
    pub fn label(&self, reference: NaiveDate) -> String {
        match self {
            Self::Month => MonthKey::from_date(reference).long_label(),
            Self::Quarter => format!("Q{} {}", (reference.month() - 1) / 3 + 1, reference.year()),
            Self::Year => reference.year().to_string(),
        }
    }
}

impl fmt::Display for ReportTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month => write!(f, "month"),
            Self::Quarter => write!(f, "quarter"),
            Self::Year => write!(f, "year"),
        }
    }
}

impl FromStr for ReportTimeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "m" => Ok(Self::Month),
            "quarter" | "q" => Ok(Self::Quarter),
            "year" | "y" => Ok(Self::Year),
            other => Err(format!(
                "Unknown timeframe '{}' (expected month, quarter or year)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_months_before_crosses_year() {
        let key = MonthKey::new(2026, 2);
        assert_eq!(key.months_before(1), MonthKey::new(2026, 1));
        assert_eq!(key.months_before(2), MonthKey::new(2025, 12));
        assert_eq!(key.months_before(14), MonthKey::new(2024, 12));
        assert_eq!(MonthKey::new(2025, 12).next(), MonthKey::new(2026, 1));
    }

    #[test]
    fn test_month_end_does_not_skip_months() {
        // Stepping back from the 31st must still land in February
        let key = MonthKey::from_date(date(2026, 3, 31));
        assert_eq!(key.prev(), MonthKey::new(2026, 2));
    }

    #[test]
    fn test_contains_uses_year_and_month() {
        let key = MonthKey::new(2026, 10);
        assert!(key.contains(date(2026, 10, 1)));
        assert!(key.contains(date(2026, 10, 31)));
        assert!(!key.contains(date(2025, 10, 15)));
        assert!(!key.contains(date(2026, 11, 1)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(MonthKey::new(2026, 10).short_label(), "Okt 2026");
        assert_eq!(MonthKey::new(2026, 3).short_label(), "Mär 2026");
        assert_eq!(MonthKey::new(2026, 5).long_label(), "Mai 2026");
        assert_eq!(MonthKey::new(2026, 5).to_string(), "2026-05");
    }

    #[test]
    fn test_timeframe_start_dates() {
        let reference = date(2026, 8, 17);
        assert_eq!(ReportTimeframe::Month.start_date(reference), date(2026, 8, 1));
        assert_eq!(ReportTimeframe::Quarter.start_date(reference), date(2026, 7, 1));
        assert_eq!(ReportTimeframe::Year.start_date(reference), date(2026, 1, 1));
        assert_eq!(ReportTimeframe::Quarter.start_date(date(2026, 3, 31)), date(2026, 1, 1));
    }

    #[test]
    fn test_timeframe_labels() {
        let reference = date(2026, 10, 19);
        assert_eq!(ReportTimeframe::Month.label(reference), "Oktober 2026");
        assert_eq!(ReportTimeframe::Quarter.label(reference), "Q4 2026");
        assert_eq!(ReportTimeframe::Year.label(reference), "2026");
    }

    #[test]
    fn test_timeframe_includes_future_dates() {
        let reference = date(2026, 10, 19);
        assert!(ReportTimeframe::Month.includes(date(2026, 12, 1), reference));
        assert!(!ReportTimeframe::Month.includes(date(2026, 9, 30), reference));
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("Quarter".parse::<ReportTimeframe>(), Ok(ReportTimeframe::Quarter));
        assert_eq!("y".parse::<ReportTimeframe>(), Ok(ReportTimeframe::Year));
        assert!("decade".parse::<ReportTimeframe>().is_err());
    }
}
