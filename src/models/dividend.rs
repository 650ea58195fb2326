use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DataSource;

pub const DEFAULT_DIVIDEND_KIND: &str = "Dividend";

/// A single dividend/earning payment.
///
/// `payment_date` is kept verbatim (`YYYY-MM-DD[ HH:MM:SS]`) and parsed on
/// demand so that malformed dates survive lenient paths untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    pub asset: String,
    pub payment_date: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    pub source: DataSource,
}

fn default_kind() -> String {
    DEFAULT_DIVIDEND_KIND.to_string()
}

impl DividendRecord {
    pub fn new(
        asset: impl Into<String>,
        payment_date: impl Into<String>,
        value: f64,
        source: DataSource,
    ) -> Self {
        Self {
            asset: asset.into(),
            payment_date: payment_date.into(),
            kind: default_kind(),
            value,
            quantity: None,
            source,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        self.kind = if kind.trim().is_empty() {
            default_kind()
        } else {
            kind
        };
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Calendar date of the payment, ignoring any time component.
    pub fn date(&self) -> Option<NaiveDate> {
        let day_part = self
            .payment_date
            .trim()
            .split(|c: char| c == ' ' || c == 'T')
            .next()?;
        NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
    }

    /// Leading four-digit year of `payment_date`, read by splitting on `-`.
    pub fn payment_year(&self) -> Option<i32> {
        let year = self.payment_date.trim().split('-').next()?;
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        year.parse().ok()
    }

    /// `(year, month)` of the payment, when both components are well formed.
    pub fn year_month(&self) -> Option<(i32, u32)> {
        let year = self.payment_year()?;
        let month = self.payment_date.trim().split('-').nth(1)?;
        if month.len() != 2 || !month.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let month: u32 = month.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> DividendRecord {
        DividendRecord::new("PETR4", date, 1.0, DataSource::Supabase)
    }

    #[test]
    fn date_accepts_time_suffix() {
        let r = record("2024-03-15 10:30:00");
        assert_eq!(r.date(), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(r.year_month(), Some((2024, 3)));
    }

    #[test]
    fn malformed_dates_have_no_components() {
        let r = record("not-a-date");
        assert_eq!(r.date(), None);
        assert_eq!(r.payment_year(), None);
        assert_eq!(r.year_month(), None);
    }

    #[test]
    fn year_is_read_even_when_day_is_invalid() {
        let r = record("2024-02-31");
        assert_eq!(r.date(), None);
        assert_eq!(r.payment_year(), Some(2024));
        assert_eq!(r.year_month(), Some((2024, 2)));
    }

    #[test]
    fn empty_kind_falls_back_to_dividend() {
        let r = record("2024-01-01").with_kind("  ");
        assert_eq!(r.kind, DEFAULT_DIVIDEND_KIND);
        let r = record("2024-01-01").with_kind("JCP");
        assert_eq!(r.kind, "JCP");
    }
}
