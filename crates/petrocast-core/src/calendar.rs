//! Calendar-month arithmetic for the monthly panel.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{ForecastError, Result};

/// Canonical date format used across the panel file and the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize a date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The first day of the month after `date`.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    month_start(date).checked_add_months(Months::new(1))
}

/// Consecutive month-start dates for the `horizon` months following `last`.
///
/// The first entry is the month after `last`, so a December observation
/// yields a January-first forecast date.
pub fn future_months(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    let start = month_start(last);
    (1..=horizon)
        .filter_map(|step| start.checked_add_months(Months::new(step as u32)))
        .collect()
}

/// Parse a canonical `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ForecastError::InvalidDate(s.to_string()))
}

/// Format a date in the canonical `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2024, 12, 17)), date(2024, 12, 1));
        assert_eq!(month_start(date(2024, 12, 1)), date(2024, 12, 1));
    }

    #[test]
    fn test_next_month_year_boundary() {
        assert_eq!(next_month(date(2024, 12, 1)), Some(date(2025, 1, 1)));
        assert_eq!(next_month(date(2024, 12, 31)), Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_future_months_sequence() {
        let dates = future_months(date(2024, 12, 1), 6);
        assert_eq!(dates.len(), 6);
        assert_eq!(dates[0], date(2025, 1, 1));
        assert_eq!(dates[5], date(2025, 6, 1));
        for pair in dates.windows(2) {
            assert_eq!(next_month(pair[0]), Some(pair[1]));
        }
    }

    #[test]
    fn test_future_months_zero_horizon() {
        assert!(future_months(date(2024, 12, 1), 0).is_empty());
    }

    #[test]
    fn test_parse_date_roundtrip() {
        let parsed = parse_date("2002-01-01").unwrap();
        assert_eq!(parsed, date(2002, 1, 1));
        assert_eq!(format_date(parsed), "2002-01-01");
    }

    #[test]
    fn test_parse_date_rejects_other_forms() {
        assert!(parse_date("01-01-2002").is_err());
        assert!(parse_date("not a date").is_err());
    }
}
