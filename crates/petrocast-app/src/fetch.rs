//! Remote series retrieval from the econdb API.
//!
//! One attempt per ticker per run. A failed fetch is logged and yields an
//! empty series so the rest of the pipeline keeps going; the aligner turns
//! it into an entirely-missing column.

use std::time::Duration;

use anyhow::{anyhow, Context};
use tracing::{info, warn};

use petrocast_core::{parse_date, Series};

use crate::config::{AppConfig, INDICATORS};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch every configured indicator, in table order.
pub fn fetch_all(cfg: &AppConfig) -> Vec<Series> {
    INDICATORS
        .iter()
        .map(|indicator| fetch_series(cfg, indicator.ticker))
        .collect()
}

/// Fetch one ticker as a monthly series.
///
/// Transport and parse failures degrade to an empty series.
pub fn fetch_series(cfg: &AppConfig, ticker: &str) -> Series {
    match try_fetch(cfg, ticker) {
        Ok(series) => {
            info!(ticker, rows = series.len(), "fetched series");
            series
        }
        Err(err) => {
            warn!(ticker, error = %err, "fetch failed; continuing with empty series");
            Series::new(ticker)
        }
    }
}

fn try_fetch(cfg: &AppConfig, ticker: &str) -> anyhow::Result<Series> {
    let url = format!(
        "{}/api/series/{}/?format=csv&frequency=M&token={}",
        cfg.base_url, ticker, cfg.api_token
    );
    let body = ureq::get(&url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .with_context(|| format!("request for {} failed", ticker))?
        .into_string()
        .context("response body was not valid UTF-8")?;
    parse_series_csv(ticker, &body)
}

/// Parse the remote CSV payload: a `Date` column plus one value column.
pub fn parse_series_csv(ticker: &str, body: &str) -> anyhow::Result<Series> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("date"))
        .ok_or_else(|| anyhow!("response has no Date column"))?;
    let value_idx = (0..headers.len())
        .find(|&i| i != date_idx)
        .ok_or_else(|| anyhow!("response has no value column"))?;

    let mut series = Series::new(ticker);
    for record in reader.records() {
        let record = record?;
        let date = parse_date(record.get(date_idx).unwrap_or_default())?;
        let cell = record.get(value_idx).unwrap_or_default().trim();
        let value = if cell.is_empty() {
            None
        } else {
            Some(
                cell.parse::<f64>()
                    .with_context(|| format!("invalid value '{}' for {}", cell, ticker))?,
            )
        };
        series.push(date, value);
    }
    series.sort_by_date();
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_parse_series_csv() {
        let body = "Date,OILPRODUS\n2002-01-01,310.5\n2002-02-01,\n2002-03-01,312.0\n";
        let series = parse_series_csv("OILPRODUS", body).unwrap();

        assert_eq!(series.name, "OILPRODUS");
        assert_eq!(
            series.points,
            vec![
                (date(2002, 1), Some(310.5)),
                (date(2002, 2), None),
                (date(2002, 3), Some(312.0)),
            ]
        );
    }

    #[test]
    fn test_parse_series_csv_sorts_rows() {
        let body = "Date,GDPUS\n2002-03-01,3.0\n2002-01-01,1.0\n";
        let series = parse_series_csv("GDPUS", body).unwrap();
        assert_eq!(series.points[0].0, date(2002, 1));
        assert_eq!(series.points[1].0, date(2002, 3));
    }

    #[test]
    fn test_parse_series_csv_rejects_missing_date_column() {
        let body = "Month,GDPUS\n2002-01-01,1.0\n";
        assert!(parse_series_csv("GDPUS", body).is_err());
    }

    #[test]
    fn test_parse_series_csv_rejects_garbage() {
        assert!(parse_series_csv("GDPUS", "<html>rate limited</html>").is_err());
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty_series() {
        // Unresolvable host: the request itself fails, and the caller gets
        // an empty series instead of an error.
        let mut cfg = AppConfig::with_data_dir(std::path::Path::new("unused"));
        cfg.base_url = "http://econdb.invalid".to_string();
        let series = fetch_series(&cfg, "OILPRODUS");
        assert!(series.is_empty());
    }
}
