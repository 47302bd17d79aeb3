//! Load-once forecast service shared by all request handlers.
//!
//! The panel and the model artifact are read exactly once, at startup, and
//! are never mutated afterwards, so the service is safe to share behind an
//! `Arc` across concurrent handlers. Forecasting is a pure query.

use chrono::NaiveDate;
use serde::Serialize;

use petrocast_core::{
    future_months, read_panel, FittedModel, ForecastError, Result,
};

use crate::config::AppConfig;

/// Which dashboard input a forecast request came from. Both ranges run the
/// same operation; only the bound and the default differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonRange {
    Short,
    Long,
}

impl HorizonRange {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Self::Short),
            "long" => Some(Self::Long),
            _ => None,
        }
    }
}

/// A computed forecast, display-ready: month-start dates paired with
/// values rounded to two decimals.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// The read-only serving state: model, historical target series, bounds.
#[derive(Debug)]
pub struct ForecastService {
    model: FittedModel,
    history_dates: Vec<NaiveDate>,
    history_values: Vec<f64>,
    last_observed: NaiveDate,
    display_from: NaiveDate,
    short_max: usize,
    short_default: usize,
    long_max: usize,
    long_default: usize,
}

impl ForecastService {
    /// Load the panel and the model artifact.
    ///
    /// Fails with `DataFileNotFound` / `SchemaMismatch` when the panel is
    /// absent or lacks the expected columns, and `ModelNotLoaded` when the
    /// artifact is absent or undeserializable.
    pub fn load(cfg: &AppConfig) -> Result<Self> {
        let panel = read_panel(&cfg.panel_path())?;
        let (history_dates, history_values) = panel.observed(&cfg.clean.target_column)?;
        let last_observed = history_dates
            .last()
            .copied()
            .ok_or_else(|| ForecastError::MissingTargetColumn(cfg.clean.target_column.clone()))?;

        let model = FittedModel::load(&cfg.model_path())?;

        Ok(Self {
            model,
            history_dates,
            history_values,
            last_observed,
            display_from: cfg.display_from,
            short_max: cfg.short_horizon_max,
            short_default: cfg.short_horizon_default,
            long_max: cfg.long_horizon_max,
            long_default: cfg.long_horizon_default,
        })
    }

    pub fn last_observed(&self) -> NaiveDate {
        self.last_observed
    }

    pub fn max_horizon(&self, range: HorizonRange) -> usize {
        match range {
            HorizonRange::Short => self.short_max,
            HorizonRange::Long => self.long_max,
        }
    }

    pub fn default_horizon(&self, range: HorizonRange) -> usize {
        match range {
            HorizonRange::Short => self.short_default,
            HorizonRange::Long => self.long_default,
        }
    }

    /// Compute a forecast for `horizon` months.
    ///
    /// The horizon is validated against the range's bound before any
    /// computation. The model is invoked once for the full horizon; future
    /// dates start the month after the panel's last observed date.
    pub fn forecast(&self, range: HorizonRange, horizon: i64) -> Result<Forecast> {
        let max = self.max_horizon(range);
        if horizon < 1 || horizon > max as i64 {
            return Err(ForecastError::InvalidHorizon { horizon, max });
        }
        let steps = horizon as usize;

        let values: Vec<f64> = self
            .model
            .forecast(steps)
            .into_iter()
            .map(round2)
            .collect();
        let dates = future_months(self.last_observed, steps);

        Ok(Forecast { dates, values })
    }

    /// Historical target observations from the display cutoff onward, for
    /// the dashboard's historical line.
    pub fn history(&self) -> (Vec<NaiveDate>, Vec<f64>) {
        let mut dates = Vec::new();
        let mut values = Vec::new();
        for (date, value) in self.history_dates.iter().zip(&self.history_values) {
            if *date >= self.display_from {
                dates.push(*date);
                values.push(*value);
            }
        }
        (dates, values)
    }

    /// Render a forecast as the downloadable CSV table.
    pub fn to_csv(forecast: &Forecast) -> String {
        let mut out = String::from("Date,Forecasted_Oil_Production\n");
        for (date, value) in forecast.dates.iter().zip(&forecast.values) {
            out.push_str(&format!("{},{:.2}\n", date.format("%Y-%m-%d"), value));
        }
        out
    }
}

/// Round to the dashboard's display precision.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(310.5551), 310.56);
        assert_eq!(round2(-1.005), -1.0);
        assert_eq!(round2(12.0), 12.0);
    }

    #[test]
    fn test_horizon_range_parse() {
        assert_eq!(HorizonRange::parse("short"), Some(HorizonRange::Short));
        assert_eq!(HorizonRange::parse("long"), Some(HorizonRange::Long));
        assert_eq!(HorizonRange::parse("medium"), None);
    }

    #[test]
    fn test_forecast_csv_rendering() {
        let forecast = Forecast {
            dates: vec![
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ],
            values: vec![310.5, 311.25],
        };
        let csv = ForecastService::to_csv(&forecast);
        assert_eq!(
            csv,
            "Date,Forecasted_Oil_Production\n2025-01-01,310.50\n2025-02-01,311.25\n"
        );
    }
}
