//! Application configuration.
//!
//! No ambient module state: every knob is an explicit field here,
//! constructed once in `main` and passed down. The API token is the only
//! secret and comes from the environment.

use std::env;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use petrocast_core::{ArimaOrder, CleanConfig};

/// One remote indicator: short key and econdb ticker.
#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    pub key: &'static str,
    pub ticker: &'static str,
}

/// The monthly indicators the panel is built from. The oil-production
/// series is the forecast target; the rest are context columns.
pub const INDICATORS: &[Indicator] = &[
    Indicator { key: "oil", ticker: "OILPRODUS" },
    Indicator { key: "gdp", ticker: "GDPUS" },
    Indicator { key: "indprod", ticker: "IPUS" },
    Indicator { key: "private_cons", ticker: "RPRCUS" },
    Indicator { key: "cpi", ticker: "CPIUS" },
    Indicator { key: "ppi", ticker: "PPIUS" },
    Indicator { key: "capform", ticker: "RGFCFUS" },
    Indicator { key: "cab", ticker: "CAUS" },
    Indicator { key: "yield10y", ticker: "Y10YDUS" },
];

/// Runtime configuration for every petrocast command.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the panel file and the model artifact.
    pub data_dir: PathBuf,
    /// Base URL of the remote series source.
    pub base_url: String,
    /// Per-deployment access token for the remote series source.
    pub api_token: String,
    /// Cleaning-pipeline parameters.
    pub clean: CleanConfig,
    /// Fixed, pre-selected model order.
    pub order: ArimaOrder,
    /// Earliest date shown on the dashboard's historical line.
    pub display_from: NaiveDate,
    /// Upper bound for short-term forecast requests, in months.
    pub short_horizon_max: usize,
    /// Default short-term horizon.
    pub short_horizon_default: usize,
    /// Upper bound for long-term forecast requests, in months.
    pub long_horizon_max: usize,
    /// Default long-term horizon.
    pub long_horizon_default: usize,
}

impl AppConfig {
    /// Build the configuration from environment variables, with defaults
    /// matching the production deployment.
    pub fn from_env() -> Self {
        let data_dir = env::var("PETROCAST_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let base_url = env::var("ECONDB_BASE_URL")
            .unwrap_or_else(|_| "https://www.econdb.com".to_string());
        let api_token = env::var("ECONDB_TOKEN").unwrap_or_default();

        Self {
            data_dir: PathBuf::from(data_dir),
            base_url,
            api_token,
            clean: CleanConfig::default(),
            order: ArimaOrder::new(9, 1, 10),
            display_from: NaiveDate::from_ymd_opt(2000, 1, 1)
                .expect("2000-01-01 is a valid date"),
            short_horizon_max: 60,
            short_horizon_default: 12,
            long_horizon_max: 120,
            long_horizon_default: 24,
        }
    }

    /// Same defaults, rooted at an explicit data directory.
    pub fn with_data_dir(dir: &Path) -> Self {
        let mut cfg = Self::from_env();
        cfg.data_dir = dir.to_path_buf();
        cfg
    }

    /// Path of the panel CSV file.
    pub fn panel_path(&self) -> PathBuf {
        self.data_dir.join("economic_data.csv")
    }

    /// Path of the serialized model artifact.
    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join("arima_model.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_table_contains_target_and_dropped_column() {
        assert!(INDICATORS.iter().any(|i| i.ticker == "OILPRODUS"));
        assert!(INDICATORS.iter().any(|i| i.ticker == "PPIUS"));
        assert_eq!(INDICATORS.len(), 9);
    }

    #[test]
    fn test_paths_derive_from_data_dir() {
        let cfg = AppConfig::with_data_dir(Path::new("/tmp/petrocast"));
        assert_eq!(
            cfg.panel_path(),
            PathBuf::from("/tmp/petrocast/economic_data.csv")
        );
        assert_eq!(
            cfg.model_path(),
            PathBuf::from("/tmp/petrocast/arima_model.json")
        );
    }
}
