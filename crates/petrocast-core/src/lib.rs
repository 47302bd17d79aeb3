//! Core data pipeline and forecasting library for petrocast.
//!
//! This crate provides the monthly panel data model, the cleaning pipeline
//! that prepares the economic panel, the panel CSV store, and the
//! fixed-order ARIMA model used to forecast US oil production.

pub mod calendar;
pub mod error;
pub mod imputation;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod series;
pub mod store;

// Re-exports for convenience
pub use calendar::{format_date, future_months, month_start, next_month, parse_date};
pub use error::{ForecastError, Result};
pub use imputation::{fill_forward, fill_interpolate, FillMethod};
pub use metrics::{aic, mae, mse, rmse};
pub use model::{fit, ArimaOrder, FitReport, FittedModel};
pub use pipeline::{clean, CleanConfig};
pub use series::{Column, Panel, Series};
pub use store::{read_panel, write_panel, DATE_COLUMN};
