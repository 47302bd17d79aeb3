//! The panel cleaning pipeline.
//!
//! One parameterized pipeline serves every deployment: each knob that can
//! differ between them is a [`CleanConfig`] field.

use chrono::NaiveDate;

use crate::calendar::month_start;
use crate::error::{ForecastError, Result};
use crate::imputation::FillMethod;
use crate::series::Panel;

/// Configuration for [`clean`].
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Earliest date retained, inclusive.
    pub cutoff: NaiveDate,
    /// Column the model trains on; rows with a missing target are dropped.
    pub target_column: String,
    /// Column whose history is too short to keep; dropped entirely.
    pub drop_column: String,
    /// Gap-filling policy for the remaining columns.
    pub fill: FillMethod,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            cutoff: NaiveDate::from_ymd_opt(2002, 1, 1).expect("2002-01-01 is a valid date"),
            target_column: "OILPRODUS".to_string(),
            drop_column: "PPIUS".to_string(),
            fill: FillMethod::default(),
        }
    }
}

/// Clean an aligned panel. Steps are order-significant:
///
/// 1. Normalize every date to the first of its month.
/// 2. Drop rows dated before the cutoff (the cutoff date itself is kept).
/// 3. Drop rows where the target value is missing. Source reporting lags
///    leave the most recent one or two months empty; the model must train
///    on real observations only.
/// 4. Drop the short-history column entirely; imputing years of missing
///    history would distort joint interpolation.
/// 5. Fill remaining gaps in the other columns per the configured policy.
///
/// Cleaning an already-clean panel returns an identical panel.
pub fn clean(panel: &Panel, cfg: &CleanConfig) -> Result<Panel> {
    let mut panel = panel.clone();

    for date in &mut panel.dates {
        *date = month_start(*date);
    }

    let keep: Vec<bool> = panel.dates.iter().map(|d| *d >= cfg.cutoff).collect();
    panel.retain_rows(&keep);
    if panel.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }

    let keep = {
        let target = panel
            .column(&cfg.target_column)
            .ok_or_else(|| ForecastError::MissingTargetColumn(cfg.target_column.clone()))?;
        if target.values.iter().all(Option::is_none) {
            return Err(ForecastError::MissingTargetColumn(cfg.target_column.clone()));
        }
        target
            .values
            .iter()
            .map(Option::is_some)
            .collect::<Vec<bool>>()
    };
    panel.retain_rows(&keep);

    panel.drop_column(&cfg.drop_column);

    for column in &mut panel.columns {
        if column.name != cfg.target_column {
            column.values = cfg.fill.apply(&column.values);
        }
    }

    Ok(panel)
}
