//! Fixed-order ARIMA estimation and forecasting.
//!
//! The model is estimated in two least-squares stages (Hannan-Rissanen):
//! a long autoregression on the differenced series recovers innovation
//! estimates, then the differenced series is regressed on its own lags and
//! the innovation lags to obtain the AR and MA coefficients. Forecasting
//! iterates the fitted recursion with zero future innovations and
//! integrates the differences back to the original scale, so a single call
//! produces an internally consistent path for the whole horizon.

use std::fmt;
use std::fs;
use std::path::Path;

use anofox_regression::prelude::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::future_months;
use crate::error::{ForecastError, Result};
use crate::metrics;

/// Non-seasonal ARIMA order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive lag count.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
    /// Moving-average lag count.
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Order of the long autoregression used to estimate innovations.
    fn long_ar(&self) -> usize {
        (self.p + self.q).max(self.p.max(self.q) + 1)
    }

    /// Minimum observations required to estimate this order: differencing,
    /// the innovation-stage warmup, and p + q + 1 regression rows.
    pub fn min_observations(&self) -> usize {
        self.d + self.long_ar() + 2 * self.q + self.p + 1
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Fit diagnostics, surfaced for logging only; nothing downstream consumes
/// them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitReport {
    /// Akaike Information Criterion of the fit.
    pub aic: f64,
    /// One-step-ahead in-sample RMSE.
    pub rmse: f64,
}

/// A fitted, immutable ARIMA model.
///
/// Carries everything needed to forecast without the training series, so
/// the serialized artifact is self-describing. A refreshed panel produces a
/// new model; an existing one is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel {
    pub order: ArimaOrder,
    /// Name of the column the model was trained on.
    pub target_column: String,
    /// Last date of the training series.
    pub last_observed: NaiveDate,
    pub report: FitReport,
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    /// Last `p` values of the differenced series, oldest first.
    diff_tail: Vec<f64>,
    /// Last `q` in-sample innovations, oldest first.
    residual_tail: Vec<f64>,
    /// Last value at each integration level, original series first.
    integration_heads: Vec<f64>,
}

/// Fit an ARIMA model of the given order to `series`.
///
/// `target_column` and `last_observed` are recorded in the artifact so the
/// forecast server can reconstruct forecast dates without the training
/// panel. Fails fast with `InsufficientData` when the series is shorter
/// than the order requires.
pub fn fit(
    series: &[f64],
    order: ArimaOrder,
    target_column: &str,
    last_observed: NaiveDate,
) -> Result<FittedModel> {
    if series.len() < order.min_observations() {
        return Err(ForecastError::InsufficientData {
            needed: order.min_observations(),
            got: series.len(),
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::Computation(
            "Series contains non-finite values".to_string(),
        ));
    }

    // Difference d times, keeping the tail of each level for integration.
    let mut integration_heads = Vec::with_capacity(order.d);
    let mut work: Vec<f64> = series.to_vec();
    for _ in 0..order.d {
        integration_heads.push(*work.last().expect("length validated above"));
        work = difference(&work);
    }
    let n = work.len();

    let (intercept, ar, ma) = if order.p + order.q == 0 {
        // Pure random walk with drift: the mean of the differenced series
        // is the only parameter.
        (work.iter().sum::<f64>() / n as f64, Vec::new(), Vec::new())
    } else {
        estimate_arma(&work, order)?
    };

    // One-step in-sample pass for innovations and fit diagnostics.
    let warmup = order.p.max(order.q);
    let mut residuals = vec![0.0; n];
    let mut fitted = vec![0.0; n];
    for t in warmup..n {
        let mut pred = intercept;
        for (j, phi) in ar.iter().enumerate() {
            pred += phi * work[t - 1 - j];
        }
        for (j, theta) in ma.iter().enumerate() {
            pred += theta * residuals[t - 1 - j];
        }
        fitted[t] = pred;
        residuals[t] = work[t] - pred;
    }

    let sse: f64 = residuals[warmup..].iter().map(|r| r * r).sum();
    let k = order.p + order.q + 1;
    let report = FitReport {
        aic: metrics::aic(sse, n - warmup, k),
        rmse: metrics::rmse(&work[warmup..], &fitted[warmup..])?,
    };

    let diff_tail = work[n - order.p.min(n)..].to_vec();
    let residual_tail = residuals[n - order.q.min(n)..].to_vec();

    Ok(FittedModel {
        order,
        target_column: target_column.to_string(),
        last_observed,
        report,
        intercept,
        ar,
        ma,
        diff_tail,
        residual_tail,
        integration_heads,
    })
}

/// Two-stage Hannan-Rissanen estimation on the differenced series.
fn estimate_arma(work: &[f64], order: ArimaOrder) -> Result<(f64, Vec<f64>, Vec<f64>)> {
    let n = work.len();
    let m = order.long_ar();

    // Stage one: long autoregression recovers innovation estimates. Skipped
    // for pure AR models, which need no innovation regressors.
    let innovations = if order.q > 0 {
        let y: Vec<f64> = work[m..].to_vec();
        let x: Vec<Vec<f64>> = (0..m)
            .map(|lag| (m..n).map(|t| work[t - 1 - lag]).collect())
            .collect();
        let (_, _, residuals) = fit_ols(&y, &x)?;
        let mut innovations = vec![0.0; n];
        innovations[m..].copy_from_slice(&residuals);
        innovations
    } else {
        vec![0.0; n]
    };

    // Stage two: regress on AR lags and innovation lags. Rows start where
    // every regressor is a real value, not a warmup zero.
    let start = if order.q > 0 {
        order.p.max(m + order.q)
    } else {
        order.p
    };
    let y: Vec<f64> = work[start..].to_vec();
    let mut x: Vec<Vec<f64>> = Vec::with_capacity(order.p + order.q);
    for lag in 0..order.p {
        x.push((start..n).map(|t| work[t - 1 - lag]).collect());
    }
    for lag in 0..order.q {
        x.push((start..n).map(|t| innovations[t - 1 - lag]).collect());
    }
    let (intercept, coeffs, _) = fit_ols(&y, &x)?;

    let ar = coeffs[..order.p].to_vec();
    let ma = coeffs[order.p..].to_vec();
    Ok((intercept, ar, ma))
}

/// Fit OLS with intercept; returns (intercept, coefficients, residuals).
fn fit_ols(y: &[f64], x: &[Vec<f64>]) -> Result<(f64, Vec<f64>, Vec<f64>)> {
    let n = y.len();
    let k = x.len();

    let x_mat = faer::Mat::from_fn(n, k, |i, j| x[j][i]);
    let y_col = faer::Col::from_fn(n, |i| y[i]);

    let fitted = OlsRegressor::builder()
        .with_intercept(true)
        .build()
        .fit(&x_mat, &y_col)
        .map_err(|e| ForecastError::Computation(format!("Least-squares stage failed: {}", e)))?;

    let intercept = fitted.intercept().unwrap_or(0.0);
    let coeffs_col = fitted.coefficients();
    let mut coeffs = Vec::with_capacity(coeffs_col.nrows());
    for i in 0..coeffs_col.nrows() {
        coeffs.push(coeffs_col[i]);
    }

    let predictions = fitted.predict(&x_mat);
    let residuals: Vec<f64> = (0..n).map(|i| y[i] - predictions[i]).collect();

    Ok((intercept, coeffs, residuals))
}

/// First difference of `values`.
fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

impl FittedModel {
    /// Forecast `horizon` future values in one pass.
    ///
    /// Later points feed on earlier forecast values with zero future
    /// innovations, so the path is internally consistent. Deterministic:
    /// identical inputs yield identical output. Horizon bounds are the
    /// caller's concern; a zero horizon yields an empty forecast.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let mut history = self.diff_tail.clone();
        let mut residuals = self.residual_tail.clone();
        let mut diffs = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let mut next = self.intercept;
            for (j, phi) in self.ar.iter().enumerate() {
                if j < history.len() {
                    next += phi * history[history.len() - 1 - j];
                }
            }
            for (j, theta) in self.ma.iter().enumerate() {
                if j < residuals.len() {
                    next += theta * residuals[residuals.len() - 1 - j];
                }
            }
            diffs.push(next);
            history.push(next);
            residuals.push(0.0);
        }

        // Integrate back through each differencing level.
        let mut values = diffs;
        for head in self.integration_heads.iter().rev() {
            let mut level = Vec::with_capacity(values.len());
            let mut current = *head;
            for v in values {
                current += v;
                level.push(current);
            }
            values = level;
        }
        values
    }

    /// Month-start dates for a forecast of `horizon` steps, beginning the
    /// month after the last training observation.
    pub fn forecast_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        future_months(self.last_observed, horizon)
    }

    /// Serialize the artifact to `path` as self-describing JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::Computation(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load an artifact written by [`FittedModel::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ForecastError::ModelNotLoaded(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ForecastError::ModelNotLoaded(format!("{}: {}", path.display(), e)))
    }
}
