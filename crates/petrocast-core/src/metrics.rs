//! Fit-quality metrics surfaced by the model trainer.

use crate::error::{ForecastError, Result};

fn validate_inputs(actual: &[f64], forecast: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if actual.len() != forecast.len() {
        return Err(ForecastError::Computation(format!(
            "Length mismatch: {} actual vs {} forecast values",
            actual.len(),
            forecast.len()
        )));
    }
    Ok(())
}

/// Mean Absolute Error.
pub fn mae(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Mean Squared Error.
pub fn mse(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error.
pub fn rmse(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    Ok(mse(actual, forecast)?.sqrt())
}

/// Akaike Information Criterion for a least-squares fit with `k` estimated
/// parameters over `n` residuals.
///
/// AIC = n * ln(SSE / n) + 2k
pub fn aic(sse: f64, n: usize, k: usize) -> f64 {
    if n == 0 {
        return f64::NAN;
    }
    let n = n as f64;
    n * (sse / n).max(f64::MIN_POSITIVE).ln() + 2.0 * k as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mae() {
        let actual = vec![1.0, 2.0, 3.0];
        let forecast = vec![1.5, 2.0, 2.5];
        assert_relative_eq!(mae(&actual, &forecast).unwrap(), 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rmse() {
        let actual = vec![1.0, 2.0];
        let forecast = vec![2.0, 4.0];
        assert_relative_eq!(
            rmse(&actual, &forecast).unwrap(),
            (2.5_f64).sqrt(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert!(mse(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(mae(&[], &[]).is_err());
    }

    #[test]
    fn test_aic_penalizes_parameters() {
        let base = aic(10.0, 100, 2);
        let more_params = aic(10.0, 100, 10);
        assert!(more_params > base);
        assert_relative_eq!(more_params - base, 16.0, epsilon = 1e-9);
    }
}
