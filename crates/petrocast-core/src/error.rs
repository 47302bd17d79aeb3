//! Error types for the petrocast pipeline and forecast serving.

use thiserror::Error;

/// Result type for pipeline and forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error types for pipeline and forecasting operations.
///
/// Batch-pipeline errors abort the run; request-time errors are rendered as
/// a readable message and leave the server process alive.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Target column '{0}' is absent or entirely empty")]
    MissingTargetColumn(String),

    #[error("Schema mismatch: expected column '{0}' is absent")]
    SchemaMismatch(String),

    #[error("Data file not found: {0}")]
    DataFileNotFound(String),

    #[error("Model artifact could not be loaded: {0}")]
    ModelNotLoaded(String),

    #[error("Invalid horizon {horizon}: must be between 1 and {max}")]
    InvalidHorizon { horizon: i64, max: usize },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
