//! Error types for the stock_forecast crate

use chrono::NaiveDate;
use thiserror::Error;

/// Failure raised by a normalizer or regressor artifact
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The window handed to the model does not have the length it was fitted on
    #[error("Shape mismatch: expected window of {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Input or output contained NaN or infinity
    #[error("Non-finite value: {0}")]
    NonFinite(String),

    /// Any other failure reported by the model backend
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Custom error types for the stock_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer observations than the window needs
    #[error("Insufficient history: need {required} observations, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// The requested date lies before the last known observation
    #[error("Target date {target} is before the last known date {last_known}")]
    TargetBeforeHistory {
        last_known: NaiveDate,
        target: NaiveDate,
    },

    /// The requested date is the last known observation, nothing to forecast
    #[error("Target date {0} is the last known date")]
    TargetIsLastKnownDate(NaiveDate),

    /// A normalizer or regressor call failed during the rollout
    #[error("Prediction failed at step {step}: {source}")]
    PredictionFailure {
        step: usize,
        #[source]
        source: ModelError,
    },

    /// No loadable model or scaler for the instrument
    #[error("Missing artifact for {instrument}: {reason}")]
    MissingArtifact { instrument: String, reason: String },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error in a configuration or catalog file
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ForecastError {
    /// True for errors caused by what the user asked for rather than by the system
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientHistory { .. }
                | ForecastError::TargetBeforeHistory { .. }
                | ForecastError::TargetIsLastKnownDate(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
