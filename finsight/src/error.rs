//! Error types for the finsight crate

use stat_math::MathError;
use thiserror::Error;

/// Malformed or insufficient input, raised before any computation starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The series carries no values at all
    #[error("time series data is required")]
    MissingData,

    /// Fewer points than the operation needs
    #[error("insufficient data points: need at least {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// NaN, infinite or negative value
    #[error("invalid data values detected at index {index}")]
    InvalidValues { index: usize },

    #[error(
        "timestamps and values arrays must have the same length \
         ({timestamps} timestamps, {values} values)"
    )]
    LengthMismatch { timestamps: usize, values: usize },

    #[error("timestamps must be strictly ascending (violation at index {index})")]
    UnorderedTimestamps { index: usize },

    /// Out-of-range option or configuration value
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl ValidationError {
    /// Caller-facing text describing how to fix the input
    pub fn remediation(&self) -> String {
        match self {
            ValidationError::MissingData => {
                "Provide a time series with at least one recorded period".to_string()
            }
            ValidationError::InsufficientData { required, actual } => format!(
                "Need at least {} more data points",
                required.saturating_sub(*actual)
            ),
            ValidationError::InvalidValues { index } => format!(
                "Remove or correct the value at position {}; amounts must be finite and non-negative",
                index
            ),
            ValidationError::LengthMismatch { .. } => {
                "Supply exactly one timestamp per value".to_string()
            }
            ValidationError::UnorderedTimestamps { index } => format!(
                "Sort the series by time and merge the duplicate period at position {}",
                index
            ),
            ValidationError::InvalidOption(msg) => format!("Adjust the request: {}", msg),
        }
    }
}

/// Custom error types for the finsight crate
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Input rejected before computation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Requested behaviour that no registered backend provides
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A backend failed while computing a result
    #[error("Computation error: {0}")]
    Computation(String),

    /// Error from the statistics layer
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Configuration could not be parsed or is out of range
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalyticsError {
    /// The validation failure behind this error, if that is what it is
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            AnalyticsError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Config(err.to_string())
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AnalyticsError>;
