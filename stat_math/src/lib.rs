//! # Stat Math
//!
//! Statistical primitives used by the finsight analytics core.
//! This crate provides descriptive statistics, least-squares trend fitting,
//! exponential smoothing and additive seasonal decomposition over plain
//! `f64` slices.

use thiserror::Error;

pub mod descriptive;
pub mod forecasting;
pub mod seasonal;

pub use descriptive::{
    coefficient_of_variation, mean, median, population_std_dev, population_variance, quantile,
    two_sided_z,
};
pub use forecasting::{ExponentialSmoothing, LinearRegression};
pub use seasonal::{autocorrelation, decompose_additive, Decomposition};

/// Errors that can occur in statistical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for statistical operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Tolerance below which a spread is treated as zero
pub const EPSILON: f64 = 1e-10;
