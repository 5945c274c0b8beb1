//! Forecasting primitives for time series prediction
//!
//! Contains implementations of:
//! - Ordinary least-squares trend over the index axis
//! - Single exponential smoothing with a variance-derived smoothing factor

use crate::descriptive::population_variance;
use crate::{MathError, Result, EPSILON};

/// Least-squares linear trend fitted over the index axis `0..n`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    len: usize,
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

impl LinearRegression {
    /// Fit a trend line to `values`, using the position of each value as `x`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for linear regression. Need at least 2 points.".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (values.len() - 1) as f64 / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < EPSILON {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let y_pred = slope * i as f64 + intercept;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        // A flat series is explained perfectly by a flat line
        let r_squared = if ss_total < EPSILON {
            if ss_residual < EPSILON {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            len: values.len(),
            slope,
            intercept,
            r_squared,
        })
    }

    /// Value of the trend line at index `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predict the value `periods_ahead` steps past the last fitted point
    pub fn forecast(&self, periods_ahead: usize) -> f64 {
        self.predict((self.len + periods_ahead - 1) as f64)
    }

    /// In-sample trend values for every fitted index
    pub fn fitted(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.predict(i as f64)).collect()
    }

    /// Trend direction and strength, in value units per step
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Coefficient of determination of the fit
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Number of points the line was fitted on
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Single exponential smoothing
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
}

impl ExponentialSmoothing {
    /// Create a new Exponential Smoothing with the specified alpha (smoothing factor)
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            level: None,
        })
    }

    /// Choose a smoothing factor from the variance structure of `values`
    ///
    /// Compares the variance of first differences with the variance of the
    /// level: `alpha = 1 - var(diff) / (2 * var(level))`, clamped to
    /// `[0.1, 0.9]`. Noise around a stable level yields a small alpha, a
    /// wandering level yields a large one.
    pub fn alpha_from_variance(values: &[f64]) -> Result<f64> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Need at least 2 points to derive a smoothing factor".to_string(),
            ));
        }

        let level_variance = population_variance(values)?;
        if level_variance < EPSILON {
            return Ok(0.5);
        }

        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let diff_variance = population_variance(&diffs)?;

        Ok((1.0 - diff_variance / (2.0 * level_variance)).clamp(0.1, 0.9))
    }

    /// Update the Exponential Smoothing with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Cannot smooth non-finite value {}",
                value
            )));
        }

        self.level = Some(match self.level {
            None => value,
            Some(current_level) => self.alpha * value + (1.0 - self.alpha) * current_level,
        });

        Ok(())
    }

    /// Get the current smoothed value
    pub fn value(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Forecast the next value (in simple exponential smoothing, the forecast equals the last level)
    pub fn forecast(&self) -> Result<f64> {
        self.value()
    }

    /// Get the current alpha value
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}
