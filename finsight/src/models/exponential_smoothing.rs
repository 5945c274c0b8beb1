//! Exponential smoothing model for time series forecasting

use crate::error::{AnalyticsError, Result, ValidationError};
use crate::models::{ForecastModel, TrainedForecastModel};
use stat_math::ExponentialSmoothing as Smoother;

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Fixed smoothing parameter, or `None` to derive it from the series variance
    alpha: Option<f64>,
}

/// Trained exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
    /// Current level
    level: f64,
    /// One-step-ahead predictions over the training values
    fitted: Vec<f64>,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing model with a fixed alpha
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(AnalyticsError::Validation(ValidationError::InvalidOption(
                "Alpha must be between 0 and 1".to_string(),
            )));
        }

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha: Some(alpha),
        })
    }

    /// Create a model that picks alpha from the variance of the training series
    pub fn variance_adaptive() -> Self {
        Self {
            name: "Exponential Smoothing (variance-adaptive)".to_string(),
            alpha: None,
        }
    }
}

impl Default for ExponentialSmoothing {
    fn default() -> Self {
        Self::variance_adaptive()
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let alpha = match self.alpha {
            Some(alpha) => alpha,
            None => Smoother::alpha_from_variance(values)?,
        };
        let mut smoother = Smoother::new(alpha)?;

        let mut fitted = Vec::with_capacity(values.len());
        for &value in values {
            // Prediction for this step is the level before seeing it
            fitted.push(smoother.value().unwrap_or(value));
            smoother.update(value)?;
        }

        Ok(TrainedExponentialSmoothing {
            name: format!("Exponential Smoothing (alpha={:.2})", alpha),
            alpha,
            level: smoother.value()?,
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedExponentialSmoothing {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        // In simple exponential smoothing, the forecast is constant at the last level
        vec![self.level; horizon]
    }

    fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    fn name(&self) -> &str {
        &self.name
    }
}
