//! Metrics for evaluating forecast performance

use crate::error::{AnalyticsError, Result, ValidationError};
use serde::{Deserialize, Serialize};
use stat_math::EPSILON;

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, in percent over non-zero actuals
    pub mape: f64,
}

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(AnalyticsError::Validation(ValidationError::InvalidOption(
            "Forecast and actual values must have the same non-zero length".to_string(),
        )));
    }

    let n = forecast.len() as f64;

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let percentage_errors: Vec<f64> = actual
        .iter()
        .zip(errors.iter())
        .filter(|(&a, _)| a.abs() > EPSILON)
        .map(|(&a, &e)| (e.abs() / a.abs()) * 100.0)
        .collect();
    let mape = if percentage_errors.is_empty() {
        0.0
    } else {
        percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64
    };

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
    })
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        Ok(())
    }
}

/// Confusion counts for predicted vs actual direction of movement
///
/// An upward move is the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl DirectionCounts {
    /// Compare step-to-step moves, starting from the last observed value
    pub fn from_moves(last_observed: f64, forecast: &[f64], actual: &[f64]) -> Self {
        let mut counts = DirectionCounts::default();
        let mut previous = last_observed;

        for (&f, &a) in forecast.iter().zip(actual.iter()) {
            let predicted_up = f > previous;
            let actual_up = a > previous;
            match (predicted_up, actual_up) {
                (true, true) => counts.true_positive += 1,
                (true, false) => counts.false_positive += 1,
                (false, false) => counts.true_negative += 1,
                (false, true) => counts.false_negative += 1,
            }
            previous = a;
        }

        counts
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Share of moves whose direction was predicted correctly
    pub fn hit_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.true_positive + self.true_negative) as f64 / self.total() as f64
    }

    /// Falls back to the hit rate when no upward move was predicted
    pub fn precision(&self) -> f64 {
        let predicted = self.true_positive + self.false_positive;
        if predicted == 0 {
            return self.hit_rate();
        }
        self.true_positive as f64 / predicted as f64
    }

    /// Falls back to the hit rate when no upward move happened
    pub fn recall(&self) -> f64 {
        let relevant = self.true_positive + self.false_negative;
        if relevant == 0 {
            return self.hit_rate();
        }
        self.true_positive as f64 / relevant as f64
    }
}

/// Monitoring metrics for a forecasting backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub mape: f64,
    pub rmse: f64,
}

impl ModelMetrics {
    /// Reference figures reported for the statistical backend when no series is at hand
    ///
    /// `rmse` is scale-dependent and reported as `0.0` ("not measured").
    pub fn statistical_baseline() -> Self {
        Self::from_parts(0.85, 0.82, 0.80, 12.0, 0.0)
    }

    /// Assemble metrics from a backtest
    pub fn from_backtest(accuracy: &ForecastAccuracy, directions: &DirectionCounts) -> Self {
        Self::from_parts(
            1.0 - accuracy.mape / 100.0,
            directions.precision(),
            directions.recall(),
            accuracy.mape,
            accuracy.rmse,
        )
    }

    fn from_parts(accuracy: f64, precision: f64, recall: f64, mape: f64, rmse: f64) -> Self {
        let precision = precision.clamp(0.0, 1.0);
        let recall = recall.clamp(0.0, 1.0);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
            precision,
            recall,
            f1_score,
            mape: mape.max(0.0),
            rmse: rmse.max(0.0),
        }
    }
}
