//! Forecasting models for time series data

use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Generate point forecasts for the next `horizon` periods
    fn forecast(&self, horizon: usize) -> Vec<f64>;

    /// In-sample fit, aligned index for index with the training values
    fn fitted(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;

    /// Differences between the training values and the in-sample fit
    fn residuals(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.fitted())
            .map(|(actual, fitted)| actual - fitted)
            .collect()
    }
}

/// Forecast model that can be trained on a value series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel + 'static;

    /// Train the model on the series
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Train and erase the concrete type
    fn train_boxed(&self, values: &[f64]) -> Result<Box<dyn TrainedForecastModel>> {
        Ok(Box::new(self.train(values)?))
    }
}

pub mod exponential_smoothing;
pub mod linear;
pub mod seasonal;

pub use exponential_smoothing::{ExponentialSmoothing, TrainedExponentialSmoothing};
pub use linear::{LinearTrend, TrainedLinearTrend};
pub use seasonal::{SeasonalDecomposition, TrainedSeasonalDecomposition};
