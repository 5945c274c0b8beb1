//! Linear trend model for time series forecasting

use crate::error::Result;
use crate::models::{ForecastModel, TrainedForecastModel};
use stat_math::LinearRegression;

/// Ordinary least-squares trend extrapolated over the index axis
#[derive(Debug, Clone)]
pub struct LinearTrend {
    /// Name of the model
    name: String,
}

/// Trained linear trend model
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    /// Name of the model
    name: String,
    /// Fitted trend line
    regression: LinearRegression,
    /// Trend values over the training range
    fitted: Vec<f64>,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self {
            name: "Linear Trend".to_string(),
        }
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let regression = LinearRegression::fit(values)?;
        let fitted = regression.fitted();

        Ok(TrainedLinearTrend {
            name: self.name.clone(),
            regression,
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearTrend {
    pub fn slope(&self) -> f64 {
        self.regression.slope()
    }

    pub fn r_squared(&self) -> f64 {
        self.regression.r_squared()
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon).map(|h| self.regression.forecast(h)).collect()
    }

    fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    fn name(&self) -> &str {
        &self.name
    }
}
