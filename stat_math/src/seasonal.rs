//! Seasonal structure: additive decomposition and autocorrelation

use crate::descriptive::mean;
use crate::forecasting::LinearRegression;
use crate::{MathError, Result, EPSILON};
use serde::Serialize;

/// Additive decomposition `value = trend + seasonal + noise`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    /// Season length in observations
    pub period: usize,
    /// Least-squares trend fitted on the deseasonalised series
    #[serde(skip)]
    pub trend_line: LinearRegression,
    /// One zero-sum index per phase
    pub seasonal_indices: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
}

impl Decomposition {
    /// Trend plus seasonal index, `periods_ahead` steps past the last observation
    pub fn forecast(&self, periods_ahead: usize) -> f64 {
        let index = self.trend.len() + periods_ahead - 1;
        self.trend_line.forecast(periods_ahead) + self.seasonal_indices[index % self.period]
    }

    /// In-sample `trend + seasonal` reconstruction
    pub fn fitted(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(self.seasonal.iter())
            .map(|(t, s)| t + s)
            .collect()
    }
}

/// Decompose `values` with a linear trend and per-phase seasonal means
///
/// Needs at least two full seasons.
pub fn decompose_additive(values: &[f64], period: usize) -> Result<Decomposition> {
    if period < 2 {
        return Err(MathError::InvalidInput(
            "Seasonal period must be at least 2".to_string(),
        ));
    }
    if values.len() < period * 2 {
        return Err(MathError::InsufficientData(format!(
            "Seasonal decomposition needs at least {} observations, have {}",
            period * 2,
            values.len()
        )));
    }

    // First pass: remove a rough trend to expose the seasonal shape
    let rough = LinearRegression::fit(values)?;
    let detrended: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, v)| v - rough.predict(i as f64))
        .collect();

    let mut seasonal_indices = Vec::with_capacity(period);
    for phase in 0..period {
        let phase_values: Vec<f64> = detrended.iter().skip(phase).step_by(period).copied().collect();
        seasonal_indices.push(mean(&phase_values)?);
    }
    let offset = mean(&seasonal_indices)?;
    for index in seasonal_indices.iter_mut() {
        *index -= offset;
    }

    let seasonal: Vec<f64> = (0..values.len())
        .map(|i| seasonal_indices[i % period])
        .collect();

    // Second pass: refit the trend on the deseasonalised series
    let deseasonalised: Vec<f64> = values
        .iter()
        .zip(seasonal.iter())
        .map(|(v, s)| v - s)
        .collect();
    let trend_line = LinearRegression::fit(&deseasonalised)?;
    let trend = trend_line.fitted();

    Ok(Decomposition {
        period,
        trend_line,
        seasonal_indices,
        trend,
        seasonal,
    })
}

/// Sample autocorrelation of `values` at `lag`
///
/// Returns `0.0` for a constant series.
pub fn autocorrelation(values: &[f64], lag: usize) -> Result<f64> {
    if lag == 0 || lag >= values.len() {
        return Err(MathError::InvalidInput(format!(
            "Lag must be between 1 and {}, got {}",
            values.len().saturating_sub(1),
            lag
        )));
    }

    let mean = mean(values)?;
    let denominator: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    if denominator < EPSILON {
        return Ok(0.0);
    }

    let numerator: f64 = values
        .windows(lag + 1)
        .map(|w| (w[0] - mean) * (w[lag] - mean))
        .sum();

    Ok(numerator / denominator)
}
