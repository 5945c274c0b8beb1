//! Forecast requests and results

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod forecaster;
pub mod insights;
pub mod validation;

pub use forecaster::TimeSeriesForecaster;
pub use validation::{ModelValidation, ModelValidator, ValidationMetrics};

/// Forecasting method requested by the caller
///
/// Parsing never fails: unrecognized names select [`ForecastMethod::Adaptive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ForecastMethod {
    Linear,
    Exponential,
    Seasonal,
    Adaptive,
}

impl From<&str> for ForecastMethod {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => ForecastMethod::Linear,
            "exponential" => ForecastMethod::Exponential,
            "seasonal" => ForecastMethod::Seasonal,
            _ => ForecastMethod::Adaptive,
        }
    }
}

impl From<String> for ForecastMethod {
    fn from(name: String) -> Self {
        ForecastMethod::from(name.as_str())
    }
}

/// Concrete model a forecast was produced with, after adaptive selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Linear,
    Exponential,
    Seasonal,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Linear => "linear",
            ModelKind::Exponential => "exponential",
            ModelKind::Seasonal => "seasonal",
        };
        f.write_str(name)
    }
}

/// Options for a single forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastingOptions {
    pub method: ForecastMethod,
    /// Number of future periods to predict
    pub periods: usize,
    /// Interval coverage probability, strictly between 0 and 1
    pub confidence: f64,
    pub include_seasonality: bool,
    /// Append business-context guidance to insights and recommendations
    pub domain_context: bool,
}

impl Default for ForecastingOptions {
    fn default() -> Self {
        Self {
            method: ForecastMethod::Linear,
            periods: 6,
            confidence: 0.95,
            include_seasonality: false,
            domain_context: false,
        }
    }
}

impl ForecastingOptions {
    pub fn new(method: ForecastMethod, periods: usize) -> Self {
        Self {
            method,
            periods,
            ..Self::default()
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_seasonality(mut self, include_seasonality: bool) -> Self {
        self.include_seasonality = include_seasonality;
        self
    }

    pub fn with_domain_context(mut self, domain_context: bool) -> Self {
        self.domain_context = domain_context;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.periods == 0 {
            return Err(ValidationError::InvalidOption(
                "periods must be a positive integer".to_string(),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ValidationError::InvalidOption(format!(
                "confidence must be between 0 and 1 (exclusive), got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// A single future point estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub timestamp: DateTime<Utc>,
    /// Never negative
    pub value: f64,
    /// In `[0, 1]`, decaying with horizon
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Nominal coverage of the interval
    pub probability: f64,
}

/// Backtested accuracy of the model behind a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute percentage error, in percent
    pub mape: f64,
    pub rmse: f64,
    /// Out-of-sample coefficient of determination, at most 1
    pub r_squared: f64,
    /// Overall confidence in `[0, 1]`
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Model actually used after adaptive selection or degradation
    pub method: ModelKind,
    pub predictions: Vec<Prediction>,
    pub confidence_intervals: Vec<ConfidenceInterval>,
    pub accuracy: AccuracyMetrics,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ForecastResult {
    /// Predicted values in horizon order
    pub fn values(&self) -> Vec<f64> {
        self.predictions.iter().map(|p| p.value).collect()
    }

    /// Render as a plain JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("linear", ForecastMethod::Linear)]
    #[case("EXPONENTIAL", ForecastMethod::Exponential)]
    #[case("seasonal", ForecastMethod::Seasonal)]
    #[case("adaptive", ForecastMethod::Adaptive)]
    #[case("prophet", ForecastMethod::Adaptive)]
    #[case("", ForecastMethod::Adaptive)]
    fn test_method_parsing(#[case] input: &str, #[case] expected: ForecastMethod) {
        assert_eq!(ForecastMethod::from(input), expected);
    }

    #[test]
    fn test_options_defaults() {
        let options = ForecastingOptions::default();
        assert_eq!(options.method, ForecastMethod::Linear);
        assert_eq!(options.periods, 6);
        assert_eq!(options.confidence, 0.95);
        assert!(!options.include_seasonality);
        assert!(!options.domain_context);
    }

    #[test]
    fn test_options_deserialize_with_unknown_method() {
        let options: ForecastingOptions =
            serde_json::from_str(r#"{"method": "neural", "periods": 3}"#).unwrap();
        assert_eq!(options.method, ForecastMethod::Adaptive);
        assert_eq!(options.periods, 3);
        assert_eq!(options.confidence, 0.95);
    }

    #[rstest]
    #[case(0, 0.95)]
    #[case(3, 0.0)]
    #[case(3, 1.0)]
    #[case(3, f64::NAN)]
    fn test_options_validation(#[case] periods: usize, #[case] confidence: f64) {
        let options = ForecastingOptions::new(ForecastMethod::Linear, periods).with_confidence(confidence);
        assert!(options.validate().is_err());
    }
}
