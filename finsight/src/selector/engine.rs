//! Engine traits implemented by every backend

use crate::anomaly::{AnomalyDetector, AnomalyResult, AnomalySensitivity};
use crate::data::TimeSeriesData;
use crate::error::Result;
use crate::forecast::{ForecastResult, ForecastingOptions, ModelValidation, TimeSeriesForecaster};
use crate::metrics::ModelMetrics;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Family an engine implementation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Statistical,
    Advanced,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Statistical => f.write_str("statistical"),
            Backend::Advanced => f.write_str("advanced"),
        }
    }
}

/// Forecasting backend
pub trait ForecastingEngine: Debug + Send + Sync {
    fn backend(&self) -> Backend;

    fn generate_forecast(
        &self,
        data: &TimeSeriesData,
        options: &ForecastingOptions,
    ) -> Result<ForecastResult>;

    fn validate_model(&self, data: &TimeSeriesData) -> Result<ModelValidation>;

    fn model_metrics(&self) -> ModelMetrics;
}

/// Anomaly detection backend
pub trait AnomalyEngine: Debug + Send + Sync {
    fn backend(&self) -> Backend;

    fn detect_anomalies(
        &self,
        data: &TimeSeriesData,
        sensitivity: AnomalySensitivity,
    ) -> Result<AnomalyResult>;

    fn train_model(&self, data: &TimeSeriesData) -> Result<()>;

    fn update_model(&self, data: &TimeSeriesData) -> Result<()>;
}

impl ForecastingEngine for TimeSeriesForecaster {
    fn backend(&self) -> Backend {
        Backend::Statistical
    }

    fn generate_forecast(
        &self,
        data: &TimeSeriesData,
        options: &ForecastingOptions,
    ) -> Result<ForecastResult> {
        TimeSeriesForecaster::generate_forecast(self, data, options)
    }

    fn validate_model(&self, data: &TimeSeriesData) -> Result<ModelValidation> {
        TimeSeriesForecaster::validate_model(self, data)
    }

    fn model_metrics(&self) -> ModelMetrics {
        TimeSeriesForecaster::model_metrics(self)
    }
}

impl AnomalyEngine for AnomalyDetector {
    fn backend(&self) -> Backend {
        Backend::Statistical
    }

    fn detect_anomalies(
        &self,
        data: &TimeSeriesData,
        sensitivity: AnomalySensitivity,
    ) -> Result<AnomalyResult> {
        AnomalyDetector::detect_anomalies(self, data, sensitivity)
    }

    fn train_model(&self, data: &TimeSeriesData) -> Result<()> {
        AnomalyDetector::train_model(self, data)
    }

    fn update_model(&self, data: &TimeSeriesData) -> Result<()> {
        AnomalyDetector::update_model(self, data)
    }
}
