//! # Finsight
//!
//! Statistical analytics core for business time series: revenue, volumes,
//! balances and similar non-negative periodic measurements.
//!
//! ## Features
//!
//! - Forecasting with linear trend, exponential smoothing and additive seasonal models
//! - Adaptive model choice driven by a SIMPLE/MODERATE/COMPLEX series profile
//! - Backtested accuracy metrics and horizon-widening confidence intervals
//! - Rolling-origin model validation
//! - Consensus anomaly detection over four detectors, with cluster and periodicity mining
//! - A registry-backed selector that picks statistical or advanced backends
//!
//! All engines are stateless: every call works only on the series it is given.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use finsight::{
//!     AnomalySensitivity, EngineSelector, ForecastMethod, ForecastingOptions, TimeSeriesData,
//! };
//!
//! # fn main() -> finsight::Result<()> {
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let values = vec![100.0, 110.0, 105.0, 120.0, 115.0, 130.0, 125.0, 140.0];
//! let timestamps = (0..values.len())
//!     .map(|i| start + Duration::days(30 * i as i64))
//!     .collect();
//! let data = TimeSeriesData::new(timestamps, values);
//!
//! let selector = EngineSelector::default();
//!
//! // Forecast the next three periods
//! let forecaster = selector.forecasting_engine(data.len() as i64, "SIMPLE", false);
//! let options = ForecastingOptions::new(ForecastMethod::Linear, 3);
//! let forecast = forecaster.generate_forecast(&data, &options)?;
//! assert_eq!(forecast.predictions.len(), 3);
//!
//! // Look for unusual periods
//! let detector = selector.anomaly_engine(
//!     &finsight::DataCharacteristics {
//!         size: data.len() as i64,
//!         complexity: "SIMPLE".to_string(),
//!     },
//!     false,
//! );
//! let anomalies = detector.detect_anomalies(&data, AnomalySensitivity::Medium)?;
//! assert!(anomalies.anomalies.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod anomaly;
pub mod complexity;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod selector;

// Re-export commonly used types
pub use crate::anomaly::{
    AnomalyDetector, AnomalyPattern, AnomalyPoint, AnomalyResult, AnomalySensitivity,
    DetectionMethod, PatternType, Severity,
};
pub use crate::complexity::{Complexity, SeriesProfile};
pub use crate::config::{DetectorConfig, EngineConfig, ForecasterConfig, SelectorConfig};
pub use crate::data::{DataQuality, DateRange, TimeSeriesData, MIN_DATA_POINTS};
pub use crate::error::{AnalyticsError, Result, ValidationError};
pub use crate::forecast::{
    AccuracyMetrics, ConfidenceInterval, ForecastMethod, ForecastResult, ForecastingOptions,
    ModelKind, ModelValidation, ModelValidator, Prediction, TimeSeriesForecaster,
    ValidationMetrics,
};
pub use crate::metrics::ModelMetrics;
pub use crate::selector::{
    AnomalyEngine, Backend, Capability, DataCharacteristics, EngineKind, EngineProfile,
    EngineRecommendation, EngineRegistry, EngineSelector, ForecastingEngine, HealthStatus,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
