//! Engine configuration
//!
//! Every tunable the engines read lives here with its default. The structs
//! deserialize with per-field defaults so a partial JSON document is enough
//! to override a single value.

use crate::error::{AnalyticsError, Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Forecaster and model-validator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecasterConfig {
    /// Season length used by the seasonal model and the seasonality test
    pub seasonal_period: usize,
    /// Upper bound on the number of recent points held out for backtesting
    pub max_holdout: usize,
    /// Rolling-origin folds used by model validation
    pub cv_folds: usize,
    pub min_cross_validation_score: f64,
    pub min_holdout_score: f64,
    pub min_stability_score: f64,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            seasonal_period: 12,
            max_holdout: 12,
            cv_folds: 5,
            min_cross_validation_score: 0.6,
            min_holdout_score: 0.5,
            min_stability_score: 0.3,
        }
    }
}

impl ForecasterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.seasonal_period < 2 {
            return Err(invalid("seasonal_period must be at least 2"));
        }
        if self.max_holdout == 0 {
            return Err(invalid("max_holdout must be positive"));
        }
        if self.cv_folds == 0 {
            return Err(invalid("cv_folds must be positive"));
        }
        for (name, score) in [
            ("min_cross_validation_score", self.min_cross_validation_score),
            ("min_holdout_score", self.min_holdout_score),
            ("min_stability_score", self.min_stability_score),
        ] {
            if !(0.0..=1.0).contains(&score) {
                return Err(invalid(&format!("{} must be within [0, 1]", name)));
            }
        }
        Ok(())
    }
}

/// Anomaly detector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of phases in the seasonal baseline
    pub seasonal_period: usize,
    /// Series shorter than this skip the seasonal detector
    pub min_seasonal_points: usize,
    /// Maximum gap between anomalies in the same cluster
    pub cluster_gap_days: i64,
    /// Inter-anomaly gaps with a CV below this are reported as periodic
    pub periodic_cv_threshold: f64,
    /// Anomaly count above which a data-quality review is recommended
    pub review_threshold: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            seasonal_period: 12,
            min_seasonal_points: 24,
            cluster_gap_days: 7,
            periodic_cv_threshold: 0.3,
            review_threshold: 10,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.seasonal_period < 2 {
            return Err(invalid("seasonal_period must be at least 2"));
        }
        if self.min_seasonal_points < self.seasonal_period * 2 {
            return Err(invalid(
                "min_seasonal_points must cover at least two seasonal periods",
            ));
        }
        if self.cluster_gap_days < 0 {
            return Err(invalid("cluster_gap_days must not be negative"));
        }
        if self.periodic_cv_threshold <= 0.0 {
            return Err(invalid("periodic_cv_threshold must be positive"));
        }
        Ok(())
    }
}

/// Engine selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Smallest series for which the advanced backend may be chosen
    pub min_advanced_data_size: usize,
    /// Accuracy requirement above which the advanced backend is recommended
    pub high_accuracy_threshold: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_advanced_data_size: 100,
            high_accuracy_threshold: 0.8,
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.high_accuracy_threshold) {
            return Err(invalid("high_accuracy_threshold must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Complete configuration handed to the selector at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forecaster: ForecasterConfig,
    pub detector: DetectorConfig,
    pub selector: SelectorConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.forecaster.validate()?;
        self.detector.validate()?;
        self.selector.validate()
    }
}

fn invalid(msg: &str) -> AnalyticsError {
    AnalyticsError::Validation(ValidationError::InvalidOption(msg.to_string()))
}
