//! Consensus anomaly detection
//!
//! Four statistical detectors vote on every point. A point flagged by any of
//! them is reported, with a severity given by the share of detectors that
//! agree.

use crate::config::DetectorConfig;
use crate::data::{TimeSeriesData, MIN_DATA_POINTS};
use crate::error::{Result, ValidationError};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

pub mod detectors;
pub mod patterns;

pub use detectors::{
    Detector, Flags, IqrDetector, LocalDensityDetector, SeasonalDetector, ZScoreDetector,
};

/// Number of detectors taking part in every vote
pub const DETECTOR_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnomalySensitivity {
    Low,
    Medium,
    High,
}

/// Per-detector cut-offs for one sensitivity level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub z_score: f64,
    pub iqr_multiplier: f64,
    pub local: f64,
    pub seasonal: f64,
}

impl AnomalySensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySensitivity::Low => "LOW",
            AnomalySensitivity::Medium => "MEDIUM",
            AnomalySensitivity::High => "HIGH",
        }
    }

    /// Higher sensitivity always means looser cut-offs
    pub fn thresholds(&self) -> Thresholds {
        match self {
            AnomalySensitivity::Low => Thresholds {
                z_score: 3.0,
                iqr_multiplier: 2.0,
                local: 2.5,
                seasonal: 2.5,
            },
            AnomalySensitivity::Medium => Thresholds {
                z_score: 2.5,
                iqr_multiplier: 1.5,
                local: 2.0,
                seasonal: 2.0,
            },
            AnomalySensitivity::High => Thresholds {
                z_score: 2.0,
                iqr_multiplier: 1.0,
                local: 1.5,
                seasonal: 1.5,
            },
        }
    }
}

impl fmt::Display for AnomalySensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalySensitivity {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(AnomalySensitivity::Low),
            "MEDIUM" => Ok(AnomalySensitivity::Medium),
            "HIGH" => Ok(AnomalySensitivity::High),
            other => Err(ValidationError::InvalidOption(format!(
                "unrecognized sensitivity '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map the share of agreeing detectors onto a severity
    pub fn from_agreement(agreeing: usize, total: usize) -> Self {
        if total == 0 {
            return Severity::Low;
        }
        let share = agreeing as f64 / total as f64;
        if share >= 0.75 {
            Severity::Critical
        } else if share >= 0.5 {
            Severity::High
        } else if share >= 0.25 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// Detector that contributed to a flag
///
/// Declaration order is the order in which detectors supply the expected
/// value, most specific baseline first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    SeasonalDeviation,
    ZScore,
    Iqr,
    LocalDensity,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::SeasonalDeviation => "seasonal deviation",
            DetectionMethod::ZScore => "z-score",
            DetectionMethod::Iqr => "IQR",
            DetectionMethod::LocalDensity => "local density",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    /// Position in the input series
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub expected: f64,
    pub severity: Severity,
    /// Agreeing detectors, in [`DetectionMethod`] order
    pub methods: Vec<DetectionMethod>,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatternType {
    Clustering,
    Periodic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPattern {
    pub pattern_type: PatternType,
    pub description: String,
    /// Cluster size for clusters, mean gap in days for periodic patterns
    pub frequency: f64,
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub sensitivity: AnomalySensitivity,
    /// Ascending by index
    pub anomalies: Vec<AnomalyPoint>,
    /// Severity of each anomaly, in the same order
    pub severities: Vec<Severity>,
    pub patterns: Vec<AnomalyPattern>,
    pub recommendations: Vec<String>,
}

/// Statistical anomaly engine
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The four detectors configured for `sensitivity`
    pub fn detectors(&self, sensitivity: AnomalySensitivity) -> Vec<Box<dyn Detector>> {
        let thresholds = sensitivity.thresholds();
        vec![
            Box::new(ZScoreDetector::new(thresholds.z_score)),
            Box::new(IqrDetector::new(thresholds.iqr_multiplier)),
            Box::new(LocalDensityDetector::new(thresholds.local)),
            Box::new(SeasonalDetector::new(
                thresholds.seasonal,
                self.config.seasonal_period,
                self.config.min_seasonal_points,
            )),
        ]
    }

    pub fn detect_anomalies(
        &self,
        data: &TimeSeriesData,
        sensitivity: AnomalySensitivity,
    ) -> Result<AnomalyResult> {
        data.validate(MIN_DATA_POINTS)?;
        let values = data.values();
        let timestamps = data.timestamps();

        let runs = self
            .detectors(sensitivity)
            .par_iter()
            .map(|detector| {
                detector
                    .detect(values)
                    .map(|flags| (detector.method(), flags))
            })
            .collect::<Result<Vec<(DetectionMethod, Flags)>>>()?;

        let mut votes: BTreeMap<usize, Vec<(DetectionMethod, f64)>> = BTreeMap::new();
        for (method, flags) in &runs {
            debug!(method = %method, flagged = flags.len(), "detector finished");
            for (&index, &expected) in flags {
                votes.entry(index).or_default().push((*method, expected));
            }
        }

        let anomalies: Vec<AnomalyPoint> = votes
            .into_iter()
            .map(|(index, mut hits)| {
                hits.sort_by_key(|(method, _)| *method);
                let value = values[index];
                let expected = hits.first().map_or(value, |&(_, expected)| expected);
                let methods: Vec<DetectionMethod> = hits.iter().map(|(m, _)| *m).collect();
                let severity = Severity::from_agreement(methods.len(), DETECTOR_COUNT);
                let explanation = format!(
                    "Value {:.2} deviates from expected {:.2}; flagged by {} of {} detectors ({})",
                    value,
                    expected,
                    methods.len(),
                    DETECTOR_COUNT,
                    methods
                        .iter()
                        .map(DetectionMethod::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                );

                AnomalyPoint {
                    index,
                    timestamp: timestamps[index],
                    value,
                    expected,
                    severity,
                    methods,
                    explanation,
                }
            })
            .collect();

        let patterns = patterns::find_patterns(&anomalies, &self.config);
        let recommendations =
            patterns::recommendations(&anomalies, &patterns, sensitivity, &self.config);

        info!(
            sensitivity = %sensitivity,
            points = values.len(),
            anomalies = anomalies.len(),
            patterns = patterns.len(),
            "anomaly detection complete"
        );

        Ok(AnomalyResult {
            sensitivity,
            severities: anomalies.iter().map(|a| a.severity).collect(),
            anomalies,
            patterns,
            recommendations,
        })
    }

    /// The statistical detectors carry no learned state; accepted and ignored
    pub fn train_model(&self, data: &TimeSeriesData) -> Result<()> {
        debug!(points = data.len(), "train_model is a no-op for the statistical detector");
        Ok(())
    }

    /// The statistical detectors carry no learned state; accepted and ignored
    pub fn update_model(&self, data: &TimeSeriesData) -> Result<()> {
        debug!(points = data.len(), "update_model is a no-op for the statistical detector");
        Ok(())
    }
}
