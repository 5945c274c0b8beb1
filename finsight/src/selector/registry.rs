//! Immutable map from capability keys to engine constructors

use super::engine::{AnomalyEngine, Backend, ForecastingEngine};
use crate::anomaly::AnomalyDetector;
use crate::config::EngineConfig;
use crate::error::{AnalyticsError, Result, ValidationError};
use crate::forecast::TimeSeriesForecaster;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Registry key naming an engine family and backend
///
/// Declared in lexical order of the key strings so that sorting follows
/// the rendered names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    AdvancedAnomaly,
    AdvancedForecasting,
    StatisticalAnomaly,
    StatisticalForecasting,
}

impl Capability {
    pub fn forecasting(backend: Backend) -> Self {
        match backend {
            Backend::Statistical => Capability::StatisticalForecasting,
            Backend::Advanced => Capability::AdvancedForecasting,
        }
    }

    pub fn anomaly(backend: Backend) -> Self {
        match backend {
            Backend::Statistical => Capability::StatisticalAnomaly,
            Backend::Advanced => Capability::AdvancedAnomaly,
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Capability::StatisticalForecasting | Capability::StatisticalAnomaly => {
                Backend::Statistical
            }
            Capability::AdvancedForecasting | Capability::AdvancedAnomaly => Backend::Advanced,
        }
    }

    pub fn is_forecasting(&self) -> bool {
        matches!(
            self,
            Capability::StatisticalForecasting | Capability::AdvancedForecasting
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AdvancedAnomaly => "advanced-anomaly",
            Capability::AdvancedForecasting => "advanced-forecasting",
            Capability::StatisticalAnomaly => "statistical-anomaly",
            Capability::StatisticalForecasting => "statistical-forecasting",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advanced-anomaly" => Ok(Capability::AdvancedAnomaly),
            "advanced-forecasting" => Ok(Capability::AdvancedForecasting),
            "statistical-anomaly" => Ok(Capability::StatisticalAnomaly),
            "statistical-forecasting" => Ok(Capability::StatisticalForecasting),
            other => Err(ValidationError::InvalidOption(format!(
                "unrecognized capability '{}'",
                other
            ))),
        }
    }
}

/// Builds a forecasting engine from the shared configuration
pub type ForecastingConstructor =
    Arc<dyn Fn(&EngineConfig) -> Result<Box<dyn ForecastingEngine>> + Send + Sync>;
/// Builds an anomaly engine from the shared configuration
pub type AnomalyConstructor =
    Arc<dyn Fn(&EngineConfig) -> Result<Box<dyn AnomalyEngine>> + Send + Sync>;

#[derive(Clone)]
enum Constructor {
    Forecasting(ForecastingConstructor),
    Anomaly(AnomalyConstructor),
}

/// Read-only registry of engine constructors, assembled once at startup
#[derive(Clone)]
pub struct EngineRegistry {
    entries: BTreeMap<Capability, Constructor>,
}

impl EngineRegistry {
    pub fn builder() -> EngineRegistryBuilder {
        EngineRegistryBuilder::default()
    }

    /// Registry with the two statistical engines and nothing else
    pub fn statistical() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            Capability::StatisticalForecasting,
            Constructor::Forecasting(Arc::new(statistical_forecaster)),
        );
        entries.insert(
            Capability::StatisticalAnomaly,
            Constructor::Anomaly(Arc::new(statistical_detector)),
        );
        Self { entries }
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.entries.contains_key(&capability)
    }

    /// Registered keys in sorted order
    pub fn capabilities(&self) -> Vec<Capability> {
        self.entries.keys().copied().collect()
    }

    /// `None` when no constructor is registered for `backend`
    pub fn forecasting_engine(
        &self,
        backend: Backend,
        config: &EngineConfig,
    ) -> Option<Result<Box<dyn ForecastingEngine>>> {
        match self.entries.get(&Capability::forecasting(backend))? {
            Constructor::Forecasting(constructor) => Some(constructor(config)),
            Constructor::Anomaly(_) => None,
        }
    }

    /// `None` when no constructor is registered for `backend`
    pub fn anomaly_engine(
        &self,
        backend: Backend,
        config: &EngineConfig,
    ) -> Option<Result<Box<dyn AnomalyEngine>>> {
        match self.entries.get(&Capability::anomaly(backend))? {
            Constructor::Anomaly(constructor) => Some(constructor(config)),
            Constructor::Forecasting(_) => None,
        }
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::statistical()
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[derive(Default)]
pub struct EngineRegistryBuilder {
    entries: BTreeMap<Capability, Constructor>,
}

impl EngineRegistryBuilder {
    /// Register a forecasting constructor, replacing any previous one for the key
    pub fn register_forecasting<F>(mut self, capability: Capability, constructor: F) -> Result<Self>
    where
        F: Fn(&EngineConfig) -> Result<Box<dyn ForecastingEngine>> + Send + Sync + 'static,
    {
        if !capability.is_forecasting() {
            return Err(AnalyticsError::UnsupportedFeature(format!(
                "{} does not name a forecasting engine",
                capability
            )));
        }
        self.entries
            .insert(capability, Constructor::Forecasting(Arc::new(constructor)));
        Ok(self)
    }

    /// Register an anomaly constructor, replacing any previous one for the key
    pub fn register_anomaly<F>(mut self, capability: Capability, constructor: F) -> Result<Self>
    where
        F: Fn(&EngineConfig) -> Result<Box<dyn AnomalyEngine>> + Send + Sync + 'static,
    {
        if capability.is_forecasting() {
            return Err(AnalyticsError::UnsupportedFeature(format!(
                "{} does not name an anomaly engine",
                capability
            )));
        }
        self.entries
            .insert(capability, Constructor::Anomaly(Arc::new(constructor)));
        Ok(self)
    }

    /// Add the statistical engines on top of whatever is registered
    pub fn with_statistical(mut self) -> Self {
        self.entries.extend(EngineRegistry::statistical().entries);
        self
    }

    pub fn build(self) -> EngineRegistry {
        EngineRegistry {
            entries: self.entries,
        }
    }
}

pub(crate) fn statistical_forecaster(config: &EngineConfig) -> Result<Box<dyn ForecastingEngine>> {
    Ok(Box::new(TimeSeriesForecaster::new(config.forecaster.clone())?))
}

pub(crate) fn statistical_detector(config: &EngineConfig) -> Result<Box<dyn AnomalyEngine>> {
    Ok(Box::new(AnomalyDetector::new(config.detector.clone())?))
}
