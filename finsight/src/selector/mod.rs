//! Backend selection for forecasting and anomaly engines
//!
//! The selector never fails: inputs it cannot make sense of, missing
//! registrations and failing constructors all degrade to the statistical
//! backend with a warning.

use crate::anomaly::AnomalyDetector;
use crate::complexity::Complexity;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::forecast::TimeSeriesForecaster;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod engine;
pub mod registry;

pub use engine::{AnomalyEngine, Backend, ForecastingEngine};
pub use registry::{
    AnomalyConstructor, Capability, EngineRegistry, EngineRegistryBuilder, ForecastingConstructor,
};

/// Which engine family a selection is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Forecasting,
    Anomaly,
}

impl EngineKind {
    pub fn capability(&self, backend: Backend) -> Capability {
        match self {
            EngineKind::Forecasting => Capability::forecasting(backend),
            EngineKind::Anomaly => Capability::anomaly(backend),
        }
    }
}

/// Shape of the data an anomaly engine is requested for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCharacteristics {
    /// Number of points; non-positive values are tolerated and degrade selection
    pub size: i64,
    /// SIMPLE, MODERATE or COMPLEX
    pub complexity: String,
}

/// Workload description used for engine recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineProfile {
    pub size: i64,
    pub complexity: String,
    /// Required accuracy in `[0, 1]`
    pub accuracy_requirement: f64,
    /// Required responsiveness in `[0, 1]`
    pub performance_requirement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRecommendation {
    pub recommended: Backend,
    pub alternatives: Vec<Backend>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub statistical: bool,
    pub advanced: bool,
    pub overall: bool,
}

/// Picks and builds engines from a fixed registry
#[derive(Debug, Clone, Default)]
pub struct EngineSelector {
    registry: EngineRegistry,
    config: EngineConfig,
}

impl EngineSelector {
    pub fn new(registry: EngineRegistry, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide which backend should serve a request, without building anything
    ///
    /// The advanced backend is chosen only when it is preferred, registered
    /// and the data is at least `min_advanced_data_size` points long.
    pub fn select_backend(
        &self,
        kind: EngineKind,
        data_size: i64,
        complexity: &str,
        prefer_advanced: bool,
    ) -> Backend {
        if data_size <= 0 {
            warn!(data_size, "degraded selection: non-positive data size");
            return Backend::Statistical;
        }
        if complexity.parse::<Complexity>().is_err() {
            warn!(complexity, "degraded selection: unrecognized complexity");
            return Backend::Statistical;
        }
        if !prefer_advanced {
            return Backend::Statistical;
        }

        let capability = kind.capability(Backend::Advanced);
        if !self.registry.contains(capability) {
            warn!(%capability, "degraded selection: advanced backend not registered");
            return Backend::Statistical;
        }
        let min_size = self.config.selector.min_advanced_data_size;
        if usize::try_from(data_size).map_or(true, |size| size < min_size) {
            debug!(data_size, min_size, "too little data for the advanced backend");
            return Backend::Statistical;
        }

        Backend::Advanced
    }

    pub fn forecasting_engine(
        &self,
        data_size: i64,
        complexity: &str,
        prefer_advanced: bool,
    ) -> Box<dyn ForecastingEngine> {
        let backend =
            self.select_backend(EngineKind::Forecasting, data_size, complexity, prefer_advanced);

        for candidate in fallback_chain(backend) {
            match self.registry.forecasting_engine(candidate, &self.config) {
                Some(Ok(engine)) => return engine,
                Some(Err(err)) => {
                    warn!(backend = %candidate, error = %err, "forecasting engine construction failed")
                }
                None => warn!(backend = %candidate, "forecasting engine not registered"),
            }
        }

        warn!("falling back to the built-in statistical forecaster");
        Box::new(
            TimeSeriesForecaster::new(self.config.forecaster.clone()).unwrap_or_default(),
        )
    }

    pub fn anomaly_engine(
        &self,
        characteristics: &DataCharacteristics,
        prefer_advanced: bool,
    ) -> Box<dyn AnomalyEngine> {
        let backend = self.select_backend(
            EngineKind::Anomaly,
            characteristics.size,
            &characteristics.complexity,
            prefer_advanced,
        );

        for candidate in fallback_chain(backend) {
            match self.registry.anomaly_engine(candidate, &self.config) {
                Some(Ok(engine)) => return engine,
                Some(Err(err)) => {
                    warn!(backend = %candidate, error = %err, "anomaly engine construction failed")
                }
                None => warn!(backend = %candidate, "anomaly engine not registered"),
            }
        }

        warn!("falling back to the built-in statistical detector");
        Box::new(AnomalyDetector::new(self.config.detector.clone()).unwrap_or_default())
    }

    /// Advise which forecasting backend suits a workload
    pub fn engine_recommendations(&self, profile: &EngineProfile) -> EngineRecommendation {
        let min_size = self.config.selector.min_advanced_data_size;
        let threshold = self.config.selector.high_accuracy_threshold;
        let advanced_available = self.registry.contains(Capability::AdvancedForecasting);
        let below_minimum = usize::try_from(profile.size).map_or(true, |size| size < min_size);

        let (recommended, reasoning) = if below_minimum {
            (
                Backend::Statistical,
                format!(
                    "Data size {} is below the {} points the advanced backend needs; the statistical backend fits small series well",
                    profile.size, min_size
                ),
            )
        } else if profile.accuracy_requirement > threshold && advanced_available {
            (
                Backend::Advanced,
                format!(
                    "The advanced backend suits high accuracy requirements ({:.2})",
                    profile.accuracy_requirement
                ),
            )
        } else if profile.performance_requirement > threshold {
            (
                Backend::Statistical,
                "Strict performance requirements favour the fast statistical backend".to_string(),
            )
        } else {
            (
                Backend::Statistical,
                "The statistical backend offers a good balance of speed and accuracy".to_string(),
            )
        };

        let alternatives = [Backend::Statistical, Backend::Advanced]
            .into_iter()
            .filter(|&backend| {
                backend != recommended
                    && self.registry.contains(Capability::forecasting(backend))
            })
            .collect();

        EngineRecommendation {
            recommended,
            alternatives,
            reasoning,
        }
    }

    pub fn health_check(&self) -> HealthStatus {
        let statistical = self.registry.contains(Capability::StatisticalForecasting)
            && self.registry.contains(Capability::StatisticalAnomaly);
        let advanced = self.registry.contains(Capability::AdvancedForecasting)
            || self.registry.contains(Capability::AdvancedAnomaly);

        HealthStatus {
            statistical,
            advanced,
            overall: statistical,
        }
    }

    /// Registered capability keys in sorted order
    pub fn available_capabilities(&self) -> Vec<Capability> {
        self.registry.capabilities()
    }
}

fn fallback_chain(backend: Backend) -> Vec<Backend> {
    match backend {
        Backend::Advanced => vec![Backend::Advanced, Backend::Statistical],
        Backend::Statistical => vec![Backend::Statistical],
    }
}
