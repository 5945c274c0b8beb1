//! Statistical forecasting engine

use super::insights::Narrative;
use super::validation::{ModelValidation, ModelValidator};
use super::{
    AccuracyMetrics, ConfidenceInterval, ForecastMethod, ForecastResult, ForecastingOptions,
    ModelKind, Prediction,
};
use crate::complexity::{Complexity, SeriesProfile};
use crate::config::ForecasterConfig;
use crate::data::{TimeSeriesData, MIN_DATA_POINTS};
use crate::error::{AnalyticsError, Result, ValidationError};
use crate::metrics::{forecast_accuracy, DirectionCounts, ForecastAccuracy, ModelMetrics};
use crate::models::{
    ExponentialSmoothing, ForecastModel, LinearTrend, SeasonalDecomposition, TrainedForecastModel,
};
use chrono::{DateTime, Duration, Utc};
use stat_math::{population_std_dev, population_variance, two_sided_z, EPSILON};
use tracing::{debug, info};

/// Trend R² at or above which the adaptive method extrapolates the trend
pub const STRONG_TREND_R2: f64 = 0.5;
/// Per-step decay applied to prediction confidence
const CONFIDENCE_DECAY: f64 = 0.05;

/// Out-of-sample evaluation of a model on the most recent observations
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Backtest {
    pub model: ModelKind,
    pub accuracy: ForecastAccuracy,
    pub directions: DirectionCounts,
    pub r_squared: f64,
    pub confidence: f64,
}

/// Forecasting engine over linear, exponential and seasonal models
///
/// Holds only its configuration; every call works on the data it is given.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesForecaster {
    config: ForecasterConfig,
}

impl TimeSeriesForecaster {
    pub fn new(config: ForecasterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecasterConfig {
        &self.config
    }

    /// Forecast `options.periods` future values of `data`
    pub fn generate_forecast(
        &self,
        data: &TimeSeriesData,
        options: &ForecastingOptions,
    ) -> Result<ForecastResult> {
        data.validate(MIN_DATA_POINTS)?;
        options.validate()?;

        let values = data.values();
        let profile = SeriesProfile::analyze(values, self.config.seasonal_period)?;
        let model_kind =
            self.resolve_model(options.method, options.include_seasonality, &profile, values.len());
        debug!(
            requested = ?options.method,
            resolved = %model_kind,
            complexity = %profile.complexity,
            points = values.len(),
            "forecast method resolved"
        );

        let model = self.fit(model_kind, values)?;
        let backtest = self.backtest(model_kind, values)?;

        let raw = model.forecast(options.periods);
        if let Some(index) = raw.iter().position(|v| !v.is_finite()) {
            return Err(AnalyticsError::Computation(format!(
                "{} produced a non-finite forecast at step {}",
                model.name(),
                index + 1
            )));
        }

        let residual_std = population_std_dev(&model.residuals(values))?;
        let z = two_sided_z(options.confidence)?;
        let fit_penalty = 2.0 - backtest.r_squared.clamp(0.0, 1.0);
        let timestamps = future_timestamps(data, options.periods)?;

        let mut predictions = Vec::with_capacity(options.periods);
        let mut intervals = Vec::with_capacity(options.periods);
        for (step, (raw_value, timestamp)) in raw.iter().zip(timestamps).enumerate() {
            let value = raw_value.max(0.0);
            let confidence =
                (backtest.confidence / (1.0 + CONFIDENCE_DECAY * step as f64)).clamp(0.0, 1.0);
            let half_width = z * residual_std * ((step + 1) as f64).sqrt() * fit_penalty;

            predictions.push(Prediction {
                timestamp,
                value,
                confidence,
            });
            intervals.push(ConfidenceInterval {
                lower: (value - half_width).max(0.0),
                upper: value + half_width,
                probability: options.confidence,
            });
        }

        let mut narrative = Narrative::describe(
            &profile,
            options,
            model_kind,
            backtest.confidence,
            values,
            &predictions,
        );
        if options.domain_context {
            narrative.apply_domain_context();
        }

        info!(
            model = %model_kind,
            periods = options.periods,
            mape = backtest.accuracy.mape,
            confidence = backtest.confidence,
            "forecast generated"
        );

        Ok(ForecastResult {
            method: model_kind,
            predictions,
            confidence_intervals: intervals,
            accuracy: AccuracyMetrics {
                mape: backtest.accuracy.mape,
                rmse: backtest.accuracy.rmse,
                r_squared: backtest.r_squared,
                confidence: backtest.confidence,
            },
            insights: narrative.insights,
            recommendations: narrative.recommendations,
        })
    }

    /// Rolling-origin validation of the adaptively chosen model
    pub fn validate_model(&self, data: &TimeSeriesData) -> Result<ModelValidation> {
        ModelValidator::new(self).validate(data)
    }

    /// Baseline monitoring figures for the statistical backend
    pub fn model_metrics(&self) -> ModelMetrics {
        ModelMetrics::statistical_baseline()
    }

    /// Monitoring figures measured by backtesting the adaptive model on `data`
    pub fn model_metrics_for(&self, data: &TimeSeriesData) -> Result<ModelMetrics> {
        data.validate(MIN_DATA_POINTS)?;
        let values = data.values();
        let profile = SeriesProfile::analyze(values, self.config.seasonal_period)?;
        let model_kind = self.resolve_model(ForecastMethod::Adaptive, true, &profile, values.len());
        let backtest = self.backtest(model_kind, values)?;

        Ok(ModelMetrics::from_backtest(
            &backtest.accuracy,
            &backtest.directions,
        ))
    }

    /// Map a requested method onto the model that will actually run
    pub(crate) fn resolve_model(
        &self,
        method: ForecastMethod,
        include_seasonality: bool,
        profile: &SeriesProfile,
        len: usize,
    ) -> ModelKind {
        let seasonal_possible = include_seasonality
            && SeasonalDecomposition::new(self.config.seasonal_period).can_fit(len);

        match method {
            ForecastMethod::Linear => ModelKind::Linear,
            ForecastMethod::Exponential => ModelKind::Exponential,
            ForecastMethod::Seasonal if seasonal_possible => ModelKind::Seasonal,
            ForecastMethod::Seasonal => {
                info!(
                    points = len,
                    include_seasonality,
                    "seasonal forecast not possible, using linear trend"
                );
                ModelKind::Linear
            }
            ForecastMethod::Adaptive => {
                if profile.is_seasonal && seasonal_possible {
                    ModelKind::Seasonal
                } else if profile.complexity == Complexity::Simple
                    || profile.trend_strength >= STRONG_TREND_R2
                {
                    ModelKind::Linear
                } else {
                    ModelKind::Exponential
                }
            }
        }
    }

    pub(crate) fn fit(
        &self,
        model_kind: ModelKind,
        values: &[f64],
    ) -> Result<Box<dyn TrainedForecastModel>> {
        match model_kind {
            ModelKind::Linear => LinearTrend::new().train_boxed(values),
            ModelKind::Exponential => ExponentialSmoothing::variance_adaptive().train_boxed(values),
            ModelKind::Seasonal => {
                SeasonalDecomposition::new(self.config.seasonal_period).train_boxed(values)
            }
        }
    }

    /// Like [`fit`](Self::fit), but falls back to the linear trend when the
    /// series is too short for a seasonal model
    pub(crate) fn fit_within(
        &self,
        model_kind: ModelKind,
        values: &[f64],
    ) -> Result<(ModelKind, Box<dyn TrainedForecastModel>)> {
        let model_kind = match model_kind {
            ModelKind::Seasonal
                if !SeasonalDecomposition::new(self.config.seasonal_period)
                    .can_fit(values.len()) =>
            {
                ModelKind::Linear
            }
            other => other,
        };
        Ok((model_kind, self.fit(model_kind, values)?))
    }

    /// Hold out the last `clamp(n/4, 1, max_holdout)` points and score the model on them
    pub(crate) fn backtest(&self, model_kind: ModelKind, values: &[f64]) -> Result<Backtest> {
        let n = values.len();
        if n < 2 {
            return Err(ValidationError::InsufficientData {
                required: 2,
                actual: n,
            }
            .into());
        }

        let holdout = (n / 4).clamp(1, self.config.max_holdout);
        let (train, test) = values.split_at(n - holdout);
        let (model_kind, model) = self.fit_within(model_kind, train)?;
        let forecast = model.forecast(holdout);

        let accuracy = forecast_accuracy(&forecast, test)?;
        let variance = population_variance(values)?;
        let r_squared = if variance < EPSILON {
            if accuracy.mse < EPSILON {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - accuracy.mse / variance
        };
        let confidence = (r_squared.max(0.0) * (1.0 - 1.0 / n as f64).sqrt()).clamp(0.0, 1.0);
        let last_observed = train.last().copied().unwrap_or_default();
        let directions = DirectionCounts::from_moves(last_observed, &forecast, test);

        debug!(
            model = %model_kind,
            holdout,
            mape = accuracy.mape,
            r_squared,
            "backtest complete"
        );

        Ok(Backtest {
            model: model_kind,
            accuracy,
            directions,
            r_squared,
            confidence,
        })
    }
}

/// Continue the series' cadence past its last timestamp
fn future_timestamps(data: &TimeSeriesData, periods: usize) -> Result<Vec<DateTime<Utc>>> {
    let last = *data
        .timestamps()
        .last()
        .ok_or(ValidationError::MissingData)?;
    let step = data.cadence().unwrap_or_else(|| Duration::days(1));

    (1..=periods)
        .map(|k| {
            i32::try_from(k)
                .ok()
                .and_then(|k| last.checked_add_signed(step * k))
                .ok_or_else(|| {
                    AnalyticsError::Computation(format!(
                        "forecast timestamp {} periods past {} is out of range",
                        k, last
                    ))
                })
        })
        .collect()
}
