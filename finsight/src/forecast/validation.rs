//! Rolling-origin model validation

use super::forecaster::TimeSeriesForecaster;
use super::{ForecastMethod, ModelKind};
use crate::complexity::SeriesProfile;
use crate::data::{TimeSeriesData, MIN_DATA_POINTS};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use stat_math::{coefficient_of_variation, EPSILON};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Mean one-step accuracy over the rolling folds, `1 − min(APE, 1)` per fold
    pub cross_validation_score: f64,
    /// Backtest confidence on the most recent observations
    pub holdout_score: f64,
    /// `1 / (1 + CV(|residuals|))`, in `(0, 1]`
    pub stability_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelValidation {
    pub is_valid: bool,
    pub metrics: ValidationMetrics,
    pub recommendations: Vec<String>,
}

/// Scores the forecaster's adaptive model on a series
///
/// Once the series itself is valid, every failure along the way lowers a
/// score instead of surfacing as an error.
#[derive(Debug, Clone, Copy)]
pub struct ModelValidator<'a> {
    forecaster: &'a TimeSeriesForecaster,
}

impl<'a> ModelValidator<'a> {
    pub fn new(forecaster: &'a TimeSeriesForecaster) -> Self {
        Self { forecaster }
    }

    pub fn validate(&self, data: &TimeSeriesData) -> Result<ModelValidation> {
        data.validate(MIN_DATA_POINTS)?;

        let config = self.forecaster.config();
        let values = data.values();
        let mut recommendations = Vec::new();

        let model_kind = match SeriesProfile::analyze(values, config.seasonal_period) {
            Ok(profile) => {
                self.forecaster
                    .resolve_model(ForecastMethod::Adaptive, false, &profile, values.len())
            }
            Err(err) => {
                warn!(error = %err, "series profile failed, validating the linear model");
                ModelKind::Linear
            }
        };

        let fold_scores = self.fold_scores(model_kind, values);
        let cross_validation_score = if fold_scores.is_empty() {
            recommendations.push("No validation fold could be evaluated".to_string());
            0.0
        } else {
            fold_scores.iter().sum::<f64>() / fold_scores.len() as f64
        };

        let holdout_score = match self.forecaster.backtest(model_kind, values) {
            Ok(backtest) => backtest.confidence,
            Err(err) => {
                warn!(error = %err, "holdout backtest failed");
                recommendations.push("Holdout backtest could not be evaluated".to_string());
                0.0
            }
        };

        let stability_score = match self.stability(model_kind, values) {
            Some(score) => score,
            None => {
                recommendations.push("Residual stability could not be evaluated".to_string());
                0.0
            }
        };

        let metrics = ValidationMetrics {
            cross_validation_score,
            holdout_score,
            stability_score,
        };

        if metrics.cross_validation_score < config.min_cross_validation_score {
            recommendations.push(format!(
                "One-step accuracy {:.2} is below {:.2}; the series may be too irregular for the {} model",
                metrics.cross_validation_score, config.min_cross_validation_score, model_kind
            ));
        }
        if metrics.holdout_score < config.min_holdout_score {
            recommendations.push(format!(
                "Holdout score {:.2} is below {:.2}; recent periods diverge from the fitted pattern",
                metrics.holdout_score, config.min_holdout_score
            ));
        }
        if metrics.stability_score < config.min_stability_score {
            recommendations.push(format!(
                "Stability score {:.2} is below {:.2}; residuals are uneven across the history",
                metrics.stability_score, config.min_stability_score
            ));
        }

        let is_valid = metrics.cross_validation_score >= config.min_cross_validation_score
            && metrics.holdout_score >= config.min_holdout_score
            && metrics.stability_score >= config.min_stability_score;
        if is_valid {
            recommendations.push(format!(
                "The {} model is suitable for forecasting this series",
                model_kind
            ));
        }

        debug!(
            model = %model_kind,
            folds = fold_scores.len(),
            is_valid,
            "model validation complete"
        );

        Ok(ModelValidation {
            is_valid,
            metrics,
            recommendations,
        })
    }

    /// One-step-ahead scores for the last `cv_folds` origins
    fn fold_scores(&self, model_kind: ModelKind, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let folds = self.forecaster.config().cv_folds.min(n.saturating_sub(2));

        (n - folds..n)
            .filter_map(|end| {
                let model = self.forecaster.fit(model_kind, &values[..end]).ok()?;
                let predicted = model.forecast(1).first().copied()?;
                let actual = values[end];
                let error = (predicted - actual).abs();
                let ape = if actual.abs() > EPSILON {
                    error / actual.abs()
                } else if error < EPSILON {
                    0.0
                } else {
                    1.0
                };
                ape.is_finite().then(|| 1.0 - ape.min(1.0))
            })
            .collect()
    }

    fn stability(&self, model_kind: ModelKind, values: &[f64]) -> Option<f64> {
        let model = self.forecaster.fit(model_kind, values).ok()?;
        let residuals: Vec<f64> = model
            .residuals(values)
            .into_iter()
            .map(f64::abs)
            .collect();
        let cv = coefficient_of_variation(&residuals).ok()?;
        Some(1.0 / (1.0 + cv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn monthly(values: &[f64]) -> TimeSeriesData {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| start + Duration::days(30 * i as i64))
            .collect();
        TimeSeriesData::new(timestamps, values.to_vec())
    }

    #[test]
    fn test_clean_trend_is_valid() {
        let values: Vec<f64> = (0..24)
            .map(|i| 1000.0 + 25.0 * i as f64 + if i % 2 == 0 { 3.0 } else { -3.0 })
            .collect();
        let forecaster = TimeSeriesForecaster::default();

        let validation = ModelValidator::new(&forecaster)
            .validate(&monthly(&values))
            .unwrap();
        assert!(validation.is_valid, "{:?}", validation);
        assert!(validation.metrics.cross_validation_score > 0.9);
        assert!(validation.metrics.stability_score > 0.0 && validation.metrics.stability_score <= 1.0);
    }

    #[test]
    fn test_erratic_series_is_invalid_without_error() {
        let values = [5.0, 900.0, 3.0, 700.0, 1.0, 1200.0, 4.0, 50.0];
        let forecaster = TimeSeriesForecaster::default();

        let validation = ModelValidator::new(&forecaster)
            .validate(&monthly(&values))
            .unwrap();
        assert!(!validation.is_valid);
        assert!(!validation.recommendations.is_empty());
    }

    #[test]
    fn test_three_points_single_fold() {
        let forecaster = TimeSeriesForecaster::default();
        let validation = ModelValidator::new(&forecaster)
            .validate(&monthly(&[10.0, 20.0, 30.0]))
            .unwrap();
        assert!(validation.metrics.cross_validation_score > 0.99);
    }
}
