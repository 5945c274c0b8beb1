//! Narrative text attached to forecast results

use super::{ForecastMethod, ForecastingOptions, ModelKind, Prediction};
use crate::complexity::{SeriesProfile, COMPLEX_CV, MODERATE_CV};

/// Absolute per-period growth, in percent, below which a trend reads as flat
const FLAT_GROWTH_PCT: f64 = 0.5;
/// History length below which more data is requested
const SHORT_HISTORY: usize = 24;
const LOW_CONFIDENCE: f64 = 0.5;
const GOOD_CONFIDENCE: f64 = 0.8;

const DOMAIN_INSIGHTS: [&str; 2] = [
    "Revenue in this sector commonly follows seasonal business cycles tied to budgeting and holiday periods",
    "Shifts toward alternative payment channels can move volume between reporting lines without changing total demand",
];

const DOMAIN_RECOMMENDATIONS: [&str; 2] = [
    "Reconcile forecasted periods against upcoming regulatory filing deadlines",
    "Monitor payment channel mix alongside the forecast to catch migrations early",
];

/// Insights and recommendations for one forecast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narrative {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Narrative {
    pub fn describe(
        profile: &SeriesProfile,
        options: &ForecastingOptions,
        model: ModelKind,
        confidence: f64,
        values: &[f64],
        predictions: &[Prediction],
    ) -> Self {
        let mut narrative = Narrative::default();
        let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;

        let growth_pct = if mean.abs() > f64::EPSILON {
            profile.trend_slope / mean * 100.0
        } else {
            0.0
        };
        if growth_pct.abs() < FLAT_GROWTH_PCT {
            narrative
                .insights
                .push("The series is broadly stable with no material trend".to_string());
        } else {
            let direction = if growth_pct > 0.0 { "an upward" } else { "a downward" };
            narrative.insights.push(format!(
                "The series shows {} trend of {:.1}% per period",
                direction,
                growth_pct.abs()
            ));
        }

        if let (Some(&last), Some(final_prediction)) = (values.last(), predictions.last()) {
            if last > f64::EPSILON {
                let change = (final_prediction.value - last) / last * 100.0;
                narrative.insights.push(format!(
                    "Projected change over the next {} periods: {:+.1}%",
                    predictions.len(),
                    change
                ));
            }
        }

        let volatility = if profile.coefficient_of_variation > COMPLEX_CV {
            "high"
        } else if profile.coefficient_of_variation > MODERATE_CV {
            "moderate"
        } else {
            "low"
        };
        narrative.insights.push(format!(
            "Volatility is {} (coefficient of variation {:.2})",
            volatility, profile.coefficient_of_variation
        ));

        match (options.method, model) {
            (_, ModelKind::Seasonal) => narrative.insights.push(format!(
                "A recurring seasonal pattern was modelled (strength {:.2})",
                profile.seasonal_strength
            )),
            (ForecastMethod::Seasonal, _) => narrative.insights.push(
                "Seasonal forecasting was not possible for this request; a linear trend was used instead"
                    .to_string(),
            ),
            (ForecastMethod::Adaptive, model) => narrative.insights.push(format!(
                "Adaptive selection chose the {} model for a {} series",
                model,
                profile.complexity.as_str().to_lowercase()
            )),
            _ => {}
        }

        if confidence < LOW_CONFIDENCE {
            narrative.recommendations.push(format!(
                "Forecast confidence is low ({:.0}%); treat these figures as directional only",
                confidence * 100.0
            ));
        } else if confidence < GOOD_CONFIDENCE {
            narrative.recommendations.push(format!(
                "Forecast confidence is moderate ({:.0}%); review against planned activity before relying on it",
                confidence * 100.0
            ));
        }
        if values.len() < SHORT_HISTORY {
            narrative.recommendations.push(format!(
                "Collect more history: {} periods on record, {} or more improve seasonal detection",
                values.len(),
                SHORT_HISTORY
            ));
        }
        if volatility == "high" {
            narrative.recommendations.push(
                "High volatility detected; plan with the interval bounds rather than the point forecast"
                    .to_string(),
            );
        }
        if narrative.recommendations.is_empty() {
            narrative.recommendations.push(
                "Forecast quality is good; refresh the forecast as new periods close".to_string(),
            );
        }

        narrative
    }

    /// Append sector guidance; never touches numeric output
    pub fn apply_domain_context(&mut self) {
        self.insights
            .extend(DOMAIN_INSIGHTS.iter().map(|s| s.to_string()));
        self.recommendations
            .extend(DOMAIN_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    }
}
