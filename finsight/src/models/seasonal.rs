//! Additive seasonal model for time series forecasting

use crate::error::Result;
use crate::models::{ForecastModel, TrainedForecastModel};
use stat_math::{decompose_additive, Decomposition};

/// Linear trend plus a fixed-period additive seasonal component
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    /// Name of the model
    name: String,
    /// Season length in observations
    period: usize,
}

/// Trained seasonal model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalDecomposition {
    /// Name of the model
    name: String,
    decomposition: Decomposition,
    fitted: Vec<f64>,
}

impl SeasonalDecomposition {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("Seasonal Decomposition (period={})", period),
            period,
        }
    }

    /// Whether `len` observations are enough to fit this model
    pub fn can_fit(&self, len: usize) -> bool {
        len >= self.period * 2
    }
}

impl ForecastModel for SeasonalDecomposition {
    type Trained = TrainedSeasonalDecomposition;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let decomposition = decompose_additive(values, self.period)?;
        let fitted = decomposition.fitted();

        Ok(TrainedSeasonalDecomposition {
            name: self.name.clone(),
            decomposition,
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalDecomposition {
    /// Zero-sum seasonal index per phase
    pub fn seasonal_indices(&self) -> &[f64] {
        &self.decomposition.seasonal_indices
    }
}

impl TrainedForecastModel for TrainedSeasonalDecomposition {
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon).map(|h| self.decomposition.forecast(h)).collect()
    }

    fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seasonal_model_repeats_phase_shape() {
        let pattern = [0.0, 10.0, 30.0, 10.0, 0.0, -10.0, -30.0, -10.0, 0.0, 5.0, 0.0, 5.0];
        let values: Vec<f64> = (0..24).map(|i| 500.0 + pattern[i % 12]).collect();

        let trained = SeasonalDecomposition::new(12).train(&values).unwrap();
        let forecast = trained.forecast(12);

        // Next season peaks at phase 2 and bottoms out at phase 6
        assert!(forecast[2] > forecast[0]);
        assert!(forecast[6] < forecast[4]);
        assert_eq!(trained.seasonal_indices().len(), 12);
    }

    #[test]
    fn test_seasonal_model_requires_two_seasons() {
        let model = SeasonalDecomposition::new(12);
        assert!(!model.can_fit(23));
        assert!(model.train(&[1.0; 23]).is_err());
    }
}
