//! Series complexity classification shared by the forecaster and the selector

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use stat_math::{autocorrelation, coefficient_of_variation, LinearRegression};
use std::fmt;
use std::str::FromStr;

/// Detrended lag-`period` autocorrelation above which a series counts as seasonal
pub const SEASONALITY_THRESHOLD: f64 = 0.5;
/// Coefficient of variation separating SIMPLE from MODERATE series
pub const MODERATE_CV: f64 = 0.15;
/// Coefficient of variation separating MODERATE from COMPLEX series
pub const COMPLEX_CV: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "SIMPLE",
            Complexity::Moderate => "MODERATE",
            Complexity::Complex => "COMPLEX",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SIMPLE" => Ok(Complexity::Simple),
            "MODERATE" => Ok(Complexity::Moderate),
            "COMPLEX" => Ok(Complexity::Complex),
            other => Err(ValidationError::InvalidOption(format!(
                "unrecognized complexity '{}'",
                other
            ))),
        }
    }
}

/// Shape statistics of a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesProfile {
    pub coefficient_of_variation: f64,
    /// R² of a straight-line fit over the index axis
    pub trend_strength: f64,
    /// Per-step slope of that line
    pub trend_slope: f64,
    /// Detrended autocorrelation at the seasonal lag, `0.0` when too short to test
    pub seasonal_strength: f64,
    pub is_seasonal: bool,
    pub complexity: Complexity,
}

impl SeriesProfile {
    /// Profile `values`, testing for seasonality at `period`
    ///
    /// Expects at least two values; the engines validate before calling.
    pub fn analyze(values: &[f64], period: usize) -> Result<Self> {
        let cv = coefficient_of_variation(values)?;
        let trend = LinearRegression::fit(values)?;

        let seasonal_strength = if period >= 2 && values.len() >= period * 2 {
            let detrended: Vec<f64> = values
                .iter()
                .enumerate()
                .map(|(i, v)| v - trend.predict(i as f64))
                .collect();
            autocorrelation(&detrended, period)?
        } else {
            0.0
        };
        let is_seasonal = seasonal_strength > SEASONALITY_THRESHOLD;

        let complexity = if is_seasonal || cv > COMPLEX_CV {
            Complexity::Complex
        } else if cv > MODERATE_CV {
            Complexity::Moderate
        } else {
            Complexity::Simple
        };

        Ok(Self {
            coefficient_of_variation: cv,
            trend_strength: trend.r_squared(),
            trend_slope: trend.slope(),
            seasonal_strength,
            is_seasonal,
            complexity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SIMPLE", Complexity::Simple)]
    #[case("moderate", Complexity::Moderate)]
    #[case(" Complex ", Complexity::Complex)]
    fn test_parse_complexity(#[case] input: &str, #[case] expected: Complexity) {
        assert_eq!(input.parse::<Complexity>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_complexity_is_rejected() {
        assert!("EXTREME".parse::<Complexity>().is_err());
    }

    #[test]
    fn test_flat_series_is_simple() {
        let profile = SeriesProfile::analyze(&[100.0, 101.0, 99.0, 100.0, 102.0], 12).unwrap();
        assert_eq!(profile.complexity, Complexity::Simple);
        assert!(!profile.is_seasonal);
    }

    #[test]
    fn test_seasonal_series_is_complex() {
        let pattern = [0.0, 20.0, 40.0, 20.0, 0.0, -20.0, -40.0, -20.0, 0.0, 20.0, 40.0, 20.0];
        let values: Vec<f64> = (0..36).map(|i| 200.0 + i as f64 + pattern[i % 12]).collect();

        let profile = SeriesProfile::analyze(&values, 12).unwrap();
        assert!(profile.is_seasonal);
        assert_eq!(profile.complexity, Complexity::Complex);
    }

    #[test]
    fn test_volatile_series_is_not_simple() {
        let values = [100.0, 160.0, 70.0, 150.0, 60.0, 140.0];
        let profile = SeriesProfile::analyze(&values, 12).unwrap();
        assert_ne!(profile.complexity, Complexity::Simple);
    }
}
