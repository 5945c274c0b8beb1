//! Descriptive statistics over value slices
//!
//! Thin, validated wrappers around `statrs` so callers get a typed error
//! instead of a silent `NaN` on empty input.

use crate::{MathError, Result, EPSILON};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

fn require_values(values: &[f64], what: &str) -> Result<()> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(format!(
            "Cannot calculate {} of an empty series",
            what
        )));
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    require_values(values, "mean")?;
    Ok(values.iter().mean())
}

/// Population variance (divides by `n`)
pub fn population_variance(values: &[f64]) -> Result<f64> {
    require_values(values, "variance")?;
    if values.len() == 1 {
        return Ok(0.0);
    }
    Ok(values.iter().population_variance())
}

/// Population standard deviation (divides by `n`)
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    Ok(population_variance(values)?.sqrt())
}

/// Coefficient of variation, `std_dev / |mean|`
///
/// Returns `0.0` for a zero-mean series instead of dividing by zero.
pub fn coefficient_of_variation(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    if mean.abs() < EPSILON {
        return Ok(0.0);
    }
    Ok(population_std_dev(values)? / mean.abs())
}

/// Quantile with linear interpolation between order statistics
///
/// `q` must lie in `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    require_values(values, "quantile")?;
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be between 0 and 1, got {}",
            q
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Median, the 0.5 quantile
pub fn median(values: &[f64]) -> Result<f64> {
    quantile(values, 0.5)
}

/// Two-sided standard normal critical value for a confidence level
///
/// `two_sided_z(0.95)` is approximately `1.96`.
pub fn two_sided_z(confidence: f64) -> Result<f64> {
    if confidence <= 0.0 || confidence >= 1.0 {
        return Err(MathError::InvalidInput(
            "Confidence level must be between 0 and 1 (exclusive)".to_string(),
        ));
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| MathError::CalculationError(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + confidence / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        assert_relative_eq!(population_std_dev(&values).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(mean(&[]), Err(MathError::InsufficientData(_))));
        assert!(quantile(&[], 0.5).is_err());
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];

        assert_relative_eq!(quantile(&values, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile(&values, 0.25).unwrap(), 1.75);
        assert_relative_eq!(median(&values).unwrap(), 2.5);
        assert_relative_eq!(quantile(&values, 1.0).unwrap(), 4.0);
        assert!(quantile(&values, 1.5).is_err());
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_relative_eq!(coefficient_of_variation(&[5.0, 5.0, 5.0]).unwrap(), 0.0);
        assert_relative_eq!(coefficient_of_variation(&[0.0, 0.0]).unwrap(), 0.0);

        let cv = coefficient_of_variation(&[90.0, 110.0]).unwrap();
        assert_relative_eq!(cv, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_two_sided_z() {
        assert_relative_eq!(two_sided_z(0.95).unwrap(), 1.959964, epsilon = 1e-5);
        assert!(two_sided_z(0.99).unwrap() > two_sided_z(0.9).unwrap());
        assert!(two_sided_z(1.0).is_err());
    }
}
