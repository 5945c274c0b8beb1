use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use finsight::{
    AnalyticsError, ForecastMethod, ForecastingOptions, ModelKind, TimeSeriesData,
    TimeSeriesForecaster, ValidationError,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;

const SCENARIO_A: [f64; 12] = [
    100.0, 110.0, 105.0, 120.0, 115.0, 130.0, 125.0, 140.0, 135.0, 150.0, 145.0, 160.0,
];

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

// Evenly spaced 30-day periods
fn monthly(values: &[f64]) -> TimeSeriesData {
    let timestamps = (0..values.len())
        .map(|i| start() + Duration::days(30 * i as i64))
        .collect();
    TimeSeriesData::new(timestamps, values.to_vec())
}

// Trend plus seasonal swing plus seeded gaussian noise, floored at zero
fn noisy_series(seed: u64, len: usize, slope: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 8.0).unwrap();
    (0..len)
        .map(|i| {
            let season = 15.0 * ((i % 12) as f64 * std::f64::consts::PI / 6.0).sin();
            (200.0 + slope * i as f64 + season + noise.sample(&mut rng)).max(0.0)
        })
        .collect()
}

fn seasonal_series(cycles: usize) -> Vec<f64> {
    let pattern = [0.0, 20.0, 40.0, 20.0, 0.0, -20.0, -40.0, -20.0, 0.0, 20.0, 40.0, 20.0];
    (0..cycles * 12)
        .map(|i| 300.0 + 2.0 * i as f64 + pattern[i % 12])
        .collect()
}

#[test]
fn test_linear_trend_scenario() {
    let forecaster = TimeSeriesForecaster::default();
    let options = ForecastingOptions::new(ForecastMethod::Linear, 6);

    let result = forecaster
        .generate_forecast(&monthly(&SCENARIO_A), &options)
        .unwrap();

    assert_eq!(result.method, ModelKind::Linear);
    assert_eq!(result.predictions.len(), 6);
    let values = result.values();
    assert!(values[0] > 150.0);
    assert!(values.windows(2).all(|w| w[1] > w[0]));
    assert!(result.accuracy.mape < 20.0);
    assert!(result.accuracy.confidence > 0.8);
}

#[test]
fn test_prediction_timestamps_continue_cadence() {
    let data = monthly(&SCENARIO_A);
    let result = TimeSeriesForecaster::default()
        .generate_forecast(&data, &ForecastingOptions::new(ForecastMethod::Linear, 3))
        .unwrap();

    let last = *data.timestamps().last().unwrap();
    for (k, prediction) in result.predictions.iter().enumerate() {
        assert_eq!(prediction.timestamp, last + Duration::days(30 * (k as i64 + 1)));
    }
}

#[test]
fn test_confidence_decays_and_intervals_widen() {
    let result = TimeSeriesForecaster::default()
        .generate_forecast(&monthly(&SCENARIO_A), &ForecastingOptions::default())
        .unwrap();

    for pair in result.predictions.windows(2) {
        assert!(pair[1].confidence < pair[0].confidence);
    }
    let first = &result.predictions[0];
    assert_relative_eq!(first.confidence, result.accuracy.confidence, epsilon = 1e-12);

    let widths: Vec<f64> = result
        .confidence_intervals
        .iter()
        .zip(result.predictions.iter())
        .map(|(interval, prediction)| interval.upper - prediction.value)
        .collect();
    assert!(widths.windows(2).all(|w| w[1] > w[0]));

    for (interval, prediction) in result.confidence_intervals.iter().zip(&result.predictions) {
        assert!(interval.lower <= prediction.value && prediction.value <= interval.upper);
        assert!(interval.lower >= 0.0);
        assert_eq!(interval.probability, 0.95);
    }
}

#[test]
fn test_constant_series_forecast() {
    let result = TimeSeriesForecaster::default()
        .generate_forecast(
            &monthly(&[250.0; 10]),
            &ForecastingOptions::new(ForecastMethod::Exponential, 4),
        )
        .unwrap();

    assert_eq!(result.values(), vec![250.0; 4]);
    assert_eq!(result.accuracy.r_squared, 1.0);
    assert_relative_eq!(result.accuracy.rmse, 0.0);
    for interval in &result.confidence_intervals {
        assert_relative_eq!(interval.upper - interval.lower, 0.0);
    }
}

#[test]
fn test_declining_series_is_clipped_at_zero() {
    let values: Vec<f64> = (0..10).map(|i| 90.0 - 10.0 * i as f64).collect();
    let result = TimeSeriesForecaster::default()
        .generate_forecast(&monthly(&values), &ForecastingOptions::new(ForecastMethod::Linear, 5))
        .unwrap();

    assert!(result.values().iter().all(|v| *v == 0.0));
    assert!(result.confidence_intervals.iter().all(|i| i.lower == 0.0));
}

#[rstest]
#[case(ForecastMethod::Linear)]
#[case(ForecastMethod::Exponential)]
#[case(ForecastMethod::Seasonal)]
#[case(ForecastMethod::Adaptive)]
fn test_forecasts_are_deterministic(#[case] method: ForecastMethod) {
    let data = monthly(&noisy_series(7, 48, 1.5));
    let options = ForecastingOptions::new(method, 8).with_seasonality(true);
    let forecaster = TimeSeriesForecaster::default();

    let first = forecaster.generate_forecast(&data, &options).unwrap();
    let second = forecaster.generate_forecast(&data, &options).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn test_output_bounds_hold_for_noisy_series(
    #[values(1, 2, 3, 4)] seed: u64,
    #[values(ForecastMethod::Linear, ForecastMethod::Exponential, ForecastMethod::Adaptive)]
    method: ForecastMethod,
) {
    let data = monthly(&noisy_series(seed, 3 + seed as usize * 9, -1.0 + seed as f64));
    let options = ForecastingOptions::new(method, 12).with_confidence(0.8);

    let result = TimeSeriesForecaster::default()
        .generate_forecast(&data, &options)
        .unwrap();

    assert_eq!(result.predictions.len(), 12);
    for prediction in &result.predictions {
        assert!(prediction.value >= 0.0);
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }
    assert!(result.accuracy.mape >= 0.0);
    assert!(result.accuracy.rmse >= 0.0);
    assert!(result.accuracy.r_squared <= 1.0);
    assert!((0.0..=1.0).contains(&result.accuracy.confidence));
}

#[test]
fn test_seasonal_requires_opt_in_and_history() {
    let forecaster = TimeSeriesForecaster::default();
    let data = monthly(&seasonal_series(3));

    let without_opt_in = forecaster
        .generate_forecast(&data, &ForecastingOptions::new(ForecastMethod::Seasonal, 12))
        .unwrap();
    assert_eq!(without_opt_in.method, ModelKind::Linear);

    let short = monthly(&seasonal_series(3)[..20]);
    let too_short = forecaster
        .generate_forecast(
            &short,
            &ForecastingOptions::new(ForecastMethod::Seasonal, 12).with_seasonality(true),
        )
        .unwrap();
    assert_eq!(too_short.method, ModelKind::Linear);

    let seasonal = forecaster
        .generate_forecast(
            &data,
            &ForecastingOptions::new(ForecastMethod::Seasonal, 12).with_seasonality(true),
        )
        .unwrap();
    assert_eq!(seasonal.method, ModelKind::Seasonal);
    // Next cycle repeats the shape: phase 2 peak above phase 6 trough
    let values = seasonal.values();
    assert!(values[2] > values[6]);
    assert!(seasonal.accuracy.mape < 5.0);
}

#[test]
fn test_adaptive_detects_seasonality() {
    let data = monthly(&seasonal_series(3));
    let options = ForecastingOptions::new(ForecastMethod::Adaptive, 6).with_seasonality(true);

    let result = TimeSeriesForecaster::default()
        .generate_forecast(&data, &options)
        .unwrap();
    assert_eq!(result.method, ModelKind::Seasonal);
    assert!(result.insights.iter().any(|i| i.contains("seasonal pattern")));
}

#[test]
fn test_unknown_method_name_runs_adaptive() {
    let options: ForecastingOptions =
        serde_json::from_str(r#"{"method": "lstm", "periods": 4}"#).unwrap();
    assert_eq!(options.method, ForecastMethod::Adaptive);

    let result = TimeSeriesForecaster::default()
        .generate_forecast(&monthly(&SCENARIO_A), &options)
        .unwrap();
    assert_eq!(result.predictions.len(), 4);
}

#[test]
fn test_domain_context_changes_text_only() {
    let forecaster = TimeSeriesForecaster::default();
    let data = monthly(&SCENARIO_A);
    let plain = ForecastingOptions::new(ForecastMethod::Linear, 6);
    let contextual = plain.clone().with_domain_context(true);

    let without = forecaster.generate_forecast(&data, &plain).unwrap();
    let with = forecaster.generate_forecast(&data, &contextual).unwrap();

    assert_eq!(without.predictions, with.predictions);
    assert_eq!(without.confidence_intervals, with.confidence_intervals);
    assert_eq!(without.accuracy, with.accuracy);
    assert!(with.insights.len() > without.insights.len());
    assert!(with.recommendations.len() > without.recommendations.len());
}

#[test]
fn test_two_points_are_insufficient() {
    let result = TimeSeriesForecaster::default()
        .generate_forecast(&monthly(&[100.0, 110.0]), &ForecastingOptions::default());

    let err = result.unwrap_err();
    assert!(err.to_string().contains("insufficient data points"));
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::InsufficientData {
            required: 3,
            actual: 2
        })
    );
}

#[test]
fn test_mismatched_lengths_are_rejected() {
    let timestamps = (0..4).map(|i| start() + Duration::days(i)).collect();
    let data = TimeSeriesData::new(timestamps, vec![1.0, 2.0, 3.0]);

    let err = TimeSeriesForecaster::default()
        .generate_forecast(&data, &ForecastingOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::Validation(ValidationError::LengthMismatch {
            timestamps: 4,
            values: 3
        })
    ));
    assert!(err
        .to_string()
        .contains("timestamps and values arrays must have the same length"));
}

#[rstest]
#[case(vec![], "time series data is required")]
#[case(vec![1.0, f64::NAN, 3.0], "invalid data values detected")]
#[case(vec![1.0, 2.0, -3.0], "invalid data values detected")]
#[case(vec![1.0, f64::INFINITY, 3.0, 4.0], "invalid data values detected")]
fn test_invalid_series_messages(#[case] values: Vec<f64>, #[case] expected: &str) {
    let err = TimeSeriesForecaster::default()
        .generate_forecast(&monthly(&values), &ForecastingOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains(expected), "{}", err);
}

#[test]
fn test_invalid_options_are_rejected() {
    let forecaster = TimeSeriesForecaster::default();
    let data = monthly(&SCENARIO_A);

    let zero_periods = ForecastingOptions::new(ForecastMethod::Linear, 0);
    assert!(matches!(
        forecaster.generate_forecast(&data, &zero_periods),
        Err(AnalyticsError::Validation(ValidationError::InvalidOption(_)))
    ));

    let bad_confidence = ForecastingOptions::default().with_confidence(1.2);
    assert!(forecaster.generate_forecast(&data, &bad_confidence).is_err());
}

#[test]
fn test_validate_model_on_trending_series() {
    let validation = TimeSeriesForecaster::default()
        .validate_model(&monthly(&SCENARIO_A))
        .unwrap();

    assert!(validation.is_valid, "{:?}", validation);
    assert!(validation.metrics.cross_validation_score > 0.6);
    assert!(validation.metrics.holdout_score > 0.8);
    assert!(validation.metrics.stability_score > 0.0 && validation.metrics.stability_score <= 1.0);
}

#[test]
fn test_validate_model_surfaces_only_series_errors() {
    let forecaster = TimeSeriesForecaster::default();
    assert!(forecaster.validate_model(&monthly(&[1.0, 2.0])).is_err());

    // Wildly erratic but well-formed data validates without error
    let validation = forecaster
        .validate_model(&monthly(&[0.0, 1000.0, 0.0, 5.0, 0.0, 800.0, 0.0]))
        .unwrap();
    assert!(!validation.is_valid);
}

#[test]
fn test_model_metrics_are_bounded() {
    let forecaster = TimeSeriesForecaster::default();

    let baseline = forecaster.model_metrics();
    assert_eq!(baseline.accuracy, 0.85);
    assert_eq!(baseline.precision, 0.82);
    assert_eq!(baseline.recall, 0.80);
    assert_relative_eq!(baseline.f1_score, 2.0 * 0.82 * 0.80 / 1.62, epsilon = 1e-12);

    let measured = forecaster.model_metrics_for(&monthly(&SCENARIO_A)).unwrap();
    for score in [measured.accuracy, measured.precision, measured.recall, measured.f1_score] {
        assert!((0.0..=1.0).contains(&score));
    }
    assert!(measured.mape >= 0.0 && measured.rmse >= 0.0);
}
