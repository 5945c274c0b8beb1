use chrono::{Duration, TimeZone, Utc};
use finsight::{
    AnomalySensitivity, DataCharacteristics, EngineProfile, EngineSelector, ForecastMethod,
    ForecastingOptions, SeriesProfile, TimeSeriesData,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=finsight=debug shows method selection and detector counts
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Three years of monthly revenue with a year-end peak and one bad month
    let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    let shape = [0.0, -4.0, 2.0, 5.0, 3.0, 0.0, -6.0, -8.0, 1.0, 6.0, 12.0, 24.0];
    let mut values: Vec<f64> = (0..36)
        .map(|i| 120.0 + 1.5 * i as f64 + shape[i % 12])
        .collect();
    values[20] = 310.0;
    let points = values
        .iter()
        .enumerate()
        .map(|(i, v)| (start + Duration::days(30 * i as i64), *v))
        .collect();
    let data = TimeSeriesData::from_points(points);

    let profile = SeriesProfile::analyze(data.values(), 12)?;
    println!(
        "Series profile: {} (cv {:.2}, trend R² {:.2}, seasonal strength {:.2})",
        profile.complexity,
        profile.coefficient_of_variation,
        profile.trend_strength,
        profile.seasonal_strength
    );

    let selector = EngineSelector::default();
    let recommendation = selector.engine_recommendations(&EngineProfile {
        size: data.len() as i64,
        complexity: profile.complexity.to_string(),
        accuracy_requirement: 0.85,
        performance_requirement: 0.5,
    });
    println!(
        "Recommended backend: {} ({})",
        recommendation.recommended, recommendation.reasoning
    );

    let forecaster =
        selector.forecasting_engine(data.len() as i64, profile.complexity.as_str(), false);
    let options = ForecastingOptions::new(ForecastMethod::Adaptive, 6)
        .with_seasonality(true)
        .with_domain_context(true);
    let forecast = forecaster.generate_forecast(&data, &options)?;

    println!("\nForecast using the {} model:", forecast.method);
    for (prediction, interval) in forecast
        .predictions
        .iter()
        .zip(forecast.confidence_intervals.iter())
    {
        println!(
            "  {}  {:>8.2}  [{:>8.2}, {:>8.2}]  confidence {:.2}",
            prediction.timestamp.format("%Y-%m"),
            prediction.value,
            interval.lower,
            interval.upper,
            prediction.confidence
        );
    }
    println!(
        "Backtest: MAPE {:.2}%, RMSE {:.2}, R² {:.3}",
        forecast.accuracy.mape, forecast.accuracy.rmse, forecast.accuracy.r_squared
    );
    for insight in &forecast.insights {
        println!("  * {}", insight);
    }

    let validation = forecaster.validate_model(&data)?;
    println!(
        "\nModel validation: valid={} cv={:.2} holdout={:.2} stability={:.2}",
        validation.is_valid,
        validation.metrics.cross_validation_score,
        validation.metrics.holdout_score,
        validation.metrics.stability_score
    );

    let detector = selector.anomaly_engine(
        &DataCharacteristics {
            size: data.len() as i64,
            complexity: profile.complexity.to_string(),
        },
        false,
    );
    let anomalies = detector.detect_anomalies(&data, AnomalySensitivity::Medium)?;
    println!("\nAnomalies: {}", anomalies.anomalies.len());
    for anomaly in &anomalies.anomalies {
        println!(
            "  {} {:?}: {}",
            anomaly.timestamp.format("%Y-%m"),
            anomaly.severity,
            anomaly.explanation
        );
    }
    for recommendation in &anomalies.recommendations {
        println!("  - {}", recommendation);
    }

    let health = selector.health_check();
    println!(
        "\nHealth: overall={} capabilities={:?}",
        health.overall,
        selector.available_capabilities()
    );

    Ok(())
}
