use chrono::{Duration, TimeZone, Utc};
use finsight::{DataQuality, DateRange, TimeSeriesData, ValidationError, MIN_DATA_POINTS};
use pretty_assertions::assert_eq;

#[test]
fn test_from_points_preserves_pairs() {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let data = TimeSeriesData::from_points(vec![
        (start, 10.0),
        (start + Duration::days(1), 20.0),
        (start + Duration::days(2), 15.0),
    ]);

    assert_eq!(data.len(), 3);
    assert_eq!(data.values(), &[10.0, 20.0, 15.0]);
    assert_eq!(data.timestamps()[2], start + Duration::days(2));
    assert_eq!(data.cadence(), Some(Duration::days(1)));
    assert!(data.validate(MIN_DATA_POINTS).is_ok());
}

#[test]
fn test_date_range_defaults_to_observation_span() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = start + Duration::days(14);
    let data = TimeSeriesData::from_points(vec![(start, 1.0), (end, 2.0)]);

    assert_eq!(data.date_range(), Some(DateRange::new(start, end)));

    let source = DateRange::new(start - Duration::days(7), end + Duration::days(7));
    let data = data.with_date_range(source);
    assert_eq!(data.date_range(), Some(source));
    assert_eq!(TimeSeriesData::new(vec![], vec![]).date_range(), None);
}

#[test]
fn test_timeliness_reflects_stale_series() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let points = (0..10).map(|i| (start + Duration::days(i), 5.0)).collect();
    // Source range runs ten days past the last observation
    let data = TimeSeriesData::from_points(points)
        .with_date_range(DateRange::new(start, start + Duration::days(19)));

    let quality = DataQuality::assess(&data);
    assert!(quality.timeliness < 0.5);
    assert_eq!(quality.completeness, 1.0);
}

#[test]
fn test_supplied_quality_is_kept() {
    let quality = DataQuality {
        completeness: 0.9,
        accuracy: 1.0,
        consistency: 1.0,
        timeliness: 0.7,
    };
    let data = TimeSeriesData::new(vec![], vec![]).with_quality(quality);
    assert_eq!(*data.quality(), quality);
    assert_eq!(DataQuality::default().overall(), 1.0);
}

#[test]
fn test_unordered_timestamps_are_reported() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let data = TimeSeriesData::new(
        vec![start, start + Duration::days(2), start + Duration::days(1)],
        vec![1.0, 2.0, 3.0],
    );

    assert_eq!(
        data.validate(MIN_DATA_POINTS),
        Err(ValidationError::UnorderedTimestamps { index: 2 })
    );
    assert!(DataQuality::assess(&data).consistency < 1.0);
}

#[test]
fn test_series_serializes_as_plain_json() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let data = TimeSeriesData::from_points(vec![(start, 1.5), (start + Duration::days(1), 2.5)]);

    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["values"], serde_json::json!([1.5, 2.5]));
    assert_eq!(json["quality"]["completeness"], serde_json::json!(1.0));
}
