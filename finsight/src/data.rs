//! Time series data handling for analytics

use crate::error::ValidationError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of observations any operation accepts
pub const MIN_DATA_POINTS: usize = 3;

/// Quality scores attached to a series, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Share of expected periods that are present
    pub completeness: f64,
    /// Share of values that are finite and non-negative
    pub accuracy: f64,
    /// Share of consecutive timestamps that are strictly ascending
    pub consistency: f64,
    /// How close the last observation is to the end of the source range
    pub timeliness: f64,
}

impl Default for DataQuality {
    fn default() -> Self {
        Self {
            completeness: 1.0,
            accuracy: 1.0,
            consistency: 1.0,
            timeliness: 1.0,
        }
    }
}

impl DataQuality {
    /// Derive quality scores from the series itself
    pub fn assess(data: &TimeSeriesData) -> Self {
        let n = data.values.len();
        if n == 0 {
            return Self {
                completeness: 0.0,
                accuracy: 0.0,
                consistency: 0.0,
                timeliness: 0.0,
            };
        }

        let accuracy = data
            .values
            .iter()
            .filter(|v| v.is_finite() && **v >= 0.0)
            .count() as f64
            / n as f64;

        let consistency = if data.timestamps.len() < 2 {
            1.0
        } else {
            let ordered = data.timestamps.windows(2).filter(|w| w[1] > w[0]).count();
            ordered as f64 / (data.timestamps.len() - 1) as f64
        };

        let completeness = match (data.cadence(), data.timestamps.first(), data.timestamps.last()) {
            (Some(step), Some(first), Some(last)) if step.num_seconds() > 0 => {
                let expected = (*last - *first).num_seconds() / step.num_seconds() + 1;
                (data.timestamps.len() as f64 / expected.max(1) as f64).min(1.0)
            }
            _ => 1.0,
        };

        let timeliness = match (data.date_range, data.timestamps.last()) {
            (Some(range), Some(last)) => {
                let span = (range.end - range.start).num_seconds();
                if span <= 0 {
                    1.0
                } else {
                    let lag = (range.end - *last).num_seconds().max(0);
                    (1.0 - lag as f64 / span as f64).clamp(0.0, 1.0)
                }
            }
            _ => 1.0,
        };

        Self {
            completeness,
            accuracy,
            consistency,
            timeliness,
        }
    }

    /// Unweighted mean of the four scores
    pub fn overall(&self) -> f64 {
        (self.completeness + self.accuracy + self.consistency + self.timeliness) / 4.0
    }
}

/// Source date range the series was aggregated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Ordered `(timestamp, value)` observations with quality metadata
///
/// Construction never rejects input; call [`TimeSeriesData::validate`] (the
/// engines do) to get a precise description of what is wrong with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesData {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    quality: DataQuality,
    date_range: Option<DateRange>,
}

impl TimeSeriesData {
    /// Create a series from parallel timestamp and value vectors
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        Self {
            timestamps,
            values,
            quality: DataQuality::default(),
            date_range: None,
        }
    }

    /// Create a series from `(timestamp, value)` pairs
    pub fn from_points(points: Vec<(DateTime<Utc>, f64)>) -> Self {
        let (timestamps, values) = points.into_iter().unzip();
        Self::new(timestamps, values)
    }

    pub fn with_quality(mut self, quality: DataQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn quality(&self) -> &DataQuality {
        &self.quality
    }

    /// The explicit source range, or the span of the observations
    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range.or_else(|| {
            match (self.timestamps.first(), self.timestamps.last()) {
                (Some(start), Some(end)) => Some(DateRange::new(*start, *end)),
                _ => None,
            }
        })
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Median positive gap between consecutive timestamps
    pub fn cadence(&self) -> Option<Duration> {
        let mut gaps: Vec<i64> = self
            .timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds())
            .filter(|gap| *gap > 0)
            .collect();
        if gaps.is_empty() {
            return None;
        }

        gaps.sort_unstable();
        Some(Duration::seconds(gaps[gaps.len() / 2]))
    }

    /// Check every invariant the engines rely on
    ///
    /// Checks run in a fixed order so the first reported defect is stable:
    /// presence, length agreement, minimum size, value domain, ordering.
    pub fn validate(&self, min_points: usize) -> std::result::Result<(), ValidationError> {
        if self.values.is_empty() && self.timestamps.is_empty() {
            return Err(ValidationError::MissingData);
        }

        if self.values.len() != self.timestamps.len() {
            return Err(ValidationError::LengthMismatch {
                timestamps: self.timestamps.len(),
                values: self.values.len(),
            });
        }

        let required = min_points.max(MIN_DATA_POINTS);
        if self.values.len() < required {
            return Err(ValidationError::InsufficientData {
                required,
                actual: self.values.len(),
            });
        }

        if let Some(index) = self
            .values
            .iter()
            .position(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ValidationError::InvalidValues { index });
        }

        if let Some(offset) = self.timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ValidationError::UnorderedTimestamps { index: offset + 1 });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monthly(values: &[f64]) -> TimeSeriesData {
        let timestamps = (0..values.len())
            .map(|i| Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(30 * i as i64))
            .collect();
        TimeSeriesData::new(timestamps, values.to_vec())
    }

    #[test]
    fn test_validate_accepts_clean_series() {
        assert!(monthly(&[1.0, 2.0, 3.0]).validate(MIN_DATA_POINTS).is_ok());
    }

    #[test]
    fn test_validate_order_of_checks() {
        assert_eq!(
            TimeSeriesData::new(vec![], vec![]).validate(3),
            Err(ValidationError::MissingData)
        );

        let mut mismatched = monthly(&[1.0, 2.0]);
        mismatched.values.push(3.0);
        mismatched.values.push(4.0);
        assert_eq!(
            mismatched.validate(3),
            Err(ValidationError::LengthMismatch {
                timestamps: 2,
                values: 4
            })
        );

        assert_eq!(
            monthly(&[1.0, 2.0]).validate(3),
            Err(ValidationError::InsufficientData {
                required: 3,
                actual: 2
            })
        );

        assert_eq!(
            monthly(&[1.0, f64::NAN, -1.0]).validate(3),
            Err(ValidationError::InvalidValues { index: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_timestamps() {
        let mut data = monthly(&[1.0, 2.0, 3.0]);
        data.timestamps[2] = data.timestamps[1];
        assert_eq!(
            data.validate(3),
            Err(ValidationError::UnorderedTimestamps { index: 2 })
        );
    }

    #[test]
    fn test_cadence_is_median_gap() {
        let data = monthly(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(data.cadence(), Some(Duration::days(30)));
        assert_eq!(monthly(&[1.0]).cadence(), None);
    }

    #[test]
    fn test_quality_assessment() {
        let mut data = monthly(&[10.0, 12.0, 11.0, 13.0, 12.0]);
        // Drop one period from the middle
        data.timestamps.remove(2);
        data.values.remove(2);

        let quality = DataQuality::assess(&data);
        assert!(quality.completeness < 1.0);
        assert_eq!(quality.accuracy, 1.0);
        assert_eq!(quality.consistency, 1.0);
        assert_eq!(quality.timeliness, 1.0);
        assert!(quality.overall() < 1.0);
    }
}
