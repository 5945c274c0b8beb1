//! Statistical outlier detectors
//!
//! Each detector scores every point independently and returns the flagged
//! indices together with the value it expected at that position.

use super::DetectionMethod;
use crate::error::Result;
use stat_math::{mean, population_std_dev, quantile, EPSILON};
use std::collections::BTreeMap;
use std::ops::Range;

/// Flagged index mapped to the expected value at that index
pub type Flags = BTreeMap<usize, f64>;

/// A single outlier rule
pub trait Detector: Send + Sync {
    fn method(&self) -> DetectionMethod;

    fn detect(&self, values: &[f64]) -> Result<Flags>;
}

/// Global z-score against the series mean
#[derive(Debug, Clone, Copy)]
pub struct ZScoreDetector {
    threshold: f64,
}

impl ZScoreDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Detector for ZScoreDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::ZScore
    }

    fn detect(&self, values: &[f64]) -> Result<Flags> {
        let center = mean(values)?;
        let std_dev = population_std_dev(values)?;
        if std_dev < EPSILON {
            return Ok(Flags::new());
        }

        Ok(values
            .iter()
            .enumerate()
            .filter(|(_, &v)| (v - center).abs() / std_dev > self.threshold)
            .map(|(i, _)| (i, center))
            .collect())
    }
}

/// Tukey fences: outside `[Q1 − k·IQR, Q3 + k·IQR]`
#[derive(Debug, Clone, Copy)]
pub struct IqrDetector {
    multiplier: f64,
}

impl IqrDetector {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }
}

impl Detector for IqrDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::Iqr
    }

    fn detect(&self, values: &[f64]) -> Result<Flags> {
        let q1 = quantile(values, 0.25)?;
        let q3 = quantile(values, 0.75)?;
        let iqr = q3 - q1;
        let lower = q1 - self.multiplier * iqr;
        let upper = q3 + self.multiplier * iqr;
        let center = mean(values)?;

        Ok(values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v < lower || v > upper)
            .map(|(i, _)| (i, center))
            .collect())
    }
}

/// Deviation from the neighbours inside a centred window of `max(3, n/10)` points
///
/// The window is shifted inward at both ends of the series so it always
/// holds the full number of points. The point being scored is left out of
/// the local mean and spread, and the spread never drops below the
/// series-wide standard deviation.
#[derive(Debug, Clone, Copy)]
pub struct LocalDensityDetector {
    threshold: f64,
}

impl LocalDensityDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn window_size(len: usize) -> usize {
        (len / 10).max(3)
    }

    /// Index range of the window around `index` in a series of `len` points
    pub fn window(index: usize, len: usize) -> Range<usize> {
        let size = Self::window_size(len).min(len);
        let start = index.saturating_sub(size / 2).min(len - size);
        start..start + size
    }
}

impl Detector for LocalDensityDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::LocalDensity
    }

    fn detect(&self, values: &[f64]) -> Result<Flags> {
        let n = values.len();
        let mut flags = Flags::new();
        if n < 2 {
            return Ok(flags);
        }
        let series_std = population_std_dev(values)?;

        for (i, &value) in values.iter().enumerate() {
            let neighbours: Vec<f64> = Self::window(i, n)
                .filter(|&j| j != i)
                .map(|j| values[j])
                .collect();
            let local_mean = mean(&neighbours)?;
            let spread = population_std_dev(&neighbours)?.max(series_std);
            if spread > EPSILON && (value - local_mean).abs() / spread > self.threshold {
                flags.insert(i, local_mean);
            }
        }

        Ok(flags)
    }
}

/// Deviation from the per-phase mean of a fixed-period cycle
#[derive(Debug, Clone, Copy)]
pub struct SeasonalDetector {
    threshold: f64,
    period: usize,
    min_points: usize,
}

impl SeasonalDetector {
    pub fn new(threshold: f64, period: usize, min_points: usize) -> Self {
        Self {
            threshold,
            period,
            min_points,
        }
    }

    /// Whether a series of `len` points is long enough to build a baseline
    pub fn applies_to(&self, len: usize) -> bool {
        self.period >= 2 && len >= self.min_points.max(self.period * 2)
    }
}

impl Detector for SeasonalDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::SeasonalDeviation
    }

    fn detect(&self, values: &[f64]) -> Result<Flags> {
        if !self.applies_to(values.len()) {
            return Ok(Flags::new());
        }

        let mut flags = Flags::new();
        for phase in 0..self.period {
            let members: Vec<(usize, f64)> = values
                .iter()
                .copied()
                .enumerate()
                .skip(phase)
                .step_by(self.period)
                .collect();
            let phase_values: Vec<f64> = members.iter().map(|&(_, v)| v).collect();
            let baseline = mean(&phase_values)?;
            let std_dev = population_std_dev(&phase_values)?;
            if std_dev < EPSILON {
                continue;
            }

            flags.extend(
                members
                    .into_iter()
                    .filter(|&(_, v)| (v - baseline).abs() / std_dev > self.threshold)
                    .map(|(i, _)| (i, baseline)),
            );
        }

        Ok(flags)
    }
}
