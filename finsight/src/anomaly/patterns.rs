//! Pattern mining and guidance over detected anomalies

use super::{AnomalyPattern, AnomalyPoint, AnomalySensitivity, PatternType, Severity};
use crate::config::DetectorConfig;
use chrono::Duration;
use stat_math::{coefficient_of_variation, mean};

const SECONDS_PER_DAY: f64 = 86_400.0;

const DOMAIN_SUGGESTIONS: [&str; 2] = [
    "Cross-check flagged periods against promotions, billing runs and reporting adjustments",
    "Confirm whether flagged spikes correspond to one-off contracts or refunds",
];

/// Group anomalies whose consecutive timestamps are at most `cluster_gap_days` apart
///
/// `anomalies` must be in ascending time order.
pub fn find_clusters(anomalies: &[AnomalyPoint], config: &DetectorConfig) -> Vec<AnomalyPattern> {
    let max_gap = Duration::days(config.cluster_gap_days);
    let mut patterns = Vec::new();
    let mut current: Vec<&AnomalyPoint> = Vec::new();

    for anomaly in anomalies {
        if let Some(previous) = current.last() {
            if anomaly.timestamp - previous.timestamp > max_gap {
                patterns.extend(cluster_pattern(&current));
                current.clear();
            }
        }
        current.push(anomaly);
    }
    patterns.extend(cluster_pattern(&current));

    patterns
}

fn cluster_pattern(members: &[&AnomalyPoint]) -> Option<AnomalyPattern> {
    let (first, last) = match members {
        [first, .., last] => (first, last),
        _ => return None,
    };

    Some(AnomalyPattern {
        pattern_type: PatternType::Clustering,
        description: format!(
            "{} anomalies clustered between {} and {}",
            members.len(),
            first.timestamp.format("%Y-%m-%d"),
            last.timestamp.format("%Y-%m-%d")
        ),
        frequency: members.len() as f64,
        indices: members.iter().map(|a| a.index).collect(),
    })
}

/// Detect evenly spaced anomalies: at least two gaps with a gap CV below the threshold
pub fn find_periodicity(
    anomalies: &[AnomalyPoint],
    config: &DetectorConfig,
) -> Option<AnomalyPattern> {
    if anomalies.len() < 3 {
        return None;
    }

    let gaps: Vec<f64> = anomalies
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp).num_seconds() as f64 / SECONDS_PER_DAY)
        .collect();
    let mean_gap = mean(&gaps).ok()?;
    if mean_gap <= 0.0 {
        return None;
    }
    let cv = coefficient_of_variation(&gaps).ok()?;
    if cv >= config.periodic_cv_threshold {
        return None;
    }

    Some(AnomalyPattern {
        pattern_type: PatternType::Periodic,
        description: format!("Anomalies recur roughly every {:.1} days", mean_gap),
        frequency: mean_gap,
        indices: anomalies.iter().map(|a| a.index).collect(),
    })
}

/// All patterns, clusters first
pub fn find_patterns(anomalies: &[AnomalyPoint], config: &DetectorConfig) -> Vec<AnomalyPattern> {
    let mut patterns = find_clusters(anomalies, config);
    patterns.extend(find_periodicity(anomalies, config));
    patterns
}

pub fn recommendations(
    anomalies: &[AnomalyPoint],
    patterns: &[AnomalyPattern],
    sensitivity: AnomalySensitivity,
    config: &DetectorConfig,
) -> Vec<String> {
    if anomalies.is_empty() {
        return vec![format!(
            "No anomalies detected at {} sensitivity; continue routine monitoring",
            sensitivity.as_str().to_lowercase()
        )];
    }

    let mut recommendations = Vec::new();
    if anomalies.len() > config.review_threshold {
        recommendations.push(format!(
            "High anomaly volume ({} points); review data quality and collection processes",
            anomalies.len()
        ));
    }

    let critical = anomalies
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .count();
    if critical > 0 {
        recommendations.push(format!(
            "{} critical anomalies were confirmed by most detectors; investigate these first",
            critical
        ));
    }

    for pattern in patterns {
        match pattern.pattern_type {
            PatternType::Clustering => recommendations.push(format!(
                "{}; check for a sustained event or process change in that window",
                pattern.description
            )),
            PatternType::Periodic => recommendations.push(format!(
                "Anomalies repeat about every {:.0} days; consider modelling this cycle explicitly",
                pattern.frequency
            )),
        }
    }

    recommendations.extend(DOMAIN_SUGGESTIONS.iter().map(|s| s.to_string()));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn anomaly_on_day(day: i64) -> AnomalyPoint {
        AnomalyPoint {
            index: day as usize,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(day),
            value: 500.0,
            expected: 100.0,
            severity: Severity::High,
            methods: Vec::new(),
            explanation: String::new(),
        }
    }

    #[test]
    fn test_clusters_split_on_large_gaps() {
        let anomalies: Vec<AnomalyPoint> = [0, 3, 9, 40, 60, 62].into_iter().map(anomaly_on_day).collect();
        let clusters = find_clusters(&anomalies, &DetectorConfig::default());

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].indices, vec![0, 3, 9]);
        assert_eq!(clusters[0].frequency, 3.0);
        assert_eq!(clusters[1].indices, vec![60, 62]);
    }

    #[test]
    fn test_periodicity_requires_regular_gaps() {
        let config = DetectorConfig::default();
        let regular: Vec<AnomalyPoint> = [0, 30, 60, 90].into_iter().map(anomaly_on_day).collect();
        let pattern = find_periodicity(&regular, &config).unwrap();
        assert_eq!(pattern.pattern_type, PatternType::Periodic);
        assert!((pattern.frequency - 30.0).abs() < 1e-9);

        let irregular: Vec<AnomalyPoint> = [0, 2, 60, 61].into_iter().map(anomaly_on_day).collect();
        assert!(find_periodicity(&irregular, &config).is_none());

        assert!(find_periodicity(&regular[..2], &config).is_none());
    }

    #[test]
    fn test_quiet_series_gets_single_note() {
        let recs = recommendations(&[], &[], AnomalySensitivity::Medium, &DetectorConfig::default());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("No anomalies detected"));
    }

    #[test]
    fn test_volume_and_critical_callouts() {
        let mut anomalies: Vec<AnomalyPoint> = (0..12).map(|d| anomaly_on_day(d * 20)).collect();
        anomalies[0].severity = Severity::Critical;

        let recs = recommendations(&anomalies, &[], AnomalySensitivity::High, &DetectorConfig::default());
        assert!(recs[0].starts_with("High anomaly volume (12 points)"));
        assert!(recs[1].starts_with("1 critical anomalies"));
    }
}
