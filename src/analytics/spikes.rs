//! Hourly spike detection over a batch of mentions
//!
//! This module provides functionality for:
//! - Grouping mentions into calendar-hour buckets (UTC)
//! - Detecting volume spikes against the mean/standard deviation of buckets
//! - Detecting negative-sentiment surges and positive-sentiment drops
//! - Deduplicating near-identical mentions attached to an alert

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use tracing::{debug, info};

use super::alert::{sort_by_severity, Alert, AlertSeverity, AlertType, Increase};
use super::stats::{stats, SeriesStats};
use super::trending::TrendingDetector;
use crate::config::{Config, SpikeConfig, TrendingConfig};
use crate::metrics;
use crate::models::{Mention, Sentiment, SentimentBreakdown};

/// Summary used when the batch is too small to analyse
pub const NOT_ENOUGH_DATA: &str =
    "Not enough data for spike detection (minimum 10 mentions required)";

/// Summary used when no alert fired
pub const NO_ACTIVITY: &str = "No unusual activity detected";

/// Mentions sharing one calendar hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    /// Calendar hour, e.g. `2024-03-01T20`
    pub key: String,

    /// Start of the hour (UTC)
    pub hour: DateTime<Utc>,

    pub count: usize,

    /// Per-sentiment counts
    #[serde(flatten)]
    pub sentiment: SentimentBreakdown,

    pub mentions: Vec<Mention>,
}

impl HourBucket {
    fn new(hour: DateTime<Utc>) -> Self {
        Self {
            key: hour.format("%Y-%m-%dT%H").to_string(),
            hour,
            count: 0,
            sentiment: SentimentBreakdown::default(),
            mentions: Vec::new(),
        }
    }

    fn push(&mut self, mention: &Mention) {
        self.count += 1;
        self.sentiment.record(mention.sentiment);
        self.mentions.push(mention.clone());
    }
}

/// Result of a spike detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpikeReport {
    pub has_spikes: bool,

    /// Alerts ordered critical, warning, info
    pub alerts: Vec<Alert>,

    pub summary: String,

    /// Hour buckets, ascending; `None` when the batch was too small
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_data: Option<Vec<HourBucket>>,
}

impl SpikeReport {
    fn not_enough_data() -> Self {
        Self {
            has_spikes: false,
            alerts: Vec::new(),
            summary: NOT_ENOUGH_DATA.to_string(),
            hourly_data: None,
        }
    }

    /// Hour buckets, empty when none were built
    #[must_use]
    pub fn hours(&self) -> &[HourBucket] {
        self.hourly_data.as_deref().unwrap_or(&[])
    }

    /// Number of alerts with the given severity
    #[must_use]
    pub fn count_severity(&self, severity: AlertSeverity) -> usize {
        count_with(&self.alerts, severity)
    }
}

/// Outcome of checking one bucket count against the volume thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSpike {
    pub severity: AlertSeverity,

    /// Rounded percentage above the mean
    pub increase_percent: i64,
}

/// Spike detector with configurable thresholds
#[derive(Debug, Clone, Default)]
pub struct SpikeDetector {
    config: SpikeConfig,
    trending: TrendingDetector,
}

impl SpikeDetector {
    /// Create a detector from spike and trending thresholds
    #[must_use]
    pub fn new(config: SpikeConfig, trending: TrendingConfig) -> Self {
        let trending = TrendingDetector::new(trending, config.dedup_prefix_chars);
        Self { config, trending }
    }

    /// Create a detector from the full application config
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.spikes.clone(), config.trending.clone())
    }

    /// Run spike detection over a batch of mentions
    pub fn detect(&self, mentions: &[Mention]) -> SpikeReport {
        let started = Instant::now();
        let report = self.detect_inner(mentions);

        metrics::record_run("spikes", mentions.len(), started.elapsed().as_secs_f64());
        for alert in &report.alerts {
            metrics::record_alert(alert.alert_type.as_str(), alert.severity.as_str());
            debug!(
                kind = %alert.alert_type,
                severity = %alert.severity,
                "{} {}",
                alert.severity.emoji(),
                alert.message
            );
        }

        report
    }

    fn detect_inner(&self, mentions: &[Mention]) -> SpikeReport {
        if mentions.len() < self.config.min_mentions {
            debug!(
                mentions = mentions.len(),
                required = self.config.min_mentions,
                "Skipping spike detection"
            );
            return SpikeReport::not_enough_data();
        }

        let hourly = group_by_hour(mentions);
        debug!(
            mentions = mentions.len(),
            buckets = hourly.len(),
            undated = mentions.iter().filter(|m| m.timestamp.is_none()).count(),
            "Grouped mentions by hour"
        );

        let mut alerts = self.volume_spikes(&hourly);
        alerts.extend(self.sentiment_spikes(&hourly, mentions));
        if self.config.include_trending {
            alerts.extend(self.trending.detect(mentions));
        }
        sort_by_severity(&mut alerts);

        let critical = count_with(&alerts, AlertSeverity::Critical);
        let warning = count_with(&alerts, AlertSeverity::Warning);

        let summary = if alerts.is_empty() {
            NO_ACTIVITY.to_string()
        } else {
            format!("Found {critical} critical and {warning} warning alerts")
        };

        info!(
            alerts = alerts.len(),
            critical = critical,
            warning = warning,
            "Spike detection complete"
        );

        SpikeReport {
            has_spikes: !alerts.is_empty(),
            alerts,
            summary,
            hourly_data: Some(hourly),
        }
    }

    /// Check a single bucket count against the volume thresholds
    ///
    /// A spike must exceed `mean + k * std_dev`, exceed a multiple of the
    /// mean, and be at least `min_increase_percent` above the mean after
    /// rounding. It is critical only when strictly above
    /// `critical_multiplier * mean`.
    #[must_use]
    pub fn classify_volume(&self, count: usize, series: &SeriesStats) -> Option<VolumeSpike> {
        let count = count as f64;
        let mean = series.mean;
        if mean <= 0.0 {
            return None;
        }

        let threshold = mean + self.config.stddev_multiplier * series.std_dev;
        if count <= threshold || count <= mean * self.config.mean_multiplier {
            return None;
        }

        let increase_percent = ((count - mean) / mean * 100.0).round() as i64;
        if increase_percent < self.config.min_increase_percent {
            return None;
        }

        let severity = if count > mean * self.config.critical_multiplier {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };

        Some(VolumeSpike {
            severity,
            increase_percent,
        })
    }

    /// Volume alerts; needs at least three buckets
    pub fn volume_spikes(&self, hourly: &[HourBucket]) -> Vec<Alert> {
        if hourly.len() < 3 {
            return Vec::new();
        }

        let counts: Vec<f64> = hourly.iter().map(|h| h.count as f64).collect();
        let Some(series) = stats(&counts) else {
            return Vec::new();
        };
        let baseline = series.mean.round();

        hourly
            .iter()
            .filter_map(|bucket| {
                let spike = self.classify_volume(bucket.count, &series)?;
                let mut affected =
                    deduplicate_mentions(&bucket.mentions, self.config.dedup_prefix_chars);
                affected.truncate(self.config.max_affected_mentions);

                debug!(
                    hour = %bucket.hour,
                    count = bucket.count,
                    mean = series.mean,
                    std_dev = series.std_dev,
                    "Volume spike"
                );

                Some(Alert {
                    alert_type: AlertType::Volume,
                    severity: spike.severity,
                    message: format!(
                        "{}% spike in mentions ({} vs avg {})",
                        spike.increase_percent, bucket.count, baseline
                    ),
                    timestamp: Some(bucket.hour),
                    value: bucket.count as f64,
                    baseline,
                    increase: Some(Increase::Percent(spike.increase_percent)),
                    keyword: None,
                    recent_count: None,
                    affected_mentions: affected,
                })
            })
            .collect()
    }

    /// Sentiment alerts; needs at least two buckets
    ///
    /// Overall shares are computed over every mention in the batch,
    /// including mentions without a timestamp.
    pub fn sentiment_spikes(&self, hourly: &[HourBucket], mentions: &[Mention]) -> Vec<Alert> {
        if hourly.len() < 2 || mentions.is_empty() {
            return Vec::new();
        }

        let overall = SentimentBreakdown::from_mentions(mentions);
        let overall_negative = overall.fraction(Sentiment::Negative);
        let overall_positive = overall.fraction(Sentiment::Positive);

        let mut alerts = Vec::new();
        for bucket in hourly {
            if bucket.count < self.config.sentiment_min_bucket {
                continue;
            }

            let negative = bucket.sentiment.fraction(Sentiment::Negative);
            let positive = bucket.sentiment.fraction(Sentiment::Positive);

            if negative > overall_negative * self.config.negative_ratio
                && negative > self.config.negative_floor
            {
                let severity = if negative > self.config.negative_critical {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Warning
                };
                let pct = percent(negative);

                alerts.push(Alert {
                    alert_type: AlertType::NegativeSentiment,
                    severity,
                    message: format!(
                        "High negative sentiment: {pct}% negative ({}/{} mentions)",
                        bucket.sentiment.negative, bucket.count
                    ),
                    timestamp: Some(bucket.hour),
                    value: pct as f64,
                    baseline: percent(overall_negative) as f64,
                    increase: None,
                    keyword: None,
                    recent_count: None,
                    affected_mentions: bucket
                        .mentions
                        .iter()
                        .filter(|m| m.sentiment == Sentiment::Negative)
                        .cloned()
                        .collect(),
                });
            }

            if overall_positive > self.config.positive_baseline_floor
                && positive < overall_positive * self.config.positive_drop_ratio
                && bucket.count >= self.config.drop_min_bucket
            {
                let pct = percent(positive);
                let base = percent(overall_positive);

                alerts.push(Alert {
                    alert_type: AlertType::SentimentDrop,
                    severity: AlertSeverity::Warning,
                    message: format!("Positive sentiment dropped to {pct}% (normally {base}%)"),
                    timestamp: Some(bucket.hour),
                    value: pct as f64,
                    baseline: base as f64,
                    increase: None,
                    keyword: None,
                    recent_count: None,
                    affected_mentions: bucket.mentions.clone(),
                });
            }
        }

        alerts
    }
}

/// Run spike detection with default thresholds
pub fn detect_spikes(mentions: &[Mention]) -> SpikeReport {
    SpikeDetector::default().detect(mentions)
}

/// Group mentions into UTC calendar-hour buckets, ascending
///
/// Mentions without a timestamp are left out.
pub fn group_by_hour(mentions: &[Mention]) -> Vec<HourBucket> {
    let mut buckets: BTreeMap<DateTime<Utc>, HourBucket> = BTreeMap::new();

    for mention in mentions {
        let Some(hour) = mention.timestamp.and_then(hour_start) else {
            continue;
        };
        buckets
            .entry(hour)
            .or_insert_with(|| HourBucket::new(hour))
            .push(mention);
    }

    buckets.into_values().collect()
}

/// Keep the first mention of each text signature, preserving order
pub fn deduplicate_mentions(mentions: &[Mention], prefix_chars: usize) -> Vec<Mention> {
    let mut seen = HashSet::new();
    mentions
        .iter()
        .filter(|mention| seen.insert(mention.signature(prefix_chars)))
        .cloned()
        .collect()
}

fn count_with(alerts: &[Alert], severity: AlertSeverity) -> usize {
    alerts.iter().filter(|alert| alert.severity == severity).count()
}

fn hour_start(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    ts.with_minute(0)?.with_second(0)?.with_nanosecond(0)
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}
