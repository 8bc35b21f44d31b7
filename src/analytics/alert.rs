//! Alert types produced by the spike and trending detectors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Mention;

/// Kind of anomaly an alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Hourly mention volume far above the mean
    Volume,
    /// Hourly negative share far above the overall share
    NegativeSentiment,
    /// Hourly positive share far below the overall share
    SentimentDrop,
    /// A keyword suddenly frequent in the newest mentions
    TrendingTopic,
}

impl AlertType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::NegativeSentiment => "negative_sentiment",
            Self::SentimentDrop => "sentiment_drop",
            Self::TrendingTopic => "trending_topic",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity level of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Critical alerts requiring immediate action
    Critical,
    /// Warning alerts that require attention
    Warning,
    /// Informational alerts for tracking purposes
    Info,
}

impl AlertSeverity {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Sort rank; lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
            Self::Info => 2,
        }
    }

    /// Get emoji representation
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Critical => "🚨",
            Self::Warning => "⚠️",
            Self::Info => "ℹ️",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reported growth of an alerting signal, serialized as `"300%"` or `"new"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Increase {
    /// Rounded percentage increase over the baseline
    Percent(i64),
    /// The signal had no baseline at all
    New,
}

impl fmt::Display for Increase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{p}%"),
            Self::New => write!(f, "new"),
        }
    }
}

impl FromStr for Increase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("new") {
            return Ok(Self::New);
        }
        s.trim_end_matches('%')
            .parse::<i64>()
            .map(Self::Percent)
            .map_err(|_| format!("invalid increase: {s}"))
    }
}

impl From<Increase> for String {
    fn from(increase: Increase) -> Self {
        increase.to_string()
    }
}

impl TryFrom<String> for Increase {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A detected anomaly with the mentions that caused it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,

    pub severity: AlertSeverity,

    /// Human-readable description
    pub message: String,

    /// Start of the offending hour, or the newest mention for trending alerts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Observed value: a count for volume/trending, a whole percentage for sentiment
    pub value: f64,

    /// Baseline the value is compared against, in the same unit
    pub baseline: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increase: Option<Increase>,

    /// Trending keyword
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    /// Occurrences of the trending keyword in the recent window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_count: Option<usize>,

    pub affected_mentions: Vec<Mention>,
}

/// Stable sort by severity: critical, then warning, then info
pub fn sort_by_severity(alerts: &mut [Alert]) {
    alerts.sort_by_key(|alert| alert.severity.rank());
}
