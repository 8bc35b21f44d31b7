//! Configuration management for brandpulse
//!
//! Thresholds for both engines live here. Every default reproduces the
//! behaviour of the production dashboard; the TOML file and the
//! `BRANDPULSE_*` environment variables exist for tuning.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spike detection thresholds
    pub spikes: SpikeConfig,

    /// Trending-topic thresholds
    pub trending: TrendingConfig,

    /// Topic clustering parameters
    pub clustering: ClusterConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Spike detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    /// Below this many mentions no analysis is attempted
    pub min_mentions: usize,

    /// Volume threshold is `mean + stddev_multiplier * std_dev`
    pub stddev_multiplier: f64,

    /// A volume spike must also exceed `mean_multiplier * mean`
    pub mean_multiplier: f64,

    /// Minimum rounded percentage increase over the mean
    pub min_increase_percent: i64,

    /// Volume spikes above `critical_multiplier * mean` are critical
    pub critical_multiplier: f64,

    /// Cap on deduplicated mentions attached to a volume alert
    pub max_affected_mentions: usize,

    /// Characters of lower-cased text used as the dedup signature
    pub dedup_prefix_chars: usize,

    /// Buckets with fewer mentions are skipped by sentiment checks
    pub sentiment_min_bucket: usize,

    /// Negative share must exceed this multiple of the overall share
    pub negative_ratio: f64,

    /// Negative share must also exceed this absolute floor
    pub negative_floor: f64,

    /// Negative share above this is critical
    pub negative_critical: f64,

    /// Sentiment-drop checks only run when overall positive share exceeds this
    pub positive_baseline_floor: f64,

    /// Bucket positive share below `positive_drop_ratio * overall` is a drop
    pub positive_drop_ratio: f64,

    /// Minimum bucket size for a sentiment-drop alert
    pub drop_min_bucket: usize,

    /// Append trending-topic alerts to the report
    pub include_trending: bool,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            min_mentions: 10,
            stddev_multiplier: 2.5,
            mean_multiplier: 2.0,
            min_increase_percent: 100,
            critical_multiplier: 4.0,
            max_affected_mentions: 10,
            dedup_prefix_chars: 100,
            sentiment_min_bucket: 3,
            negative_ratio: 2.0,
            negative_floor: 0.5,
            negative_critical: 0.7,
            positive_baseline_floor: 0.4,
            positive_drop_ratio: 0.5,
            drop_min_bucket: 5,
            include_trending: false,
        }
    }
}

/// Trending-topic thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    /// Minimum unique mentions required
    pub min_unique_mentions: usize,

    /// Share of the newest mentions that form the "recent" window
    pub recent_fraction: f64,

    /// Minimum occurrences of a token in the recent window
    pub min_keyword_count: usize,

    /// Recent frequency must exceed this multiple of the older frequency
    pub growth_factor: f64,

    /// Recent frequency must exceed this absolute floor
    pub min_recent_frequency: f64,

    /// Reported increase is capped at this percentage
    pub max_increase_percent: f64,

    /// Number of trending keywords reported
    pub max_topics: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            min_unique_mentions: 20,
            recent_fraction: 0.3,
            min_keyword_count: 5,
            growth_factor: 5.0,
            min_recent_frequency: 0.15,
            max_increase_percent: 500.0,
            max_topics: 3,
        }
    }
}

/// Topic clustering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Batches smaller than this become a single cluster
    pub min_mentions: usize,

    /// One cluster per this many mentions, before clamping
    pub mentions_per_cluster: usize,

    /// Lower bound on k
    pub min_clusters: usize,

    /// Upper bound on k
    pub max_clusters: usize,

    /// Lloyd iteration cap
    pub max_iterations: usize,

    /// Convergence threshold on centroid movement
    pub tolerance: f64,

    /// Seed for k-means++ initialization
    pub seed: u64,

    /// Keywords attached to each cluster
    pub keyword_count: usize,

    /// Keywords used when disambiguating a repeated label
    pub disambiguation_keywords: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_mentions: 5,
            mentions_per_cluster: 20,
            min_clusters: 2,
            max_clusters: 5,
            max_iterations: 100,
            tolerance: 1e-6,
            seed: 42,
            keyword_count: 5,
            disambiguation_keywords: 2,
        }
    }
}

impl ClusterConfig {
    /// Number of clusters for a batch of `n` mentions
    #[must_use]
    pub fn cluster_count(&self, n: usize) -> usize {
        (n / self.mentions_per_cluster.max(1))
            .min(self.max_clusters)
            .max(self.min_clusters)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, starting from defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `BRANDPULSE_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_parse("BRANDPULSE_MIN_MENTIONS")? {
            self.spikes.min_mentions = v;
        }
        if let Some(v) = env_parse("BRANDPULSE_STDDEV_MULTIPLIER")? {
            self.spikes.stddev_multiplier = v;
        }
        if let Some(v) = env_parse("BRANDPULSE_INCLUDE_TRENDING")? {
            self.spikes.include_trending = v;
        }
        if let Some(v) = env_parse("BRANDPULSE_CLUSTER_SEED")? {
            self.clustering.seed = v;
        }
        if let Some(v) = env_parse("BRANDPULSE_MAX_CLUSTERS")? {
            self.clustering.max_clusters = v;
        }
        if let Ok(level) = std::env::var("BRANDPULSE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BRANDPULSE_LOG_FORMAT") {
            self.logging.format = format;
        }
        Ok(())
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(format!("Failed to read config file: {}", path.display()), e)
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// File (or defaults), then environment overrides, then validation
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.spikes.stddev_multiplier < 0.0 || self.spikes.mean_multiplier < 0.0 {
            anyhow::bail!("spike multipliers must not be negative");
        }

        if self.spikes.dedup_prefix_chars == 0 {
            anyhow::bail!("dedup_prefix_chars must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.trending.recent_fraction) {
            anyhow::bail!("recent_fraction must be within [0, 1]");
        }

        if self.clustering.mentions_per_cluster == 0 {
            anyhow::bail!("mentions_per_cluster must be greater than 0");
        }

        if self.clustering.min_clusters == 0
            || self.clustering.min_clusters > self.clustering.max_clusters
        {
            anyhow::bail!(
                "cluster bounds must satisfy 0 < min_clusters <= max_clusters (got {}..={})",
                self.clustering.min_clusters,
                self.clustering.max_clusters
            );
        }

        if self.clustering.min_mentions < self.clustering.min_clusters {
            // k-means needs at least one mention per centroid
            anyhow::bail!("clustering.min_mentions must be at least clustering.min_clusters");
        }

        if self.clustering.max_iterations == 0 {
            anyhow::bail!("max_iterations must be greater than 0");
        }

        Ok(())
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {key}: {raw}")),
        Err(_) => Ok(None),
    }
}
