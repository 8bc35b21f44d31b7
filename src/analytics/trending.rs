//! Trending keyword detection
//!
//! Splits a deduplicated batch into the newest mentions and the rest, then
//! flags tokens that are far more frequent in the newest slice.

use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

use super::alert::{Alert, AlertSeverity, AlertType, Increase};
use super::spikes::deduplicate_mentions;
use crate::config::TrendingConfig;
use crate::models::Mention;
use crate::text::word_frequency;

/// Default number of characters used for the dedup signature
const DEFAULT_PREFIX_CHARS: usize = 100;

/// A keyword that qualified as trending, before it becomes an alert
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingKeyword {
    pub keyword: String,
    pub recent_count: usize,
    pub older_count: usize,
    pub increase: Increase,
}

/// Trending keyword detector
#[derive(Debug, Clone)]
pub struct TrendingDetector {
    config: TrendingConfig,
    prefix_chars: usize,
}

impl Default for TrendingDetector {
    fn default() -> Self {
        Self::new(TrendingConfig::default(), DEFAULT_PREFIX_CHARS)
    }
}

impl TrendingDetector {
    #[must_use]
    pub fn new(config: TrendingConfig, prefix_chars: usize) -> Self {
        Self {
            config,
            prefix_chars,
        }
    }

    /// Detect trending keywords and turn them into `info` alerts
    pub fn detect(&self, mentions: &[Mention]) -> Vec<Alert> {
        if mentions.len() < self.config.min_unique_mentions {
            return Vec::new();
        }

        let mut unique = deduplicate_mentions(mentions, self.prefix_chars);
        if unique.len() < self.config.min_unique_mentions {
            debug!(
                unique = unique.len(),
                required = self.config.min_unique_mentions,
                "Too few unique mentions for trending detection"
            );
            return Vec::new();
        }

        // Newest first, undated last
        unique.sort_by_key(|m| Reverse(m.timestamp.map(|ts| ts.timestamp_millis())));

        let split = (unique.len() as f64 * self.config.recent_fraction).floor() as usize;
        let (recent, older) = unique.split_at(split);
        if recent.is_empty() {
            return Vec::new();
        }

        let recent_freq = word_frequency(recent.iter().map(|m| m.text.as_str()));
        let older_freq = word_frequency(older.iter().map(|m| m.text.as_str()));

        let newest = recent.first().and_then(|m| m.timestamp);
        self.trending_keywords(&recent_freq, &older_freq, recent.len(), older.len())
            .into_iter()
            .map(|trend| {
                let affected: Vec<Mention> = recent
                    .iter()
                    .filter(|m| m.text.to_lowercase().contains(&trend.keyword))
                    .cloned()
                    .collect();
                let detail = match trend.increase {
                    Increase::New => "new topic".to_string(),
                    Increase::Percent(p) => format!("{p}% increase"),
                };

                Alert {
                    alert_type: AlertType::TrendingTopic,
                    severity: AlertSeverity::Info,
                    message: format!(
                        "\"{}\" is trending ({} unique mentions, {detail})",
                        trend.keyword, trend.recent_count
                    ),
                    timestamp: newest,
                    value: trend.recent_count as f64,
                    baseline: trend.older_count as f64,
                    increase: Some(trend.increase),
                    keyword: Some(trend.keyword),
                    recent_count: Some(trend.recent_count),
                    affected_mentions: affected,
                }
            })
            .collect()
    }

    /// Score keywords from precomputed frequencies
    ///
    /// Returns at most `max_topics` entries, highest recent count first with
    /// ties broken alphabetically.
    pub fn trending_keywords(
        &self,
        recent: &HashMap<String, usize>,
        older: &HashMap<String, usize>,
        recent_len: usize,
        older_len: usize,
    ) -> Vec<TrendingKeyword> {
        if recent_len == 0 {
            return Vec::new();
        }

        let floor = self.config.min_recent_frequency;
        let mut trending: Vec<TrendingKeyword> = recent
            .iter()
            .filter_map(|(keyword, &recent_count)| {
                let older_count = older.get(keyword).copied().unwrap_or(0);
                let recent_freq = recent_count as f64 / recent_len as f64;
                let older_freq = older_count as f64 / older_len.max(1) as f64;

                if recent_count < self.config.min_keyword_count
                    || recent_freq <= (older_freq * self.config.growth_factor).max(floor)
                    || recent_freq <= floor
                {
                    return None;
                }

                let increase = if older_freq == 0.0 {
                    Increase::New
                } else {
                    let pct = ((recent_freq / older_freq - 1.0) * 100.0)
                        .min(self.config.max_increase_percent);
                    Increase::Percent(pct.round() as i64)
                };

                Some(TrendingKeyword {
                    keyword: keyword.clone(),
                    recent_count,
                    older_count,
                    increase,
                })
            })
            .collect();

        trending.sort_by(|a, b| {
            b.recent_count
                .cmp(&a.recent_count)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        trending.truncate(self.config.max_topics);
        trending
    }
}

/// Detect trending keywords with default thresholds
pub fn detect_trending_topics(mentions: &[Mention]) -> Vec<Alert> {
    TrendingDetector::default().detect(mentions)
}
