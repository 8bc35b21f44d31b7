//! Topic clustering of mention batches
//!
//! Mentions are vectorized with TF-IDF, grouped with seeded k-means and
//! labelled from a fixed table of topic patterns. Clustering never fails:
//! any [`ClusterError`] falls back to grouping by sentiment.
//!
//! # Example
//!
//! ```
//! use brandpulse::models::{Mention, Sentiment};
//! use brandpulse::topics::cluster_topics;
//!
//! let mentions = vec![
//!     Mention::new("1", "Battery dies by noon", Sentiment::Negative, "reddit", None),
//!     Mention::new("2", "Love the new strap", Sentiment::Positive, "reddit", None),
//! ];
//! let clusters = cluster_topics(&mentions);
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].label, "📊 All Mentions");
//! ```

pub mod keywords;
pub mod kmeans;
pub mod labels;
pub mod vectorize;

use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ClusterConfig, Config};
use crate::metrics;
use crate::models::{Mention, Sentiment, SentimentBreakdown};

pub use keywords::extract_keywords;
pub use kmeans::{kmeans, KMeansParams, KMeansResult};
pub use labels::{label_cluster, LabelRegistry, ALL_MENTIONS_LABEL};
pub use vectorize::{tokenize, TfIdfMatrix};

/// Errors raised while vectorizing or clustering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    #[error("no terms found in any mention text")]
    EmptyVocabulary,

    #[error("TF-IDF produced non-finite weights")]
    NonFiniteWeights,

    #[error("cannot form {k} clusters from {points} points")]
    InvalidClusterCount { k: usize, points: usize },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

/// A group of related mentions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub cluster_id: String,
    pub label: String,
    pub count: usize,
    pub mentions: Vec<Mention>,
    pub keywords: Vec<String>,
    pub sentiment_breakdown: SentimentBreakdown,
}

impl Cluster {
    fn new(cluster_id: String, label: String, mentions: Vec<Mention>, keyword_count: usize) -> Self {
        let texts: Vec<&str> = mentions.iter().map(|m| m.text.as_str()).collect();
        let keywords = extract_keywords(&texts, keyword_count);
        let sentiment_breakdown = SentimentBreakdown::from_mentions(&mentions);

        Self {
            cluster_id,
            label,
            count: mentions.len(),
            mentions,
            keywords,
            sentiment_breakdown,
        }
    }
}

/// Clusters mentions into labelled topics
#[derive(Debug, Clone, Default)]
pub struct TopicClusterer {
    config: ClusterConfig,
}

impl TopicClusterer {
    #[must_use]
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.clustering.clone())
    }

    /// Cluster mentions, falling back to sentiment groups on any error
    ///
    /// Output is sorted by cluster size, largest first.
    pub fn cluster(&self, mentions: &[Mention]) -> Vec<Cluster> {
        let started = Instant::now();

        let (path, clusters) = if mentions.len() < self.config.min_mentions {
            ("small_batch", vec![self.single_cluster(mentions)])
        } else {
            match self.try_cluster(mentions) {
                Ok(clusters) => ("kmeans", clusters),
                Err(e) => {
                    warn!(error = %e, mentions = mentions.len(), "Clustering failed, grouping by sentiment");
                    (
                        "fallback",
                        fallback_clusters(mentions, self.config.keyword_count),
                    )
                }
            }
        };

        metrics::record_run("topics", mentions.len(), started.elapsed().as_secs_f64());
        metrics::record_cluster_path(path);
        info!(
            mentions = mentions.len(),
            clusters = clusters.len(),
            path = path,
            "Topic clustering complete"
        );

        clusters
    }

    /// Vectorize, run k-means and label; errors are returned, not recovered
    pub fn try_cluster(&self, mentions: &[Mention]) -> Result<Vec<Cluster>, ClusterError> {
        let texts: Vec<&str> = mentions.iter().map(|m| m.text.as_str()).collect();
        let matrix = TfIdfMatrix::fit(&texts)?;

        let k = self.config.cluster_count(mentions.len());
        debug!(
            mentions = mentions.len(),
            terms = matrix.dimensions(),
            k = k,
            "Vectorized mentions"
        );

        let result = kmeans(
            &matrix.rows,
            &KMeansParams {
                k,
                max_iterations: self.config.max_iterations,
                tolerance: self.config.tolerance,
                seed: self.config.seed,
            },
        )?;

        let mut groups: Vec<Vec<Mention>> = vec![Vec::new(); k];
        for (mention, &cluster) in mentions.iter().zip(&result.assignments) {
            groups[cluster].push(mention.clone());
        }

        let mut registry = LabelRegistry::new();
        let mut clusters: Vec<Cluster> = groups
            .into_iter()
            .enumerate()
            .filter(|(_, group)| !group.is_empty())
            .map(|(index, group)| {
                let cluster_id = index.to_string();
                let base = label_cluster(&group);
                let texts: Vec<&str> = group.iter().map(|m| m.text.as_str()).collect();
                let short = extract_keywords(&texts, self.config.disambiguation_keywords);
                let dominant = SentimentBreakdown::from_mentions(&group).dominant();
                let label = registry.claim(base, &cluster_id, &short, dominant);

                Cluster::new(cluster_id, label, group, self.config.keyword_count)
            })
            .collect();

        clusters.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(clusters)
    }

    fn single_cluster(&self, mentions: &[Mention]) -> Cluster {
        Cluster::new(
            "0".to_string(),
            ALL_MENTIONS_LABEL.to_string(),
            mentions.to_vec(),
            self.config.keyword_count,
        )
    }
}

/// Cluster mentions with default parameters
pub fn cluster_topics(mentions: &[Mention]) -> Vec<Cluster> {
    TopicClusterer::default().cluster(mentions)
}

/// Group mentions by sentiment: positive, negative, neutral
///
/// Ids are fixed per sentiment (`"0"`, `"1"`, `"2"`); empty groups are
/// omitted.
pub fn fallback_clusters(mentions: &[Mention], keyword_count: usize) -> Vec<Cluster> {
    const GROUPS: [(Sentiment, &str); 3] = [
        (Sentiment::Positive, "😊 Positive Reviews"),
        (Sentiment::Negative, "😠 Issues & Complaints"),
        (Sentiment::Neutral, "😐 General Discussion"),
    ];

    GROUPS
        .iter()
        .enumerate()
        .filter_map(|(index, (sentiment, label))| {
            let group: Vec<Mention> = mentions
                .iter()
                .filter(|m| m.sentiment == *sentiment)
                .cloned()
                .collect();
            if group.is_empty() {
                return None;
            }
            Some(Cluster::new(
                index.to_string(),
                (*label).to_string(),
                group,
                keyword_count,
            ))
        })
        .collect()
}
