//! brandpulse - Brand mention analytics
//!
//! Detects unusual activity in a batch of brand mentions and groups the
//! batch into labelled discussion topics.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`analytics`] - Hourly spike detection and trending keywords
//! - [`topics`] - TF-IDF vectorization, k-means clustering and labelling
//! - [`text`] - Tokenization, stop words and word frequency
//! - [`models`] - Mentions, sentiment and batch parsing
//! - [`config`] - Thresholds and settings
//! - [`metrics`] - Prometheus counters for engine runs
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```
//! use brandpulse::prelude::*;
//!
//! let mentions = parse_batch(r#"[
//!     {"id": "1", "text": "Battery dies fast", "sentiment": "negative"},
//!     {"id": "2", "text": "Great display", "sentiment": "positive"}
//! ]"#)?;
//!
//! let report = SpikeDetector::default().detect(&mentions);
//! assert!(!report.has_spikes);
//!
//! let clusters = TopicClusterer::default().cluster(&mentions);
//! assert_eq!(clusters.len(), 1);
//! # Ok::<(), brandpulse::Error>(())
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod text;
pub mod topics;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        detect_spikes, detect_trending_topics, Alert, AlertSeverity, AlertType, SpikeDetector,
        SpikeReport,
    };
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{parse_batch, read_batch, Mention, Sentiment, SentimentBreakdown};
    pub use crate::topics::{cluster_topics, fallback_clusters, Cluster, TopicClusterer};
}

// Direct re-exports for convenience
pub use error::{Error, Result};
pub use models::{Mention, Sentiment};
