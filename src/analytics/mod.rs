//! Spike and trend analysis over mention batches

pub mod alert;
pub mod spikes;
pub mod stats;
pub mod trending;

pub use alert::{sort_by_severity, Alert, AlertSeverity, AlertType, Increase};
pub use spikes::{
    deduplicate_mentions, detect_spikes, group_by_hour, HourBucket, SpikeDetector, SpikeReport,
    VolumeSpike,
};
pub use stats::{stats, SeriesStats};
pub use trending::{detect_trending_topics, TrendingDetector, TrendingKeyword};
