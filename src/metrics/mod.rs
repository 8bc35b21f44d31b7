//! Prometheus metrics for the analytics engines
//!
//! Tracks how often each engine runs, how many mentions it sees, which
//! alerts it raises and which clustering path it took.
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization never happens or fails, recording becomes a no-op, so
//! library users that do not care about metrics pay nothing.

use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec,
    TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all engine metrics
struct EngineMetrics {
    runs: CounterVec,
    mentions_processed: CounterVec,
    alerts: CounterVec,
    cluster_paths: CounterVec,
    duration: HistogramVec,
}

/// Global storage for engine metrics; `None` when registration failed
static ENGINE_METRICS: OnceLock<Option<EngineMetrics>> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Safe to call more than once and from several threads; only the first
/// call registers.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let metrics = ENGINE_METRICS.get_or_init(|| match register_metrics() {
        Ok(metrics) => {
            tracing::debug!("Prometheus metrics registered");
            Some(metrics)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Metrics registration failed, recording disabled");
            None
        }
    });

    if metrics.is_some() {
        Ok(())
    } else {
        Err("metrics registration failed".into())
    }
}

/// Check whether metrics are registered and recording
pub fn metrics_initialized() -> bool {
    engine_metrics().is_some()
}

fn engine_metrics() -> Option<&'static EngineMetrics> {
    ENGINE_METRICS.get().and_then(Option::as_ref)
}

fn register_metrics() -> Result<EngineMetrics, prometheus::Error> {
    Ok(EngineMetrics {
        runs: register_counter_vec!(
            "brandpulse_engine_runs_total",
            "Total engine invocations",
            &["engine"]
        )?,
        mentions_processed: register_counter_vec!(
            "brandpulse_mentions_processed_total",
            "Total mentions handed to an engine",
            &["engine"]
        )?,
        alerts: register_counter_vec!(
            "brandpulse_alerts_total",
            "Alerts raised by type and severity",
            &["type", "severity"]
        )?,
        cluster_paths: register_counter_vec!(
            "brandpulse_cluster_path_total",
            "Clustering runs by path taken (kmeans, small_batch, fallback)",
            &["path"]
        )?,
        duration: register_histogram_vec!(
            "brandpulse_engine_duration_seconds",
            "Engine run duration in seconds",
            &["engine"],
            vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
        )?,
    })
}

// ============================================================================
// Recording
// ============================================================================

/// Record one engine invocation over `mentions` inputs
pub fn record_run(engine: &str, mentions: usize, seconds: f64) {
    if let Some(m) = engine_metrics() {
        m.runs.with_label_values(&[engine]).inc();
        m.mentions_processed
            .with_label_values(&[engine])
            .inc_by(mentions as f64);
        m.duration.with_label_values(&[engine]).observe(seconds);
    }
}

/// Record a raised alert
pub fn record_alert(alert_type: &str, severity: &str) {
    if let Some(m) = engine_metrics() {
        m.alerts.with_label_values(&[alert_type, severity]).inc();
    }
}

/// Record which clustering path produced the result
pub fn record_cluster_path(path: &str) {
    if let Some(m) = engine_metrics() {
        m.cluster_paths.with_label_values(&[path]).inc();
    }
}

// ============================================================================
// Export
// ============================================================================

/// Encode all registered metrics in the Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
