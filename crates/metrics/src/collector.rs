use std::time::Duration;

use prometheus::{Encoder, TextEncoder};
use trade_tracker_types::TrackEvent;

use crate::metrics::*;

/// Records tracker metrics into the process-wide Prometheus registry
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRACK METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record a completed track call
    pub fn record_track(&self, intents: u64, offers: u64, duration: Duration) {
        TRACK_CALLS.inc();
        INTENTS_TRACKED.inc_by(intents);
        OFFERS_FETCHED.inc_by(offers);
        TRACK_DURATION.observe(duration.as_secs_f64() * 1000.0);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENT METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn record_event(&self, event: &TrackEvent) {
        EVENTS.with_label_values(&[event.name()]).inc();
        if event.is_anomaly() {
            ANOMALIES.inc();
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SOURCE METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record a failed listing; `kind` is the source error kind
    pub fn record_source_failure(&self, kind: &str) {
        SOURCE_FAILURES.with_label_values(&[kind]).inc();
    }

    /// Export all metrics in Prometheus text format
    pub fn export_metrics(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::EncodingError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::EncodingError(e.to_string()))
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics error types
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to encode metrics: {0}")]
    EncodingError(String),
}
