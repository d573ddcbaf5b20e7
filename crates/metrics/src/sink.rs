use trade_tracker_engine::EventSink;
use trade_tracker_types::TrackEvent;

use crate::collector::MetricsCollector;

/// Event sink that only counts; combine with other sinks through a
/// `FanoutSink`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSink {
    collector: MetricsCollector,
}

impl MetricsSink {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }
}

impl EventSink for MetricsSink {
    fn publish(&self, event: &TrackEvent) {
        self.collector.record_event(event);
    }
}
