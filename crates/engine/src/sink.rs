use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use trade_tracker_types::TrackEvent;

/// Receives classification events.
///
/// Publishing is fire-and-forget: the tracker neither awaits delivery nor
/// retries, so implementations must not block for long.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &TrackEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: &TrackEvent) {
        (**self).publish(event)
    }
}

/// Drops every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn publish(&self, _event: &TrackEvent) {}
}

/// Keeps every published event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TrackEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrackEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(TrackEvent::name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &TrackEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Writes each event as a structured log line.
///
/// Compromise reports log at `error`, other anomalies at `warn`, status
/// changes at `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &TrackEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        let correlation_id = event.correlation_id().unwrap_or("-");

        match event {
            TrackEvent::CompromisedApiKey(_) => error!(
                event = event.name(),
                correlation_id = %correlation_id,
                error_type = "compromised_api_key",
                payload = %payload,
                "trade credential appears compromised"
            ),
            TrackEvent::WrongPartner(_) | TrackEvent::WrongItems(_) => warn!(
                event = event.name(),
                correlation_id = %correlation_id,
                payload = %payload,
                "offer diverges from intent"
            ),
            _ => info!(
                event = event.name(),
                correlation_id = %correlation_id,
                payload = %payload,
                "trade status"
            ),
        }
    }
}

/// Forwards events to a broadcast channel.
///
/// With no live receivers the event is dropped.
#[derive(Clone, Debug)]
pub struct BroadcastSink {
    sender: broadcast::Sender<TrackEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for BroadcastSink {
    fn publish(&self, event: &TrackEvent) {
        let _ = self.sender.send(event.clone());
    }
}

/// Publishes every event to each inner sink, in order
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn publish(&self, event: &TrackEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }
}
