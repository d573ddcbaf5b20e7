use std::time::Duration;
use tracing::{field::Visit, Event, Level, Subscriber};
use tracing_subscriber::{
    fmt,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::collector::MetricsCollector;

/// Initialize the global subscriber: env filter, formatted output and the
/// metrics layer.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing_with_metrics(
    collector: std::sync::Arc<MetricsCollector>,
    level: &str,
    json: bool,
) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},trade_tracker=debug")));

    let json_layer = json.then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .json()
    });
    let text_layer = (!json).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(MetricsLayer::new(*collector))
        .try_init()
        .map_err(|e| TracingError::InitError(e.to_string()))?;

    Ok(())
}

/// Derives metrics from the tracker's log events.
///
/// Error events carrying a `source_*` `error_type` count as source
/// failures. Events carrying `intents`, `offers` and `elapsed_ms` are
/// completed track calls.
pub struct MetricsLayer {
    collector: MetricsCollector,
}

impl MetricsLayer {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }
}

impl<S> Layer<S> for MetricsLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("trade_tracker") {
            return;
        }

        let mut visitor = MetricsVisitor::default();
        event.record(&mut visitor);

        if *metadata.level() == Level::ERROR {
            if let Some(kind) = visitor.error_type.as_deref() {
                if kind.starts_with("source_") {
                    self.collector.record_source_failure(kind);
                }
            }
        }

        if let (Some(intents), Some(offers), Some(elapsed_ms)) =
            (visitor.intents, visitor.offers, visitor.elapsed_ms)
        {
            self.collector
                .record_track(intents, offers, Duration::from_millis(elapsed_ms));
        }
    }
}

#[derive(Default)]
struct MetricsVisitor {
    error_type: Option<String>,
    intents: Option<u64>,
    offers: Option<u64>,
    elapsed_ms: Option<u64>,
}

impl Visit for MetricsVisitor {
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        match field.name() {
            "intents" => self.intents = Some(value),
            "offers" => self.offers = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        if let Ok(value) = u64::try_from(value) {
            self.record_u64(field, value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "error_type" {
            self.error_type = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "error_type" {
            self.error_type = Some(format!("{value:?}").trim_matches('"').to_string());
        }
    }
}

/// Tracing error types
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("failed to initialize tracing: {0}")]
    InitError(String),
}
