use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

lazy_static! {
    // ═══════════════════════════════════════════════════════════════════════════
    // TRACK METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Completed `track` calls
    pub static ref TRACK_CALLS: IntCounter = register_int_counter!(
        "trade_tracker_track_calls_total",
        "Total number of completed track calls"
    )
    .unwrap();

    /// Intents classified across all calls
    pub static ref INTENTS_TRACKED: IntCounter = register_int_counter!(
        "trade_tracker_intents_tracked_total",
        "Total number of intents classified"
    )
    .unwrap();

    /// Offers returned by the offer source
    pub static ref OFFERS_FETCHED: IntCounter = register_int_counter!(
        "trade_tracker_offers_fetched_total",
        "Total number of offer snapshots fetched"
    )
    .unwrap();

    /// Latency of one track call in milliseconds
    pub static ref TRACK_DURATION: Histogram = register_histogram!(
        "trade_tracker_track_duration_ms",
        "Track call duration in milliseconds",
        vec![10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENT METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Events emitted, by wire name
    pub static ref EVENTS: IntCounterVec = register_int_counter_vec!(
        "trade_tracker_events_total",
        "Total events emitted by event name",
        &["event"]
    )
    .unwrap();

    /// Emitted events that indicate a problem
    pub static ref ANOMALIES: IntCounter = register_int_counter!(
        "trade_tracker_anomalies_total",
        "Total wrongPartner, wrongItems and compromisedApiKey events"
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // SOURCE METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Failed offer listings, by error kind
    pub static ref SOURCE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "trade_tracker_source_failures_total",
        "Total offer source failures by kind",
        &["kind"]
    )
    .unwrap();
}
