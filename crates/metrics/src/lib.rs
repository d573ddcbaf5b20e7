//! Metrics and logging for the trade offer tracker
//!
//! - Prometheus counters for track calls, fetched offers, emitted events and
//!   source failures, plus a track latency histogram
//! - `MetricsSink`, an event sink that counts events by name
//! - `MetricsLayer`, a tracing layer that derives metrics from the tracker's
//!   own log events
//! - An HTTP endpoint for scraping
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use trade_tracker_metrics::{init_tracing_with_metrics, MetricsCollector, MetricsServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let collector = Arc::new(MetricsCollector::new());
//!     init_tracing_with_metrics(collector.clone(), "info", true).unwrap();
//!
//!     let server = MetricsServer::new(collector, "0.0.0.0:9090".to_string());
//!     server.serve().await.unwrap();
//! }
//! ```

pub mod collector;
pub mod http;
pub mod metrics;
pub mod sink;
pub mod tracing;

pub use collector::{MetricsCollector, MetricsError};
pub use http::{router, MetricsServer, MetricsServerError};
pub use sink::MetricsSink;
pub use tracing::{init_tracing_with_metrics, MetricsLayer, TracingError};
