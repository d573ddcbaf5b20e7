use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::collector::MetricsCollector;

/// HTTP server for the scrape endpoint
pub struct MetricsServer {
    collector: Arc<MetricsCollector>,
    addr: String,
}

impl MetricsServer {
    pub fn new(collector: Arc<MetricsCollector>, addr: String) -> Self {
        Self { collector, addr }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Serve `/metrics` and `/health` until the task is dropped
    pub async fn serve(self) -> Result<(), MetricsServerError> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| MetricsServerError::BindError(e.to_string()))?;

        tracing::info!(addr = %self.addr, "metrics server listening");

        axum::serve(listener, router(self.collector))
            .await
            .map_err(|e| MetricsServerError::ServerError(e.to_string()))?;

        Ok(())
    }
}

/// Routes for the scrape endpoint, for embedding in another server
pub fn router(collector: Arc<MetricsCollector>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(collector)
}

async fn metrics_handler(
    State(collector): State<Arc<MetricsCollector>>,
) -> Result<Response, MetricsHandlerError> {
    let metrics = collector
        .export_metrics()
        .map_err(|e| MetricsHandlerError::ExportError(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        metrics,
    )
        .into_response())
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Metrics server error types
#[derive(Debug, thiserror::Error)]
pub enum MetricsServerError {
    #[error("failed to bind to address: {0}")]
    BindError(String),
    #[error("server error: {0}")]
    ServerError(String),
}

#[derive(Debug, thiserror::Error)]
enum MetricsHandlerError {
    #[error("failed to export metrics: {0}")]
    ExportError(String),
}

impl IntoResponse for MetricsHandlerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MetricsHandlerError::ExportError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn test_metrics_server_creation() {
        let server = MetricsServer::new(Arc::new(MetricsCollector::new()), "127.0.0.1:0".to_string());
        assert_eq!(server.addr(), "127.0.0.1:0");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = router(Arc::new(MetricsCollector::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_serves_text() {
        let collector = Arc::new(MetricsCollector::new());
        collector.record_source_failure("source_unavailable");

        let response = router(collector)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("trade_tracker_source_failures_total"));
    }
}
