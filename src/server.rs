//! HTTP endpoint exposing the device gauges for Prometheus to scrape.

use std::future::Future;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::TEXT_FORMAT;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::metrics::MetricsRegistry;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("couldn't listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error while serving metrics: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Clone)]
pub struct MetricsServer {
    registry: MetricsRegistry,
}

impl MetricsServer {
    pub fn new(registry: MetricsRegistry) -> Self {
        Self { registry }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(self.registry.clone())
    }

    pub async fn bind(address: &str) -> Result<TcpListener, ServerError> {
        TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })
    }

    /// Serves until `shutdown` resolves, then drains open connections.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!("serving metrics on http://{addr}/metrics");
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)
    }
}

async fn metrics_handler(State(registry): State<MetricsRegistry>) -> Response {
    match registry.render() {
        Ok(body) => {
            debug!(bytes = body.len(), "serving metrics");
            (StatusCode::OK, [(CONTENT_TYPE, TEXT_FORMAT)], body).into_response()
        }
        Err(e) => {
            error!("failed to encode metrics: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to encode metrics: {e}"),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
