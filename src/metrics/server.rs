//! HTTP endpoint for generator metrics and seed health.
//!
//! `/metrics` serves the Prometheus text encoding. `/health` answers 200
//! while the generator is idle or strongly seeded and 503 while it runs on
//! weak time-based seeds.

use crate::metrics::{MetricsRegistry, SeedHealth};
use axum::{extract::State, http::header, http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while serving metrics.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Serves a shared [`MetricsRegistry`] over HTTP.
///
/// The registry is updated in place by the generating thread; its metrics
/// are atomics, so the handlers read them without a lock.
pub struct MetricsServer {
    bind_addr: SocketAddr,
    registry: Arc<MetricsRegistry>,
}

impl MetricsServer {
    /// Creates a server bound to `bind_addr` once run.
    pub fn new(bind_addr: SocketAddr, registry: Arc<MetricsRegistry>) -> Self {
        Self {
            bind_addr,
            registry,
        }
    }

    /// Creates a server on the loopback interface.
    pub fn loopback(port: u16, registry: Arc<MetricsRegistry>) -> Self {
        Self::new(([127, 0, 0, 1], port).into(), registry)
    }

    /// Returns the address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Runs the HTTP server until it is shut down.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = Router::new()
            .route("/metrics", get(metrics))
            .route("/health", get(health))
            .with_state(self.registry);

        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "Metrics server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))
    }
}

type TextResponse = (StatusCode, [(header::HeaderName, &'static str); 1], String);

async fn metrics(State(registry): State<Arc<MetricsRegistry>>) -> TextResponse {
    match registry.encode() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
    }
}

async fn health(State(registry): State<Arc<MetricsRegistry>>) -> (StatusCode, String) {
    let health = registry.health();
    let status = match health {
        SeedHealth::Idle | SeedHealth::Seeded => StatusCode::OK,
        SeedHealth::Degraded { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, health.to_string())
}
