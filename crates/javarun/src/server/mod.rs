//! HTTP surface
//!
//! A single endpoint (path configurable, default `/`) that takes Java code
//! in the request body and answers with the program's output, plus a
//! `/health` check.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use axum::routing::{any, get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::runner::Runner;

pub use crate::server::cors::cors_headers;
pub use crate::server::error::{ApiError, ErrorBody, INTERNAL_ERROR_MESSAGE};
pub use crate::server::handler::{RunResponse, extract_code};

mod cors;
mod error;
mod handler;

/// Path of the liveness check
pub const HEALTH_PATH: &str = "/health";

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the router serving the run endpoint
pub fn build_router(runner: Runner) -> Router {
    let path = runner.config().server.path.clone();

    Router::new()
        .route(HEALTH_PATH, get(handler::health_check))
        .route(&path, any(handler::run_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(runner)
}

/// Start the server and listen until the process is interrupted
pub async fn serve(runner: Runner) -> Result<(), ServerError> {
    serve_with_shutdown(runner, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
    })
    .await
}

/// Start the server, shutting down gracefully when `shutdown_signal` resolves
pub async fn serve_with_shutdown<F>(runner: Runner, shutdown_signal: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = runner.config().bind_addr();
    let path = runner.config().server.path.clone();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, %path, "javarun listening");

    axum::serve(listener, build_router(runner))
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(ServerError::Serve)
}
