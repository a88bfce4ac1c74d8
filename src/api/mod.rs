//! HTTP Surface
//!
//! Serves the rendered guestbook page and a small operational surface,
//! built with Axum.
//!
//! # Endpoints
//!
//! - `GET /` - the rendered page (HTML)
//! - `GET /health/live` - liveness probe
//! - `GET /health/ready` - readiness probe (503 until the first cycle commits)
//! - `GET /api/v1/status` - JSON refresh status
//!
//! Handlers only read the shared [`PageView`]; all writes happen in the
//! refresh task.

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::view::{PageView, RefreshStatus};

/// Server lifecycle errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Internal(String),
}

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Rendered page view, written by the refresh task
    pub view: Arc<PageView>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(view: Arc<PageView>) -> Self {
        Self {
            view,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// GET /
///
/// The rendered guestbook page.
async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.view.page().await)
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the first load cycle has committed (any terminal
/// state, including the error state, counts as ready to serve).
async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.view.has_rendered().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Status response body: refresh state plus server uptime
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub refresh: RefreshStatus,
    pub uptime_seconds: u64,
}

/// GET /api/v1/status
async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        refresh: state.view.status().await,
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(page))
        .route("/api/v1/status", get(status))
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the page server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Guestbook listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Guestbook shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
