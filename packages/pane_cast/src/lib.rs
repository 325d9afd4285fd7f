//! HTTP surface and shared state for the pane broadcast server.

pub mod broadcast;
pub mod capture;
pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod protocol;
pub mod sampler;
pub mod store;
pub mod views;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::metrics::ServerMetrics;
use crate::protocol::Update;
use crate::store::FrameStore;

/// Shared handles for request handlers and background tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<FrameStore>,
    pub metrics: Arc<ServerMetrics>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(FrameStore::new()),
            metrics: Arc::new(ServerMetrics::new()),
            shutdown: CancellationToken::new(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/frame", get(frame_handler))
        .route("/stream", get(broadcast::stream_handler))
        .with_state(state)
}

/// GET /: the viewer. Serves the configured file when readable, otherwise
/// the built-in page.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    match tokio::fs::read_to_string(&state.config.viewer_path).await {
        Ok(contents) => Html(contents),
        Err(_) => Html(
            views::viewer_page(state.config.capture.cols, state.config.capture.rows).into_string(),
        ),
    }
}

/// GET /health: liveness plus counters. `starting` until the first frame.
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let status = if state.store.latest().await.is_some() {
        "ok"
    } else {
        "starting"
    };
    Json(json!({
        "status": status,
        "metrics": state.metrics.snapshot(),
    }))
}

/// GET /frame: the current frame as one full update, for one-shot clients.
async fn frame_handler(State(state): State<AppState>) -> Response {
    match state.store.latest().await {
        Some(frame) => Json(Update::full(&frame)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "no frame captured yet" })),
        )
            .into_response(),
    }
}
