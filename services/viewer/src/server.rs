//! HTTP status API for the viewer.
//!
//! Read-only view over the coordinator's published snapshots:
//! - Current playback state and the radar image URL for the selected frame
//! - The full frame timeline
//! - Health check

use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::coordinator::{StatusSnapshot, ViewerCommand};

#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    pub time: String,
}

/// Create the status API router.
pub fn create_router(
    status_rx: watch::Receiver<StatusSnapshot>,
    command_tx: mpsc::Sender<ViewerCommand>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/status", get(status_handler))
        .route("/timeline", get(timeline_handler))
        .route("/select", get(select_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(Extension(status_rx))
        .layer(Extension(command_tx))
}

/// GET /status - Current playback state.
async fn status_handler(
    Extension(rx): Extension<watch::Receiver<StatusSnapshot>>,
) -> impl IntoResponse {
    Json(rx.borrow().clone())
}

/// GET /timeline - The full current frame sequence.
async fn timeline_handler(
    Extension(rx): Extension<watch::Receiver<StatusSnapshot>>,
) -> impl IntoResponse {
    let snapshot = rx.borrow().clone();
    Json(serde_json::json!({
        "frame_count": snapshot.frame_count,
        "current_time": snapshot.current_time,
        "times": snapshot.frames,
    }))
}

/// GET /select?time=... - Scrub to a specific frame timestamp.
async fn select_handler(
    Extension(tx): Extension<mpsc::Sender<ViewerCommand>>,
    Query(params): Query<SelectQuery>,
) -> impl IntoResponse {
    let accepted = tx
        .send(ViewerCommand::SelectTime(params.time.clone()))
        .await
        .is_ok();

    Json(serde_json::json!({
        "accepted": accepted,
        "time": params.time,
    }))
}

/// GET /health - Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "radar-viewer"
    }))
}

/// Start the HTTP server.
pub async fn run_server(
    status_rx: watch::Receiver<StatusSnapshot>,
    command_tx: mpsc::Sender<ViewerCommand>,
    port: u16,
) -> anyhow::Result<()> {
    let app = create_router(status_rx, command_tx);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    info!(port = port, "Starting viewer status server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
