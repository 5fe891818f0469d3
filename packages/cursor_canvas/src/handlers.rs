//! HTTP-side handlers: the channel upgrade, health/metrics, and the 404
//! fallback. Thin plumbing only; all relay logic lives in [`crate::ws`].

use axum::{
    Json,
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::metrics::HealthStatus;
use crate::ws::handle_session;

/// Upgrade `/ws` to the duplex cursor channel and hand it to the room.
/// Requests without upgrade semantics are rejected with 400 by the
/// extractor before this handler runs.
pub async fn websocket_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let room = state.room.clone();
    let metrics = state.metrics.clone();
    ws.on_upgrade(move |socket| handle_session(socket, room, metrics))
}

/// Health check endpoint - returns server status
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.snapshot();

    let status = if snapshot.errors.websocket == 0 {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthStatus {
        status: status.to_string(),
        sessions: snapshot.sessions.active,
        uptime_secs: snapshot.uptime_secs,
    })
}

/// Metrics endpoint - returns detailed server metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Any path other than the known routes is unroutable.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
