//! cursor_canvas: real-time shared-cursor relay.
//!
//! Each connected client reports its 2D cursor position over a persistent
//! WebSocket; the server broadcasts every position change to all other
//! connected clients, giving the illusion of a shared multi-cursor canvas.
//! One [`ws::Room`] instance owns one canvas.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use uuid::Uuid;

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod views;
pub mod ws;

use crate::config::ServerConfig;
use crate::metrics::ServerMetrics;
use crate::ws::Room;

/// Shared state for all HTTP and WebSocket handlers. Config is consumed
/// at construction; the room holds the knobs it needs.
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<Room>,
    pub metrics: Arc<ServerMetrics>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let metrics = Arc::new(ServerMetrics::new());
        let room = Arc::new(Room::new(
            config.websocket.send_channel_capacity,
            metrics.clone(),
        ));
        Self { room, metrics }
    }
}

/// Custom span maker that adds a unique request ID to each incoming request
#[derive(Clone)]
struct RequestIdMakeSpan;

impl<B> MakeSpan<B> for RequestIdMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> tracing::Span {
        let request_id = Uuid::new_v4().to_string();
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(views::index_page))
        .route("/ws", get(handlers::websocket_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http().make_span_with(RequestIdMakeSpan))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
