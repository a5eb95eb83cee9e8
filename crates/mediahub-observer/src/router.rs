//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/feed` -- `WebSocket` feed update stream
/// - `GET /api/feed` -- the current feed
/// - `GET /api/feed/{id}` -- single feed entry
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted to the dashboard origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/feed", get(ws::ws_feed))
        // REST API
        .route("/api/feed", get(handlers::get_feed))
        .route("/api/feed/{id}", get(handlers::get_feed_entry))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
