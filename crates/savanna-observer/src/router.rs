//! Axum router construction for the observer server.
//!
//! Assembles the dashboard, state, command, and `WebSocket` routes
//! into a single [`Router`] with CORS middleware enabled so the
//! dashboard can be served cross-origin during development.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the observer server.
///
/// - `GET /` -- HTML dashboard
/// - `GET /api/state` -- latest snapshot + log ring
/// - `POST /api/cmd` -- tagged command JSON
/// - `GET /ws/ticks` -- `WebSocket` snapshot stream
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/cmd", post(handlers::post_cmd))
        .route("/ws/ticks", get(ws::ws_ticks))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
