//! Axum router construction for the observer.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled so a renderer served from elsewhere can connect.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, operator, ws};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- `WebSocket` state stream and command input
/// - `GET /api/world` -- latest snapshot
/// - `GET /api/parameters` -- current world parameters
/// - `POST /api/commands` -- apply one command
/// - `POST /api/operator/{pause,resume,stop}`, `GET /api/operator/status`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // REST API
        .route("/api/world", get(handlers::get_world))
        .route("/api/parameters", get(handlers::get_parameters))
        .route("/api/commands", post(handlers::post_command))
        // Operator API
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/resume", post(operator::resume))
        .route("/api/operator/stop", post(operator::stop))
        .route("/api/operator/status", get(operator::status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
