//! REST endpoint handlers for the observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/world` | Latest world snapshot |
//! | `GET` | `/api/parameters` | Current world parameters |
//! | `POST` | `/api/commands` | Apply one command |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use sandbox_core::command::{self, CommandOutcome};
use sandbox_types::Command;
use tracing::debug;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the latest tick and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let tick = snapshot.tick;
    let particles = snapshot.particles.len();
    let zones = snapshot.colliders.len();
    drop(snapshot);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Particle Sandbox</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
    </style>
</head>
<body>
    <h1>Particle Sandbox</h1>

    <div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{tick}</div>
        </div>
        <div class="metric">
            <div class="label">Particles</div>
            <div class="value">{particles}</div>
        </div>
        <div class="metric">
            <div class="label">Zones</div>
            <div class="value">{zones}</div>
        </div>
    </div>

    <h2>API</h2>
    <ul>
        <li>GET <a href="/api/world">/api/world</a> -- Latest snapshot</li>
        <li>GET <a href="/api/parameters">/api/parameters</a> -- World parameters</li>
        <li>GET <a href="/api/operator/status">/api/operator/status</a> -- Clock status</li>
        <li>POST /api/commands -- Apply a command</li>
        <li>WS /ws -- State stream and command input</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/world
// ---------------------------------------------------------------------------

/// Return the snapshot taken after the most recent tick.
pub async fn get_world(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await.clone();
    Json(snapshot)
}

// ---------------------------------------------------------------------------
// GET /api/parameters
// ---------------------------------------------------------------------------

/// Return the world's current parameters.
pub async fn get_parameters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let params = state.world.lock().await.parameters().clone();
    Json(params)
}

// ---------------------------------------------------------------------------
// POST /api/commands
// ---------------------------------------------------------------------------

/// Decode and apply one command.
///
/// The body uses the same `{"event": ..., "data": ...}` shape as socket
/// messages. Responds `202 Accepted` with the outcome, or `400` when the
/// body is malformed or the world rejects the input.
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CommandOutcome>), ObserverError> {
    let command: Command = serde_json::from_slice(&body).inspect_err(|e| {
        debug!(error = %e, "malformed command body");
    })?;
    let outcome = command::submit(&state.world, command).await?;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}
