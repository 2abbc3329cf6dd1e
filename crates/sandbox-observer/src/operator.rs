//! Operator REST handlers for runtime clock control.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/pause` | Pause the clock |
//! | `POST` | `/api/operator/resume` | Resume the clock |
//! | `POST` | `/api/operator/stop` | Stop the clock; the server keeps serving |
//! | `GET` | `/api/operator/status` | Current clock status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use sandbox_core::operator::{OperatorState, SimulationStatus};

use crate::error::ObserverError;
use crate::state::AppState;

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: &'static str,
}

fn operator(state: &AppState) -> Result<&Arc<OperatorState>, ObserverError> {
    state
        .operator_state
        .as_ref()
        .ok_or(ObserverError::OperatorUnavailable)
}

// ---------------------------------------------------------------------------
// POST /api/operator/pause
// ---------------------------------------------------------------------------

/// Pause the clock. Commands are still applied while paused.
pub async fn pause(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.pause();
    Ok(Json(OperatorResponse {
        ok: true,
        message: "Simulation paused",
    }))
}

// ---------------------------------------------------------------------------
// POST /api/operator/resume
// ---------------------------------------------------------------------------

/// Resume the clock after a pause.
pub async fn resume(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.resume();
    Ok(Json(OperatorResponse {
        ok: true,
        message: "Simulation resumed",
    }))
}

// ---------------------------------------------------------------------------
// POST /api/operator/stop
// ---------------------------------------------------------------------------

/// Request a clean stop of the clock.
pub async fn stop(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.request_stop();
    Ok(Json(OperatorResponse {
        ok: true,
        message: "Stop requested -- clock will end before the next tick",
    }))
}

// ---------------------------------------------------------------------------
// GET /api/operator/status
// ---------------------------------------------------------------------------

/// Return the clock status with entity counts from the latest snapshot.
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = operator(&state)?;

    let (tick, particles, zones) = {
        let snapshot = state.snapshot.read().await;
        (
            snapshot.tick,
            snapshot.particles.len(),
            snapshot.colliders.len(),
        )
    };

    Ok(Json(SimulationStatus {
        tick,
        paused: operator.is_paused(),
        stop_requested: operator.is_stop_requested(),
        elapsed_seconds: operator.elapsed_seconds(),
        max_ticks: operator.max_ticks(),
        particles,
        zones,
        end_reason: operator.end_reason().await,
        failed_ticks: operator.failed_ticks(),
        last_tick_error: operator.last_tick_error().await,
        started_at: operator.started_at().to_rfc3339(),
    }))
}
