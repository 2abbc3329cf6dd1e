//! Observer startup helper for embedding in the engine binary.
//!
//! [`spawn_observer`] launches the HTTP + `WebSocket` server on a
//! background Tokio task so it runs alongside the clock.

use std::sync::Arc;

use sandbox_core::config::ObserverConfig;
use tokio::task::JoinHandle;

use crate::server::{self, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the observer server on a background task.
///
/// The address is validated before the task is spawned; bind failures
/// inside the task are logged. The server runs until the runtime shuts
/// down or the returned handle is aborted.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address is invalid.
pub fn spawn_observer(
    config: ObserverConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = server::socket_addr(&config)?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(&config, state).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(%addr, "Observer server spawned on background task");

    Ok(handle)
}
