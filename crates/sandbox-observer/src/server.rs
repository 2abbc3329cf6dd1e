//! Observer HTTP server lifecycle.
//!
//! [`start_server`] binds a TCP listener and serves the router until the
//! process exits.

use std::net::SocketAddr;
use std::sync::Arc;

use sandbox_core::config::ObserverConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the observer server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Resolve the configured host and port into a socket address.
pub fn socket_addr(config: &ObserverConfig) -> Result<SocketAddr, ServerError> {
    let addr = config.bind_addr();
    addr.parse()
        .map_err(|e| ServerError::Bind(format!("invalid address {addr}: {e}")))
}

/// Bind to the configured address and serve until terminated.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is invalid or the listener
/// cannot bind, and [`ServerError::Serve`] on a fatal I/O error.
pub async fn start_server(config: &ObserverConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = socket_addr(config)?;
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "Observer server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_default_address() {
        let config = ObserverConfig::default();
        let addr = socket_addr(&config);
        assert!(matches!(addr, Ok(a) if a.port() == 5000));
    }

    #[test]
    fn rejects_unparseable_host() {
        let config = ObserverConfig {
            host: "not a host".to_owned(),
            ..ObserverConfig::default()
        };
        assert!(matches!(socket_addr(&config), Err(ServerError::Bind(_))));
    }
}
