//! `WebSocket` handler: state frames out, commands in.
//!
//! Clients connect to `GET /ws` and receive one
//! `{"event":"state-update","data":<snapshot>}` text frame per tick. Text
//! frames from the client are decoded as commands and applied to the
//! world; malformed ones are dropped without a reply.
//!
//! If a client falls behind, lagged frames are skipped and the client
//! resumes from the most recent tick.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use sandbox_core::command;
use sandbox_types::Command;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, trace};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(frame) => {
                        if socket.send(Message::Text(frame.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Text(text))) => apply_message(&state, text.as_str()).await,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Decode one client message and apply it. Failures are logged and dropped.
async fn apply_message(state: &AppState, text: &str) {
    match serde_json::from_str::<Command>(text) {
        Ok(command) => match command::submit(&state.world, command).await {
            Ok(outcome) => trace!(?outcome, "socket command applied"),
            Err(e) => debug!(error = %e, "socket command rejected"),
        },
        Err(e) => debug!(error = %e, "dropping malformed socket message"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sandbox_core::shared::share;
    use sandbox_types::WorldParameters;
    use sandbox_world::World;

    use super::*;

    fn state() -> AppState {
        AppState::new(share(World::seeded(WorldParameters::default(), 4).unwrap()))
    }

    #[tokio::test]
    async fn socket_commands_apply_or_drop() {
        let state = state();

        apply_message(&state, r#"{"event":"spawn-particle","data":{"x":100,"y":100}}"#).await;
        apply_message(&state, r#"{"event":"set-gravity","data":{"value":1e38}}"#).await;
        apply_message(&state, r#"{"event":"spawn-zone","data":{"kind":"volcano"}}"#).await;
        apply_message(&state, "not json").await;

        let world = state.world.lock().await;
        assert_eq!(world.particles().len(), 1);
        assert!(world.zones().is_empty());
        assert_eq!(world.parameters(), &WorldParameters::default());
    }
}
