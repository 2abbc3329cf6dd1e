//! Shared application state for the observer server.
//!
//! [`AppState`] holds the broadcast channel for per-tick state frames, the
//! latest snapshot the REST endpoints serve, and a handle to the world so
//! inbound commands can be applied under the world lock.

use std::sync::Arc;

use sandbox_core::operator::OperatorState;
use sandbox_core::shared::SharedWorld;
use sandbox_types::WorldSnapshot;
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for state frames.
///
/// A subscriber that falls behind by more than this many frames receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
const BROADCAST_CAPACITY: usize = 64;

/// Event name of the per-tick frame pushed to every client.
pub const STATE_UPDATE_EVENT: &str = "state-update";

/// `{"event": "state-update", "data": <snapshot>}` as sent over the socket.
#[derive(Debug, Serialize)]
pub struct StateUpdate<'a> {
    /// Always [`STATE_UPDATE_EVENT`].
    pub event: &'static str,
    /// The snapshot taken after the tick.
    pub data: &'a WorldSnapshot,
}

impl<'a> StateUpdate<'a> {
    /// Wrap a snapshot in a state-update frame.
    pub const fn new(data: &'a WorldSnapshot) -> Self {
        Self {
            event: STATE_UPDATE_EVENT,
            data,
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for encoded state frames.
    pub tx: broadcast::Sender<String>,
    /// The latest snapshot (updated each tick).
    pub snapshot: Arc<RwLock<WorldSnapshot>>,
    /// The world, for applying inbound commands.
    pub world: SharedWorld,
    /// Operator control state (present when the clock is running).
    pub operator_state: Option<Arc<OperatorState>>,
}

impl AppState {
    /// Create application state around a world, with no operator attached.
    pub fn new(world: SharedWorld) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(WorldSnapshot::default())),
            world,
            operator_state: None,
        }
    }

    /// Create application state with operator control state attached.
    pub fn with_operator(world: SharedWorld, operator: Arc<OperatorState>) -> Self {
        Self {
            operator_state: Some(operator),
            ..Self::new(world)
        }
    }

    /// Subscribe to the state frame channel.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Encode `snapshot` once and push it to every connected client.
    ///
    /// Returns the number of receivers; 0 when nobody is connected.
    pub fn publish(&self, snapshot: &WorldSnapshot) -> Result<usize, serde_json::Error> {
        let frame = serde_json::to_string(&StateUpdate::new(snapshot))?;
        // send fails only when there are no receivers.
        Ok(self.tx.send(frame).unwrap_or(0))
    }
}
