//! Tick callback that feeds the observer.
//!
//! After each tick the snapshot is pushed to every connected `WebSocket`
//! client and stored as the latest copy for the REST endpoints.

use std::sync::Arc;

use sandbox_core::runner::TickCallback;
use sandbox_core::tick::TickSummary;
use sandbox_observer::state::AppState;
use tracing::{trace, warn};

/// Callback that bridges the clock to the observer.
pub struct ObserverCallback {
    state: Arc<AppState>,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl TickCallback for ObserverCallback {
    fn on_tick(&mut self, summary: &TickSummary) {
        match self.state.publish(&summary.snapshot) {
            Ok(receivers) => trace!(tick = summary.tick, receivers, "State frame sent"),
            Err(e) => warn!(tick = summary.tick, error = %e, "Failed to encode state frame"),
        }

        // try_write so a slow REST reader never stalls the clock; a skipped
        // update is replaced on the next tick.
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.clone_from(&summary.snapshot);
        }
    }
}
