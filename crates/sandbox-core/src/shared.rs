//! The single exclusion domain around the world.
//!
//! Every reader and writer, the clock and every command handler alike,
//! takes the same async mutex. There is no reader/writer split.

use std::sync::Arc;

use sandbox_world::{PhysicsBackend, RapierBackend, World};
use tokio::sync::Mutex;

/// The process-wide world behind its lock.
pub type SharedWorld<B = RapierBackend> = Arc<Mutex<World<B>>>;

/// Wrap a world for sharing between the clock and command handlers.
pub fn share<B: PhysicsBackend>(world: World<B>) -> SharedWorld<B> {
    Arc::new(Mutex::new(world))
}
