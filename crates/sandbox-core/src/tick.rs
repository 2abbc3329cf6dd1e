//! One simulation tick: step the world, advance the clock, snapshot.
//!
//! The step and the snapshot happen under a single acquisition of the world
//! lock, so the snapshot always shows exactly the state the step produced.
//! If the step fails the clock is not advanced, and the next tick starts
//! again from the restored pre-step state.

use sandbox_types::WorldSnapshot;
use sandbox_world::{PhysicsBackend, World, WorldError};
use tracing::debug;

use crate::clock::{ClockError, SimulationClock};
use crate::shared::SharedWorld;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The world step failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Whether physics advanced (false while the time scale is zero).
    pub advanced: bool,
    /// Live particles after the tick.
    pub particles: usize,
    /// Live zones after the tick.
    pub zones: usize,
    /// Particles removed by destroyer zones.
    pub destroyed: usize,
    /// Particles moved through portals.
    pub teleported: usize,
    /// Explosives that went off.
    pub detonated: usize,
    /// World state after the tick.
    pub snapshot: WorldSnapshot,
}

/// Run one tick against an already-locked world.
///
/// # Errors
///
/// Returns [`TickError::World`] if the backend step fails, or
/// [`TickError::Clock`] if the tick counter would overflow.
pub fn run_tick<B: PhysicsBackend>(
    world: &mut World<B>,
    clock: &mut SimulationClock,
) -> Result<TickSummary, TickError> {
    let report = world.step(clock.dt())?;
    let tick = clock.advance()?;
    let snapshot = world.snapshot(tick);

    if report.destroyed > 0 || report.teleported > 0 || report.detonated > 0 {
        debug!(
            tick,
            destroyed = report.destroyed,
            teleported = report.teleported,
            detonated = report.detonated,
            "contact effects applied"
        );
    }

    Ok(TickSummary {
        tick,
        advanced: report.advanced,
        particles: snapshot.particles.len(),
        zones: snapshot.colliders.len(),
        destroyed: report.destroyed,
        teleported: report.teleported,
        detonated: report.detonated,
        snapshot,
    })
}

/// Lock the shared world and run one tick.
///
/// # Errors
///
/// Same as [`run_tick`].
pub async fn run_shared_tick<B: PhysicsBackend>(
    world: &SharedWorld<B>,
    clock: &mut SimulationClock,
) -> Result<TickSummary, TickError> {
    let mut guard = world.lock().await;
    run_tick(&mut *guard, clock)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sandbox_types::WorldParameters;
    use sandbox_world::Vec2;

    use super::*;

    #[test]
    fn tick_advances_clock_and_snapshots() {
        let mut world = World::seeded(WorldParameters::default(), 1).unwrap();
        world.spawn_particle(Vec2::new(600.0, 50.0), None, None, None).unwrap();
        let mut clock = SimulationClock::new(60).unwrap();

        let first = run_tick(&mut world, &mut clock).unwrap();
        assert_eq!(first.tick, 1);
        assert!(first.advanced);
        assert_eq!(first.particles, 1);
        assert_eq!(first.snapshot.tick, 1);

        let second = run_tick(&mut world, &mut clock).unwrap();
        assert_eq!(second.tick, 2);
        let y1 = first.snapshot.particles.first().unwrap().y;
        let y2 = second.snapshot.particles.first().unwrap().y;
        assert!(y2 > y1);
    }

    #[test]
    fn frozen_world_still_ticks() {
        let params = WorldParameters {
            time_scale: 0.0,
            ..WorldParameters::default()
        };
        let mut world = World::seeded(params, 1).unwrap();
        let mut clock = SimulationClock::new(60).unwrap();
        let summary = run_tick(&mut world, &mut clock).unwrap();
        assert_eq!(summary.tick, 1);
        assert!(!summary.advanced);
    }

    #[tokio::test]
    async fn shared_tick_uses_lock() {
        let shared = crate::shared::share(World::seeded(WorldParameters::default(), 1).unwrap());
        let mut clock = SimulationClock::new(60).unwrap();
        let summary = run_shared_tick(&shared, &mut clock).await.unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.particles, 0);
    }
}
