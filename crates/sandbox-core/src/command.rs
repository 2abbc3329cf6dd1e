//! Command surface: apply one inbound [`Command`] to the world.
//!
//! Each command is a single atomic mutation taken under the world lock.
//! Invalid commands are rejected before anything changes and are reported
//! to the caller as a [`CommandError`]; they never reach the clock.

use sandbox_types::{Command, EntityId};
use sandbox_world::{PhysicsBackend, Vec2, World, WorldError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::shared::SharedWorld;

/// Errors raised while applying a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The world rejected the command's input.
    #[error("{command} rejected: {source}")]
    Rejected {
        /// Event name of the rejected command.
        command: &'static str,
        /// Why the world refused it.
        source: WorldError,
    },
}

/// What a successfully applied command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A particle or zone was created.
    Spawned {
        /// The new entity.
        id: EntityId,
    },
    /// A world parameter was changed.
    Updated,
    /// Every particle and zone was removed.
    Cleared {
        /// Particles removed.
        particles: usize,
        /// Zones removed.
        zones: usize,
    },
    /// An explosion was applied.
    Exploded {
        /// Particles that received an impulse.
        affected: usize,
    },
}

/// Apply `command` to `world`.
///
/// # Errors
///
/// Returns [`CommandError::Rejected`] when the world refuses the input; the
/// world is unchanged in that case.
pub fn execute<B: PhysicsBackend>(
    world: &mut World<B>,
    command: Command,
) -> Result<CommandOutcome, CommandError> {
    let name = command.name();
    let reject = |source: WorldError| CommandError::Rejected {
        command: name,
        source,
    };

    let outcome = match command {
        Command::SpawnParticle(p) => {
            let id = world
                .spawn_particle(Vec2::new(p.x, p.y), p.kind, p.size, p.color)
                .map_err(reject)?;
            CommandOutcome::Spawned { id }
        }
        Command::SpawnZone(z) => {
            let id = world
                .spawn_zone(Vec2::new(z.x, z.y), z.kind)
                .map_err(reject)?;
            CommandOutcome::Spawned { id }
        }
        Command::SetGravity(v) => {
            world.set_gravity(v.value).map_err(reject)?;
            CommandOutcome::Updated
        }
        Command::SetWind(v) => {
            world.set_wind(v.value).map_err(reject)?;
            CommandOutcome::Updated
        }
        Command::SetTimeScale(v) => {
            world.set_time_scale(v.value).map_err(reject)?;
            CommandOutcome::Updated
        }
        Command::SetDefaultParticleKind(k) => {
            world.set_particle_kind(k.kind);
            CommandOutcome::Updated
        }
        Command::SetDefaultParticleSize(s) => {
            world.set_particle_size(s.size).map_err(reject)?;
            CommandOutcome::Updated
        }
        Command::SetDefaultParticleColor(c) => {
            world.set_particle_color(c.color).map_err(reject)?;
            CommandOutcome::Updated
        }
        Command::SetMagnetStrength(v) => {
            world.set_magnet_strength(v.value).map_err(reject)?;
            CommandOutcome::Updated
        }
        Command::SetExplosionPower(v) => {
            world.set_explosion_power(v.value).map_err(reject)?;
            CommandOutcome::Updated
        }
        Command::SetScreenShake(f) => {
            world.set_screen_shake(f.value);
            CommandOutcome::Updated
        }
        Command::SetParticleTrails(f) => {
            world.set_particle_trails(f.value);
            CommandOutcome::Updated
        }
        Command::Clear => {
            let report = world.clear();
            CommandOutcome::Cleared {
                particles: report.particles,
                zones: report.zones,
            }
        }
        Command::TriggerExplosion(at) => {
            let affected = world
                .trigger_explosion(Vec2::new(at.x, at.y))
                .map_err(reject)?;
            CommandOutcome::Exploded { affected }
        }
    };

    debug!(command = name, ?outcome, "command applied");
    Ok(outcome)
}

/// Lock the shared world and apply `command`.
///
/// Rejections are logged at `warn` and returned.
pub async fn submit(world: &SharedWorld, command: Command) -> Result<CommandOutcome, CommandError> {
    let mut guard = world.lock().await;
    execute(&mut *guard, command).inspect_err(|e| warn!(error = %e, "command dropped"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sandbox_types::{
        ColorValue, ExplosionAt, FlagValue, KindValue, ParticleKind, ScalarValue, SizeValue,
        SpawnParticle, SpawnZone, WorldParameters, ZoneKind,
    };

    use super::*;

    fn world() -> World {
        World::seeded(WorldParameters::default(), 11).unwrap()
    }

    fn spawn(x: f32, y: f32) -> Command {
        Command::SpawnParticle(SpawnParticle {
            x,
            y,
            kind: None,
            size: None,
            color: None,
        })
    }

    #[test]
    fn spawn_commands_create_entities() {
        let mut world = world();
        let outcome = execute(&mut world, spawn(100.0, 100.0)).unwrap();
        assert!(matches!(outcome, CommandOutcome::Spawned { .. }));
        execute(
            &mut world,
            Command::SpawnZone(SpawnZone {
                x: 400.0,
                y: 400.0,
                kind: ZoneKind::Portal,
            }),
        )
        .unwrap();
        assert_eq!(world.particles().len(), 1);
        assert_eq!(world.zones().len(), 1);
    }

    #[test]
    fn non_finite_spawn_is_rejected_without_mutation() {
        let mut world = world();
        let err = execute(&mut world, spawn(f32::NAN, 10.0)).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Rejected {
                command: "spawn-particle",
                ..
            }
        ));
        assert!(world.particles().is_empty());
    }

    #[test]
    fn setters_update_parameters() {
        let mut world = world();
        let commands = [
            Command::SetGravity(ScalarValue { value: 0.5 }),
            Command::SetWind(ScalarValue { value: 10.0 }),
            Command::SetTimeScale(ScalarValue { value: 2.0 }),
            Command::SetDefaultParticleKind(KindValue {
                kind: ParticleKind::Water,
            }),
            Command::SetDefaultParticleSize(SizeValue { size: 8.0 }),
            Command::SetDefaultParticleColor(ColorValue {
                color: "#0000ff".to_owned(),
            }),
            Command::SetMagnetStrength(ScalarValue { value: 1000.0 }),
            Command::SetExplosionPower(ScalarValue { value: 80.0 }),
            Command::SetScreenShake(FlagValue { value: true }),
            Command::SetParticleTrails(FlagValue { value: true }),
        ];
        for command in commands {
            assert_eq!(execute(&mut world, command).unwrap(), CommandOutcome::Updated);
        }
        let params = world.parameters();
        assert!((params.gravity_scale - 0.5).abs() < f32::EPSILON);
        assert!((params.time_scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(params.particle_kind, ParticleKind::Water);
        assert_eq!(params.particle_color, "#0000ff");
        assert!((params.explosion_power - 80.0).abs() < f32::EPSILON);
        assert!(params.screen_shake);
        assert!(params.particle_trails);
    }

    #[test]
    fn invalid_setter_keeps_previous_value() {
        let mut world = world();
        assert!(execute(&mut world, Command::SetTimeScale(ScalarValue { value: -3.0 })).is_err());
        assert!(
            execute(&mut world, Command::SetDefaultParticleSize(SizeValue { size: 0.0 })).is_err()
        );
        assert_eq!(world.parameters(), &WorldParameters::default());
    }

    #[test]
    fn clear_reports_counts() {
        let mut world = world();
        execute(&mut world, spawn(100.0, 100.0)).unwrap();
        execute(&mut world, spawn(200.0, 100.0)).unwrap();
        let outcome = execute(&mut world, Command::Clear).unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Cleared {
                particles: 2,
                zones: 0
            }
        );
    }

    #[test]
    fn explosion_reports_affected_particles() {
        let mut world = world();
        execute(&mut world, spawn(620.0, 350.0)).unwrap();
        let outcome = execute(
            &mut world,
            Command::TriggerExplosion(ExplosionAt { x: 600.0, y: 350.0 }),
        )
        .unwrap();
        assert_eq!(outcome, CommandOutcome::Exploded { affected: 1 });
    }

    #[tokio::test]
    async fn submit_locks_shared_world() {
        let shared = crate::shared::share(world());
        submit(&shared, spawn(100.0, 100.0)).await.unwrap();
        assert!(submit(&shared, spawn(f32::INFINITY, 0.0)).await.is_err());
        assert_eq!(shared.lock().await.particles().len(), 1);
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let value = serde_json::to_value(CommandOutcome::Exploded { affected: 3 }).unwrap();
        assert_eq!(value["outcome"], "exploded");
        assert_eq!(value["affected"], 3);
    }
}
