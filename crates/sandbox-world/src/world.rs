//! The [`World`]: every particle, zone, and boundary plus the global
//! parameters, layered over a [`PhysicsBackend`].
//!
//! # Step pipeline
//!
//! [`World::step`] runs, in order:
//!
//! 1. Wind: a uniform horizontal force on every particle.
//! 2. Magnets: an inverse-square pull from every magnet zone on every
//!    particle in range.
//! 3. The backend step, with `dt` scaled by the time scale.
//! 4. Contact rules for every contact that began during the step.
//!
//! A time scale of zero freezes the world: nothing in the pipeline runs.
//!
//! # Atomicity
//!
//! Every public operation validates its inputs before touching any state.
//! A rejected call leaves the world unchanged.

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use sandbox_types::{
    ColliderView, EntityId, ParticleKind, ParticleView, WorldParameters, WorldSnapshot, ZoneKind,
};
use tracing::{debug, info, trace};

use crate::arena::Boundary;
use crate::backend::{BackendError, ContactEvent, ContactPhase, PhysicsBackend};
use crate::body::BodyState;
use crate::effects::{CONTACT_RULES, ContactRule, rule_for};
use crate::entity::{Particle, Zone};
use crate::error::WorldError;
use crate::forces;
use crate::profile::{ParticleProfile, ZoneProfile, particle_color};
use crate::rapier::RapierBackend;

/// What happened during one [`World::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Whether the backend was stepped (false while frozen).
    pub advanced: bool,
    /// Contact events returned by the backend.
    pub contacts: usize,
    /// Particles removed by destroyer zones.
    pub destroyed: usize,
    /// Particles moved through a portal.
    pub teleported: usize,
    /// Explosive particles that went off.
    pub detonated: usize,
}

/// How many entities a [`World::clear`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Particles removed.
    pub particles: usize,
    /// Zones removed.
    pub zones: usize,
}

/// The simulation world.
#[derive(Debug)]
pub struct World<B: PhysicsBackend = RapierBackend> {
    backend: B,
    params: WorldParameters,
    particles: Vec<Particle>,
    zones: Vec<Zone>,
    boundaries: Vec<(EntityId, Boundary)>,
    rng: StdRng,
}

impl World<RapierBackend> {
    /// Create a world on the default backend with an OS-seeded RNG.
    pub fn new(params: WorldParameters) -> Result<Self, WorldError> {
        Self::with_backend(RapierBackend::new(), params, StdRng::from_os_rng())
    }

    /// Create a world on the default backend with a fixed RNG seed.
    ///
    /// The seed drives portal selection and plasma hues.
    pub fn seeded(params: WorldParameters, seed: u64) -> Result<Self, WorldError> {
        Self::with_backend(RapierBackend::new(), params, StdRng::seed_from_u64(seed))
    }
}

impl<B: PhysicsBackend> World<B> {
    /// Create a world on `backend`.
    ///
    /// Registers the contact rules, applies gravity, and inserts the four
    /// arena walls.
    pub fn with_backend(
        mut backend: B,
        params: WorldParameters,
        rng: StdRng,
    ) -> Result<Self, WorldError> {
        check_parameters(&params)?;

        for (pair, _) in CONTACT_RULES {
            backend.register_contact_pair(pair);
        }
        backend.set_gravity(forces::gravity(params.gravity_scale));

        let mut boundaries = Vec::with_capacity(Boundary::ALL.len());
        for wall in Boundary::ALL {
            let id = EntityId::new();
            backend.insert(id, &wall.body_spec())?;
            boundaries.push((id, wall));
        }

        info!(
            gravity_scale = params.gravity_scale,
            particle_kind = %params.particle_kind,
            "world created"
        );

        Ok(Self {
            backend,
            params,
            particles: Vec::new(),
            zones: Vec::new(),
            boundaries,
            rng,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current global parameters.
    pub const fn parameters(&self) -> &WorldParameters {
        &self.params
    }

    /// Live particles in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Live zones in insertion order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// The permanent arena walls.
    pub fn boundaries(&self) -> &[(EntityId, Boundary)] {
        &self.boundaries
    }

    /// Look up a live particle.
    pub fn particle(&self, id: EntityId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    /// Look up a live zone.
    pub fn zone(&self, id: EntityId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Whether `id` is a live particle.
    pub fn contains_particle(&self, id: EntityId) -> bool {
        self.particles.iter().any(|p| p.id == id)
    }

    /// Kinematic state of any live body (particle, zone, or wall).
    pub fn body_state(&self, id: EntityId) -> Option<BodyState> {
        self.backend.body_state(id)
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    // -----------------------------------------------------------------------
    // Spawning and clearing
    // -----------------------------------------------------------------------

    /// Spawn a particle centered at `position`.
    ///
    /// Omitted arguments fall back to the current defaults. The color is
    /// replaced for plasma, metal, and explosive particles.
    pub fn spawn_particle(
        &mut self,
        position: Vec2,
        kind: Option<ParticleKind>,
        size: Option<f32>,
        color: Option<String>,
    ) -> Result<EntityId, WorldError> {
        if !position.is_finite() {
            return Err(WorldError::NonFinite { what: "spawn position" });
        }
        let kind = kind.unwrap_or(self.params.particle_kind);
        let size = size.unwrap_or(self.params.particle_size);
        check_size(size)?;

        let profile = ParticleProfile::for_kind(kind, size);
        let spec = profile.body_spec(position);
        spec.validate()?;

        let requested = color.unwrap_or_else(|| self.params.particle_color.clone());
        let color = particle_color(kind, requested, &mut self.rng);

        let id = EntityId::new();
        self.backend.insert(id, &spec)?;
        self.particles.push(Particle {
            id,
            kind,
            color,
            size,
            shape: profile.shape,
            category: profile.category,
        });
        debug!(%id, kind = %kind, size, x = position.x, y = position.y, "particle spawned");
        Ok(id)
    }

    /// Spawn an interaction zone centered at `position`.
    pub fn spawn_zone(&mut self, position: Vec2, kind: ZoneKind) -> Result<EntityId, WorldError> {
        if !position.is_finite() {
            return Err(WorldError::NonFinite { what: "zone position" });
        }
        let profile = ZoneProfile::for_kind(kind);
        let id = EntityId::new();
        self.backend.insert(id, &profile.body_spec(position))?;
        self.zones.push(Zone {
            id,
            kind,
            shape: profile.shape,
            category: profile.category,
        });
        debug!(%id, kind = %kind, x = position.x, y = position.y, "zone spawned");
        Ok(id)
    }

    /// Remove every particle and zone. The arena walls stay.
    pub fn clear(&mut self) -> ClearReport {
        let report = ClearReport {
            particles: self.particles.len(),
            zones: self.zones.len(),
        };
        for particle in self.particles.drain(..) {
            self.backend.remove(particle.id);
        }
        for zone in self.zones.drain(..) {
            self.backend.remove(zone.id);
        }
        info!(
            particles = report.particles,
            zones = report.zones,
            "world cleared"
        );
        report
    }

    fn remove_particle(&mut self, id: EntityId) -> bool {
        let Some(index) = self.particles.iter().position(|p| p.id == id) else {
            return false;
        };
        self.particles.remove(index);
        self.backend.remove(id)
    }

    // -----------------------------------------------------------------------
    // Parameter setters
    // -----------------------------------------------------------------------

    /// Set the gravity multiplier and update the backend's gravity.
    pub fn set_gravity(&mut self, scale: f32) -> Result<(), WorldError> {
        check_bounded("gravity scale", scale, MAX_GRAVITY_SCALE)?;
        self.params.gravity_scale = scale;
        self.backend.set_gravity(forces::gravity(scale));
        Ok(())
    }

    /// Set the horizontal wind.
    pub fn set_wind(&mut self, wind: f32) -> Result<(), WorldError> {
        check_bounded("wind", wind, MAX_WIND)?;
        self.params.wind = wind;
        Ok(())
    }

    /// Set the simulation speed multiplier. Zero freezes the world.
    pub fn set_time_scale(&mut self, scale: f32) -> Result<(), WorldError> {
        check_time_scale(scale)?;
        self.params.time_scale = scale;
        Ok(())
    }

    /// Set the kind used when a spawn omits it.
    pub const fn set_particle_kind(&mut self, kind: ParticleKind) {
        self.params.particle_kind = kind;
    }

    /// Set the size used when a spawn omits it.
    pub fn set_particle_size(&mut self, size: f32) -> Result<(), WorldError> {
        check_size(size)?;
        self.params.particle_size = size;
        Ok(())
    }

    /// Set the color used when a spawn omits it.
    pub fn set_particle_color(&mut self, color: String) -> Result<(), WorldError> {
        if color.trim().is_empty() {
            return Err(WorldError::EmptyParameter {
                name: "particle color",
            });
        }
        self.params.particle_color = color;
        Ok(())
    }

    /// Set the magnet strength (negative repels).
    pub fn set_magnet_strength(&mut self, strength: f32) -> Result<(), WorldError> {
        check_bounded("magnet strength", strength, MAX_MAGNET_STRENGTH)?;
        self.params.magnet_strength = strength;
        Ok(())
    }

    /// Set the impulse magnitude of explosions.
    pub fn set_explosion_power(&mut self, power: f32) -> Result<(), WorldError> {
        check_bounded("explosion power", power, MAX_EXPLOSION_POWER)?;
        self.params.explosion_power = power;
        Ok(())
    }

    /// Presentation flag; stored and reported, no physical effect.
    pub const fn set_screen_shake(&mut self, enabled: bool) {
        self.params.screen_shake = enabled;
    }

    /// Presentation flag; stored and reported, no physical effect.
    pub const fn set_particle_trails(&mut self, enabled: bool) {
        self.params.particle_trails = enabled;
    }

    // -----------------------------------------------------------------------
    // Explosions
    // -----------------------------------------------------------------------

    /// Push every particle within the explosion radius of `center` away
    /// from it. Returns how many particles received an impulse.
    pub fn trigger_explosion(&mut self, center: Vec2) -> Result<usize, WorldError> {
        if !center.is_finite() {
            return Err(WorldError::NonFinite {
                what: "explosion center",
            });
        }
        let affected = self.explode_at(center);
        debug!(x = center.x, y = center.y, affected, "explosion triggered");
        Ok(affected)
    }

    fn explode_at(&mut self, center: Vec2) -> usize {
        let power = self.params.explosion_power;
        let mut affected: usize = 0;
        for particle in &self.particles {
            let Some(state) = self.backend.body_state(particle.id) else {
                continue;
            };
            if let Some(impulse) = forces::explosion_impulse(center, state.position, power) {
                self.backend.apply_impulse(particle.id, impulse);
                affected = affected.saturating_add(1);
            }
        }
        affected
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance the world by `dt` seconds of nominal time.
    ///
    /// On backend failure every body is back where it was before the call
    /// and the error is returned.
    pub fn step(&mut self, dt: f32) -> Result<StepReport, WorldError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(BackendError::InvalidTimestep { dt }.into());
        }
        if self.params.time_scale == 0.0 {
            return Ok(StepReport::default());
        }

        self.apply_wind();
        self.apply_magnets();

        let events = self.backend.step(dt * self.params.time_scale)?;
        let mut report = self.apply_contacts(&events);
        report.advanced = true;
        Ok(report)
    }

    fn apply_wind(&mut self) {
        let Some(force) = forces::wind_force(self.params.wind) else {
            return;
        };
        for particle in &self.particles {
            self.backend.apply_force(particle.id, force);
        }
    }

    fn apply_magnets(&mut self) {
        let strength = self.params.magnet_strength;
        if strength == 0.0 {
            return;
        }
        let magnets: Vec<Vec2> = self
            .zones
            .iter()
            .filter(|z| z.kind == ZoneKind::Magnet)
            .filter_map(|z| self.backend.body_state(z.id))
            .map(|s| s.position)
            .collect();
        if magnets.is_empty() {
            return;
        }
        for particle in &self.particles {
            let Some(state) = self.backend.body_state(particle.id) else {
                continue;
            };
            for magnet in &magnets {
                if let Some(force) = forces::magnet_force(*magnet, state.position, strength) {
                    self.backend.apply_force(particle.id, force);
                }
            }
        }
    }

    /// Apply the contact rules to a batch of backend events.
    ///
    /// Only `Begin` events act. Each rule first checks that its particle is
    /// still live, so repeated or stale events are no-ops.
    pub fn apply_contacts(&mut self, events: &[ContactEvent]) -> StepReport {
        let mut report = StepReport {
            contacts: events.len(),
            ..StepReport::default()
        };
        for event in events {
            if event.phase != ContactPhase::Begin {
                continue;
            }
            let Some(rule) = rule_for(event.pair) else {
                continue;
            };
            trace!(first = %event.first, second = %event.second, ?rule, "contact");
            match rule {
                ContactRule::Destroy => {
                    if self.remove_particle(event.first) {
                        report.destroyed = report.destroyed.saturating_add(1);
                    }
                }
                ContactRule::Teleport => {
                    if self.teleport(event.first, event.second) {
                        report.teleported = report.teleported.saturating_add(1);
                    }
                }
                ContactRule::Detonate => {
                    if self.detonate(event.first) {
                        report.detonated = report.detonated.saturating_add(1);
                    }
                }
            }
        }
        report
    }

    fn teleport(&mut self, particle: EntityId, portal: EntityId) -> bool {
        if !self.contains_particle(particle) {
            return false;
        }
        let targets: Vec<EntityId> = self
            .zones
            .iter()
            .filter(|z| z.kind == ZoneKind::Portal && z.id != portal)
            .map(|z| z.id)
            .collect();
        let Some(target) = targets.choose(&mut self.rng).copied() else {
            return false;
        };
        let Some(destination) = self.backend.body_state(target).map(|s| s.position) else {
            return false;
        };
        self.backend.set_position(particle, destination)
    }

    fn detonate(&mut self, explosive: EntityId) -> bool {
        if !self.contains_particle(explosive) {
            return false;
        }
        let Some(center) = self.backend.body_state(explosive).map(|s| s.position) else {
            return false;
        };
        let affected = self.explode_at(center);
        debug!(%explosive, affected, "explosive detonated");
        self.remove_particle(explosive)
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Point-in-time view of every particle and zone.
    pub fn snapshot(&self, tick: u64) -> WorldSnapshot {
        let particles = self
            .particles
            .iter()
            .filter_map(|p| {
                let state = self.backend.body_state(p.id)?;
                Some(ParticleView {
                    x: state.position.x,
                    y: state.position.y,
                    angle: state.angle,
                    kind: p.kind,
                    color: p.color.clone(),
                    size: p.size,
                    geometry: p.shape.geometry(),
                })
            })
            .collect();
        let colliders = self
            .zones
            .iter()
            .filter_map(|z| {
                let state = self.backend.body_state(z.id)?;
                Some(ColliderView {
                    x: state.position.x,
                    y: state.position.y,
                    angle: state.angle,
                    kind: z.kind,
                    geometry: z.shape.geometry(),
                })
            })
            .collect();
        WorldSnapshot {
            tick,
            particles,
            colliders,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Largest accepted gravity multiplier magnitude.
pub const MAX_GRAVITY_SCALE: f32 = 100.0;

/// Largest accepted wind magnitude.
pub const MAX_WIND: f32 = 1.0e6;

/// Largest accepted time scale.
pub const MAX_TIME_SCALE: f32 = 10.0;

/// Largest accepted particle size.
pub const MAX_PARTICLE_SIZE: f32 = 1000.0;

/// Largest accepted magnet strength magnitude.
pub const MAX_MAGNET_STRENGTH: f32 = 1.0e6;

/// Largest accepted explosion power magnitude.
pub const MAX_EXPLOSION_POWER: f32 = 1.0e5;

/// Finite and no larger than `limit` in magnitude.
fn check_bounded(name: &'static str, value: f32, limit: f32) -> Result<(), WorldError> {
    if value.is_finite() && value.abs() <= limit {
        Ok(())
    } else {
        Err(WorldError::InvalidParameter { name, value })
    }
}

fn check_size(size: f32) -> Result<(), WorldError> {
    if size.is_finite() && size > 0.0 && size <= MAX_PARTICLE_SIZE {
        Ok(())
    } else {
        Err(WorldError::InvalidParameter {
            name: "particle size",
            value: size,
        })
    }
}

fn check_time_scale(scale: f32) -> Result<(), WorldError> {
    if scale.is_finite() && (0.0..=MAX_TIME_SCALE).contains(&scale) {
        Ok(())
    } else {
        Err(WorldError::InvalidParameter {
            name: "time scale",
            value: scale,
        })
    }
}

/// Validate a full parameter set.
pub fn check_parameters(params: &WorldParameters) -> Result<(), WorldError> {
    check_bounded("gravity scale", params.gravity_scale, MAX_GRAVITY_SCALE)?;
    check_bounded("wind", params.wind, MAX_WIND)?;
    check_time_scale(params.time_scale)?;
    check_size(params.particle_size)?;
    check_bounded("magnet strength", params.magnet_strength, MAX_MAGNET_STRENGTH)?;
    check_bounded("explosion power", params.explosion_power, MAX_EXPLOSION_POWER)?;
    if params.particle_color.trim().is_empty() {
        return Err(WorldError::EmptyParameter {
            name: "particle color",
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::body::{Category, CategoryPair};

    fn world() -> World {
        World::seeded(WorldParameters::default(), 42).unwrap()
    }

    #[test]
    fn new_world_has_only_boundaries() {
        let world = world();
        assert!(world.particles().is_empty());
        assert!(world.zones().is_empty());
        assert_eq!(world.boundaries().len(), 4);
        assert_eq!(world.backend().body_count(), 4);
    }

    #[test]
    fn spawn_uses_defaults() {
        let mut world = world();
        let id = world.spawn_particle(Vec2::new(100.0, 100.0), None, None, None).unwrap();
        let particle = world.particle(id).unwrap();
        assert_eq!(particle.kind, ParticleKind::Balls);
        assert!((particle.size - 5.0).abs() < f32::EPSILON);
        assert_eq!(particle.color, "#ff0000");
        assert_eq!(particle.category, Category::Particle);
    }

    #[test]
    fn invalid_spawn_leaves_world_unchanged() {
        let mut world = world();
        assert!(world.spawn_particle(Vec2::new(f32::NAN, 1.0), None, None, None).is_err());
        assert!(world.spawn_particle(Vec2::new(1.0, 1.0), None, Some(-2.0), None).is_err());
        assert!(world.spawn_zone(Vec2::new(1.0, f32::INFINITY), ZoneKind::Portal).is_err());
        assert!(world.particles().is_empty());
        assert!(world.zones().is_empty());
        assert_eq!(world.backend().body_count(), 4);
    }

    #[test]
    fn setters_validate() {
        let mut world = world();
        assert!(world.set_time_scale(-1.0).is_err());
        assert!(world.set_time_scale(f32::NAN).is_err());
        assert!(world.set_gravity(f32::INFINITY).is_err());
        assert!(world.set_particle_size(0.0).is_err());
        assert!(world.set_particle_color("  ".to_owned()).is_err());
        assert_eq!(world.parameters(), &WorldParameters::default());
    }

    #[test]
    fn setters_reject_values_whose_forces_overflow() {
        let mut world = world();
        assert!(world.set_gravity(1.0e38).is_err());
        assert!(world.set_gravity(-1.0e38).is_err());
        assert!(world.set_wind(f32::MAX).is_err());
        assert!(world.set_magnet_strength(1.0e30).is_err());
        assert!(world.set_explosion_power(-1.0e30).is_err());
        assert!(world.set_time_scale(1.0e9).is_err());
        assert!(world.set_particle_size(1.0e9).is_err());
        assert_eq!(world.parameters(), &WorldParameters::default());

        world.set_gravity(MAX_GRAVITY_SCALE).unwrap();
        world.set_magnet_strength(-MAX_MAGNET_STRENGTH).unwrap();
        assert!(forces::gravity(world.parameters().gravity_scale).is_finite());

        world.set_gravity(2.0).unwrap();
        world.set_particle_kind(ParticleKind::Sand);
        world.set_screen_shake(true);
        assert!((world.parameters().gravity_scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(world.parameters().particle_kind, ParticleKind::Sand);
        assert!(world.parameters().screen_shake);
    }

    #[test]
    fn frozen_world_does_not_advance() {
        let mut world = world();
        let id = world.spawn_particle(Vec2::new(600.0, 50.0), None, None, None).unwrap();
        world.set_time_scale(0.0).unwrap();
        let report = world.step(1.0 / 60.0).unwrap();
        assert!(!report.advanced);
        let state = world.body_state(id).unwrap();
        assert!((state.position.y - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stale_contact_is_a_no_op() {
        let mut world = world();
        let event = ContactEvent {
            pair: CategoryPair::new(Category::Particle, Category::Destroyer),
            first: EntityId::new(),
            second: EntityId::new(),
            phase: ContactPhase::Begin,
        };
        let report = world.apply_contacts(&[event]);
        assert_eq!(report.destroyed, 0);
        assert_eq!(report.contacts, 1);
    }

    #[test]
    fn snapshot_lists_particles_and_zones() {
        let mut world = world();
        world.spawn_particle(Vec2::new(100.0, 100.0), Some(ParticleKind::Metal), None, None).unwrap();
        world.spawn_zone(Vec2::new(300.0, 300.0), ZoneKind::Platform).unwrap();
        let snapshot = world.snapshot(7);
        assert_eq!(snapshot.tick, 7);
        assert_eq!(snapshot.particles.len(), 1);
        assert_eq!(snapshot.colliders.len(), 1);
        let particle = snapshot.particles.first().unwrap();
        assert_eq!(particle.color, crate::profile::METAL_COLOR);
        assert!((particle.x - 100.0).abs() < 1e-3);
    }
}
