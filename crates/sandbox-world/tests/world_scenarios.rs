//! End-to-end world behavior on the rapier backend: spawning, contact
//! rules, explosions, magnets, clearing, and a free-fall scenario.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use sandbox_types::{ParticleKind, WorldParameters, ZoneKind};
use sandbox_world::{
    BackendError, BodySpec, BodyState, CategoryPair, Category, ContactEvent, ParticleProfile,
    PhysicsBackend, RapierBackend, Shape, Vec2, World, WorldError,
};

const DT: f32 = 1.0 / 60.0;

fn weightless() -> World {
    let params = WorldParameters {
        gravity_scale: 0.0,
        ..WorldParameters::default()
    };
    World::seeded(params, 9).unwrap()
}

#[test]
fn spawn_profile_is_deterministic() {
    let mut world = weightless();
    for kind in ParticleKind::ALL {
        let a = world.spawn_particle(Vec2::new(200.0, 200.0), Some(kind), Some(6.0), None).unwrap();
        let b = world.spawn_particle(Vec2::new(800.0, 200.0), Some(kind), Some(6.0), None).unwrap();
        let (pa, pb) = (world.particle(a).unwrap(), world.particle(b).unwrap());
        assert_eq!(pa.shape, pb.shape, "{kind}");
        let (ma, mb) = (
            world.body_state(a).unwrap().mass,
            world.body_state(b).unwrap().mass,
        );
        assert!((ma - mb).abs() < 1e-6, "{kind}");

        let profile = ParticleProfile::for_kind(kind, 6.0);
        assert_eq!(pa.shape, profile.shape, "{kind}");
        assert_eq!(profile.material, ParticleProfile::for_kind(kind, 6.0).material, "{kind}");
        assert_eq!(profile.material, ParticleProfile::for_kind(kind, 12.0).material, "{kind}");
        world.clear();
    }
}

#[test]
fn particle_falls_through_magnet_zone() {
    let mut world = World::seeded(WorldParameters::default(), 9).unwrap();
    world.spawn_zone(Vec2::new(600.0, 300.0), ZoneKind::Magnet).unwrap();
    let id = world.spawn_particle(Vec2::new(600.0, 200.0), None, None, None).unwrap();

    for _ in 0..40 {
        world.step(DT).unwrap();
    }

    let state = world.body_state(id).unwrap();
    assert!(state.position.y > 350.0, "stopped at y = {}", state.position.y);
    assert!(state.linear_velocity.y > 0.0);
}

#[test]
fn category_matches_kind_for_every_particle() {
    let mut world = weightless();
    for (i, kind) in ParticleKind::ALL.into_iter().enumerate() {
        let x = 100.0 + 150.0 * f32::from(u8::try_from(i).unwrap());
        world.spawn_particle(Vec2::new(x, 300.0), Some(kind), None, None).unwrap();
    }
    for particle in world.particles() {
        let explosive = particle.kind == ParticleKind::Explosive;
        assert_eq!(particle.category == Category::Explosive, explosive);
        assert_eq!(particle.category == Category::Particle, !explosive);
    }
}

#[test]
fn destroyer_removes_particle_exactly_once() {
    let mut world = weightless();
    world.spawn_zone(Vec2::new(600.0, 350.0), ZoneKind::Destroyer).unwrap();
    let id = world.spawn_particle(Vec2::new(600.0, 350.0), None, None, None).unwrap();

    let report = world.step(DT).unwrap();
    assert_eq!(report.destroyed, 1);
    assert!(!world.contains_particle(id));
    assert!(world.body_state(id).is_none());

    let again = world.step(DT).unwrap();
    assert_eq!(again.destroyed, 0);

    let replay = ContactEvent {
        pair: CategoryPair::new(Category::Particle, Category::Destroyer),
        first: id,
        second: world.zones().first().unwrap().id,
        phase: sandbox_world::ContactPhase::Begin,
    };
    assert_eq!(world.apply_contacts(&[replay, replay]).destroyed, 0);
}

#[test]
fn single_portal_never_teleports() {
    let mut world = weightless();
    world.spawn_zone(Vec2::new(300.0, 300.0), ZoneKind::Portal).unwrap();
    let id = world.spawn_particle(Vec2::new(300.0, 300.0), None, None, None).unwrap();
    for _ in 0..5 {
        assert_eq!(world.step(DT).unwrap().teleported, 0);
    }
    let position = world.body_state(id).unwrap().position;
    assert!((position - Vec2::new(300.0, 300.0)).length() < 1e-3);
}

#[test]
fn second_portal_receives_the_particle() {
    let mut world = weightless();
    world.spawn_zone(Vec2::new(300.0, 300.0), ZoneKind::Portal).unwrap();
    world.spawn_zone(Vec2::new(900.0, 300.0), ZoneKind::Portal).unwrap();
    let id = world.spawn_particle(Vec2::new(300.0, 300.0), None, None, None).unwrap();

    let report = world.step(DT).unwrap();
    assert_eq!(report.teleported, 1);
    let position = world.body_state(id).unwrap().position;
    assert!((position - Vec2::new(900.0, 300.0)).length() < 1e-3);
}

#[test]
fn explosion_only_reaches_particles_inside_radius() {
    let mut world = weightless();
    let center = Vec2::new(600.0, 350.0);
    let near = world.spawn_particle(center + Vec2::new(50.0, 0.0), None, None, None).unwrap();
    let edge = world.spawn_particle(center + Vec2::new(0.0, 99.0), None, None, None).unwrap();
    let outside = world.spawn_particle(center + Vec2::new(-100.5, 0.0), None, None, None).unwrap();
    let far = world.spawn_particle(center + Vec2::new(0.0, -250.0), None, None, None).unwrap();

    let affected = world.trigger_explosion(center).unwrap();
    assert_eq!(affected, 2);

    let speed = |w: &World, id| w.body_state(id).unwrap().linear_velocity.length();
    assert!(speed(&world, near) > 0.0);
    assert!(speed(&world, edge) > 0.0);
    assert!(speed(&world, outside) < f32::EPSILON);
    assert!(speed(&world, far) < f32::EPSILON);

    // Pushed outward.
    assert!(world.body_state(near).unwrap().linear_velocity.x > 0.0);
}

#[test]
fn explosion_with_nothing_in_range_is_a_no_op() {
    let mut world = weightless();
    world.spawn_particle(Vec2::new(100.0, 100.0), None, None, None).unwrap();
    assert_eq!(world.trigger_explosion(Vec2::new(900.0, 500.0)).unwrap(), 0);
    assert!(world.trigger_explosion(Vec2::new(f32::NAN, 0.0)).is_err());
}

#[test]
fn explosive_detonates_on_contact() {
    let mut world = weightless();
    world.spawn_zone(Vec2::new(600.0, 350.0), ZoneKind::Platform).unwrap();
    let bystander = world.spawn_particle(Vec2::new(600.0, 300.0), None, None, None).unwrap();
    let bomb = world
        .spawn_particle(Vec2::new(600.0, 336.0), Some(ParticleKind::Explosive), None, None)
        .unwrap();

    let report = world.step(DT).unwrap();
    assert_eq!(report.detonated, 1);
    assert!(!world.contains_particle(bomb));
    assert!(world.contains_particle(bystander));
    assert!(world.body_state(bystander).unwrap().linear_velocity.y < 0.0);
}

#[test]
fn magnet_pulls_only_within_range() {
    let params = WorldParameters {
        gravity_scale: 0.0,
        magnet_strength: 50_000.0,
        ..WorldParameters::default()
    };
    let mut world = World::seeded(params, 3).unwrap();
    world.spawn_zone(Vec2::new(600.0, 350.0), ZoneKind::Magnet).unwrap();
    let near = world.spawn_particle(Vec2::new(700.0, 350.0), None, None, None).unwrap();
    let far = world.spawn_particle(Vec2::new(900.0, 350.0), None, None, None).unwrap();

    world.step(DT).unwrap();
    assert!(world.body_state(near).unwrap().linear_velocity.x < 0.0);
    assert!(world.body_state(far).unwrap().linear_velocity.length() < f32::EPSILON);
}

#[test]
fn wind_pushes_every_particle_sideways() {
    let params = WorldParameters {
        gravity_scale: 0.0,
        wind: 100.0,
        ..WorldParameters::default()
    };
    let mut world = World::seeded(params, 3).unwrap();
    let a = world.spawn_particle(Vec2::new(300.0, 200.0), None, None, None).unwrap();
    let b = world
        .spawn_particle(Vec2::new(700.0, 200.0), Some(ParticleKind::Metal), None, None)
        .unwrap();
    world.step(DT).unwrap();
    for id in [a, b] {
        let v = world.body_state(id).unwrap().linear_velocity;
        assert!(v.x > 0.0);
        assert!(v.y.abs() < 1e-6);
    }
}

#[test]
fn clear_keeps_boundaries() {
    let mut world = weightless();
    world.spawn_particle(Vec2::new(100.0, 100.0), None, None, None).unwrap();
    world.spawn_particle(Vec2::new(200.0, 100.0), Some(ParticleKind::Water), None, None).unwrap();
    world.spawn_zone(Vec2::new(500.0, 500.0), ZoneKind::Spinner).unwrap();

    let report = world.clear();
    assert_eq!(report.particles, 2);
    assert_eq!(report.zones, 1);
    assert!(world.particles().is_empty());
    assert!(world.zones().is_empty());
    assert_eq!(world.boundaries().len(), 4);
    for (id, _) in world.boundaries() {
        assert!(world.body_state(*id).is_some());
    }
    assert_eq!(world.backend().body_count(), 4);
}

#[test]
fn falling_ball_speeds_up_then_loses_energy_on_the_ground() {
    let mut world = World::seeded(WorldParameters::default(), 1).unwrap();
    let id = world
        .spawn_particle(Vec2::new(600.0, 50.0), Some(ParticleKind::Balls), None, None)
        .unwrap();

    let mut previous = world.body_state(id).unwrap();
    let mut peak_fall_speed = 0.0_f32;
    let mut landed = false;
    for _ in 0..300 {
        world.step(DT).unwrap();
        let state = world.body_state(id).unwrap();
        if state.linear_velocity.y > previous.linear_velocity.y {
            assert!(state.position.y > previous.position.y);
            peak_fall_speed = peak_fall_speed.max(state.linear_velocity.y);
            previous = state;
        } else {
            assert!(state.linear_velocity.y.abs() < peak_fall_speed);
            landed = true;
            break;
        }
    }
    assert!(landed);
    assert!(peak_fall_speed > 0.0);
}

#[test]
fn seeded_worlds_evolve_identically() {
    let run = || {
        let mut world = World::seeded(WorldParameters::default(), 77).unwrap();
        world.spawn_zone(Vec2::new(600.0, 500.0), ZoneKind::Platform).unwrap();
        world.spawn_particle(Vec2::new(590.0, 100.0), Some(ParticleKind::Plasma), None, None).unwrap();
        world.spawn_particle(Vec2::new(610.0, 80.0), Some(ParticleKind::Sand), None, None).unwrap();
        for _ in 0..60 {
            world.step(DT).unwrap();
        }
        world.snapshot(60)
    };
    assert_eq!(run(), run());
}

// ---------------------------------------------------------------------------
// Backend failure
// ---------------------------------------------------------------------------

/// Rapier backend whose step always fails once armed.
struct FailingBackend {
    inner: RapierBackend,
    armed: bool,
}

impl PhysicsBackend for FailingBackend {
    fn insert(&mut self, id: sandbox_types::EntityId, spec: &BodySpec) -> Result<(), BackendError> {
        self.inner.insert(id, spec)
    }
    fn remove(&mut self, id: sandbox_types::EntityId) -> bool {
        self.inner.remove(id)
    }
    fn contains(&self, id: sandbox_types::EntityId) -> bool {
        self.inner.contains(id)
    }
    fn body_state(&self, id: sandbox_types::EntityId) -> Option<BodyState> {
        self.inner.body_state(id)
    }
    fn set_position(&mut self, id: sandbox_types::EntityId, position: Vec2) -> bool {
        self.inner.set_position(id, position)
    }
    fn apply_force(&mut self, id: sandbox_types::EntityId, force: Vec2) -> bool {
        self.inner.apply_force(id, force)
    }
    fn apply_impulse(&mut self, id: sandbox_types::EntityId, impulse: Vec2) -> bool {
        self.inner.apply_impulse(id, impulse)
    }
    fn set_gravity(&mut self, gravity: Vec2) {
        self.inner.set_gravity(gravity);
    }
    fn register_contact_pair(&mut self, pair: CategoryPair) {
        self.inner.register_contact_pair(pair);
    }
    fn step(&mut self, dt: f32) -> Result<Vec<ContactEvent>, BackendError> {
        if self.armed {
            return Err(BackendError::InvalidTimestep { dt });
        }
        self.inner.step(dt)
    }
    fn body_count(&self) -> usize {
        self.inner.body_count()
    }
}

#[test]
fn backend_failure_is_surfaced_and_world_is_untouched() {
    let backend = FailingBackend {
        inner: RapierBackend::new(),
        armed: true,
    };
    let mut world =
        World::with_backend(backend, WorldParameters::default(), StdRng::seed_from_u64(5)).unwrap();
    let id = world.spawn_particle(Vec2::new(600.0, 50.0), None, None, None).unwrap();

    let err = world.step(DT).unwrap_err();
    assert!(matches!(err, WorldError::Backend { .. }));
    let state = world.body_state(id).unwrap();
    assert!((state.position.y - 50.0).abs() < f32::EPSILON);
    assert!(world.contains_particle(id));
}

#[test]
fn degenerate_polygon_is_rejected_by_backend() {
    let mut backend = RapierBackend::new();
    let spec = BodySpec {
        kind: sandbox_world::BodyKind::Static,
        position: Vec2::ZERO,
        angular_velocity: 0.0,
        shape: Shape::Polygon {
            vertices: vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)],
        },
        material: sandbox_world::Material::default(),
        sensor: false,
        continuous: false,
        category: Category::Default,
    };
    assert!(backend.insert(sandbox_types::EntityId::new(), &spec).is_err());
    assert_eq!(backend.body_count(), 0);
}
