//! [`PhysicsBackend`] implementation on top of `rapier2d`.
//!
//! Every entity maps to exactly one rigid body with exactly one collider.
//! Both carry the entity's UUID as `user_data`, so collision events can be
//! resolved back to entities without an extra lookup table.
//!
//! Friction and restitution combine multiplicatively. Dynamic bodies get
//! the explicit mass from their [`BodySpec`]; the moment of inertia follows
//! from the shape.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use glam::Vec2;
use rapier2d::prelude::*;
use sandbox_types::EntityId;
use tracing::{trace, warn};

use crate::backend::{BackendError, ContactEvent, ContactPhase, PhysicsBackend};
use crate::body::{BodyKind, BodySpec, BodyState, Category, CategoryPair, Shape};

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Event collection
// ---------------------------------------------------------------------------

#[derive(Default)]
struct EventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl EventCollector {
    fn drain(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for EventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Entry {
    body: RigidBodyHandle,
    category: Category,
}

/// Pose and velocity of one dynamic body captured before a step.
struct Checkpoint {
    body: RigidBodyHandle,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    angvel: Real,
}

/// Rapier-backed rigid-body solver.
pub struct RapierBackend {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    collector: EventCollector,
    entries: BTreeMap<EntityId, Entry>,
    watched: Vec<CategoryPair>,
}

impl RapierBackend {
    /// Create an empty solver with zero gravity.
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collector: EventCollector::default(),
            entries: BTreeMap::new(),
            watched: Vec::new(),
        }
    }

    fn build_collider(id: EntityId, spec: &BodySpec) -> Result<Collider, BackendError> {
        let builder = match &spec.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(*radius),
            Shape::Polygon { vertices } => {
                let points: Vec<Point<Real>> = vertices.iter().map(|v| point![v.x, v.y]).collect();
                ColliderBuilder::convex_hull(&points).ok_or_else(|| {
                    BackendError::InvalidGeometry {
                        reason: "polygon is degenerate or not convex".to_owned(),
                    }
                })?
            }
        };

        let mut builder = builder
            .friction(spec.material.friction)
            .restitution(spec.material.elasticity)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .sensor(spec.sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(id.as_u128());

        if let BodyKind::Dynamic { mass } = spec.kind {
            builder = builder.mass(mass);
        }

        Ok(builder.build())
    }

    fn entity_of(&self, collider: ColliderHandle) -> Option<EntityId> {
        self.colliders
            .get(collider)
            .map(|c| EntityId::from_u128(c.user_data))
    }

    fn category_of(&self, id: EntityId) -> Option<Category> {
        self.entries.get(&id).map(|entry| entry.category)
    }

    fn checkpoint(&self) -> Vec<Checkpoint> {
        self.bodies
            .iter()
            .filter(|(_, rb)| rb.is_dynamic())
            .map(|(handle, rb)| Checkpoint {
                body: handle,
                position: *rb.position(),
                linvel: *rb.linvel(),
                angvel: rb.angvel(),
            })
            .collect()
    }

    fn restore(&mut self, checkpoint: &[Checkpoint]) {
        for saved in checkpoint {
            if let Some(rb) = self.bodies.get_mut(saved.body) {
                rb.set_position(saved.position, true);
                rb.set_linvel(saved.linvel, true);
                rb.set_angvel(saved.angvel, true);
                rb.reset_forces(false);
            }
        }
    }

    fn clear_forces(&mut self) {
        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
        }
    }

    fn first_diverged(&self) -> Option<EntityId> {
        self.bodies
            .iter()
            .find(|(_, rb)| {
                let pose_ok = rb.translation().iter().all(|c| c.is_finite())
                    && rb.rotation().angle().is_finite();
                let velocity_ok =
                    rb.linvel().iter().all(|c| c.is_finite()) && rb.angvel().is_finite();
                !(pose_ok && velocity_ok)
            })
            .map(|(_, rb)| EntityId::from_u128(rb.user_data))
    }

    fn translate(&self, raw: Vec<CollisionEvent>) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        for event in raw {
            let (h1, h2, phase) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, ContactPhase::Begin),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, ContactPhase::End),
            };
            // Colliders removed since the contact began no longer resolve.
            let (Some(a), Some(b)) = (self.entity_of(h1), self.entity_of(h2)) else {
                continue;
            };
            let (Some(cat_a), Some(cat_b)) = (self.category_of(a), self.category_of(b)) else {
                continue;
            };
            for pair in &self.watched {
                if pair.matches(cat_a, cat_b) {
                    events.push(ContactEvent {
                        pair: *pair,
                        first: a,
                        second: b,
                        phase,
                    });
                }
                if pair.matches(cat_b, cat_a) {
                    events.push(ContactEvent {
                        pair: *pair,
                        first: b,
                        second: a,
                        phase,
                    });
                }
            }
        }
        events
    }
}

impl Default for RapierBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RapierBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RapierBackend")
            .field("gravity", &to_vec2(&self.gravity))
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("watched", &self.watched)
            .finish_non_exhaustive()
    }
}

impl PhysicsBackend for RapierBackend {
    fn insert(&mut self, id: EntityId, spec: &BodySpec) -> Result<(), BackendError> {
        spec.validate()?;
        if self.entries.contains_key(&id) {
            return Err(BackendError::DuplicateBody { id });
        }

        // Built first so a geometry failure leaves no orphan body behind.
        let collider = Self::build_collider(id, spec)?;

        let builder = match spec.kind {
            BodyKind::Dynamic { .. } => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .translation(to_vector(spec.position))
            .angvel(spec.angular_velocity)
            .linear_damping(spec.material.linear_damping)
            .ccd_enabled(spec.continuous)
            .user_data(id.as_u128())
            .build();

        let body_handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        if let Some(rb) = self.bodies.get_mut(body_handle) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }

        self.entries.insert(
            id,
            Entry {
                body: body_handle,
                category: spec.category,
            },
        );
        trace!(%id, category = ?spec.category, "body inserted");
        Ok(())
    }

    fn remove(&mut self, id: EntityId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        self.bodies
            .remove(
                entry.body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    fn body_state(&self, id: EntityId) -> Option<BodyState> {
        let entry = self.entries.get(&id)?;
        let rb = self.bodies.get(entry.body)?;
        Some(BodyState {
            position: to_vec2(rb.translation()),
            angle: rb.rotation().angle(),
            linear_velocity: to_vec2(rb.linvel()),
            angular_velocity: rb.angvel(),
            mass: rb.mass(),
        })
    }

    fn set_position(&mut self, id: EntityId, position: Vec2) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };
        let Some(rb) = self.bodies.get_mut(entry.body) else {
            return false;
        };
        rb.set_translation(to_vector(position), true);
        true
    }

    fn apply_force(&mut self, id: EntityId, force: Vec2) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };
        let Some(rb) = self.bodies.get_mut(entry.body) else {
            return false;
        };
        rb.add_force(to_vector(force), true);
        true
    }

    fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };
        let Some(rb) = self.bodies.get_mut(entry.body) else {
            return false;
        };
        rb.apply_impulse(to_vector(impulse), true);
        true
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_vector(gravity);
    }

    fn register_contact_pair(&mut self, pair: CategoryPair) {
        if !self.watched.contains(&pair) {
            self.watched.push(pair);
        }
    }

    fn step(&mut self, dt: f32) -> Result<Vec<ContactEvent>, BackendError> {
        if !dt.is_finite() || dt <= 0.0 {
            self.clear_forces();
            return Err(BackendError::InvalidTimestep { dt });
        }

        let checkpoint = self.checkpoint();
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.collector,
        );

        self.clear_forces();

        if let Some(id) = self.first_diverged() {
            warn!(%id, dt, "solver diverged, restoring pre-step state");
            self.restore(&checkpoint);
            self.collector.drain();
            return Err(BackendError::Diverged { id });
        }

        let raw = self.collector.drain();
        Ok(self.translate(raw))
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }
}
