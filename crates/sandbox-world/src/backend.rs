//! The seam between world semantics and the rigid-body solver.
//!
//! [`PhysicsBackend`] is the only interface the [`World`](crate::World)
//! uses to move bodies. It owns integration, contact resolution, and
//! collision detection; everything about particle kinds, zones, and
//! contact effects stays on the world side.
//!
//! # Contact reporting
//!
//! The world registers the category pairs it cares about with
//! [`PhysicsBackend::register_contact_pair`]. After each step the backend
//! returns one [`ContactEvent`] per registered pair that a new or ending
//! contact matches, in each orientation that matches. The `first` body of
//! an event always belongs to the pair's `first` category.
//!
//! # Failure
//!
//! A failed [`PhysicsBackend::step`] leaves every body exactly where it was
//! before the call and drops accumulated forces.

use glam::Vec2;
use sandbox_types::EntityId;

use crate::body::{BodySpec, BodyState, CategoryPair};

/// Errors raised by a physics backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A body description could not be turned into solver geometry.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// What was wrong with the input.
        reason: String,
    },

    /// The step duration was zero, negative, or not finite.
    #[error("invalid timestep: {dt}")]
    InvalidTimestep {
        /// The rejected duration in seconds.
        dt: f32,
    },

    /// An entity ID was inserted twice.
    #[error("body {id} already exists")]
    DuplicateBody {
        /// The conflicting entity.
        id: EntityId,
    },

    /// The solver produced a non-finite pose or velocity.
    #[error("solver diverged on body {id}")]
    Diverged {
        /// First body found in a non-finite state.
        id: EntityId,
    },
}

/// Whether a contact began or ended during the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The two shapes started touching or overlapping.
    Begin,
    /// The two shapes stopped touching or overlapping.
    End,
}

/// A contact between two bodies that matched a registered category pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    /// The registered pair this contact matched.
    pub pair: CategoryPair,
    /// Body whose category equals `pair.first`.
    pub first: EntityId,
    /// The other body.
    pub second: EntityId,
    /// Begin or end of the contact.
    pub phase: ContactPhase,
}

/// Rigid-body solver driven by the world.
///
/// Implementations must be deterministic for identical call sequences.
pub trait PhysicsBackend: Send {
    /// Create a body with its single shape under `id`.
    ///
    /// On error nothing is inserted.
    fn insert(&mut self, id: EntityId, spec: &BodySpec) -> Result<(), BackendError>;

    /// Remove a body and its shape. Returns `false` if `id` was unknown.
    fn remove(&mut self, id: EntityId) -> bool;

    /// Whether `id` is a live body.
    fn contains(&self, id: EntityId) -> bool;

    /// Current kinematic state of `id`.
    fn body_state(&self, id: EntityId) -> Option<BodyState>;

    /// Move a body's center to `position` without changing its velocity.
    fn set_position(&mut self, id: EntityId, position: Vec2) -> bool;

    /// Add a force at the center of mass for the next step only.
    fn apply_force(&mut self, id: EntityId, force: Vec2) -> bool;

    /// Apply an instantaneous impulse at the center of mass.
    fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) -> bool;

    /// Replace the global gravity vector.
    fn set_gravity(&mut self, gravity: Vec2);

    /// Start reporting contacts that match `pair`.
    fn register_contact_pair(&mut self, pair: CategoryPair);

    /// Advance the simulation by `dt` seconds.
    ///
    /// Forces added since the previous step are consumed and cleared.
    fn step(&mut self, dt: f32) -> Result<Vec<ContactEvent>, BackendError>;

    /// Number of live bodies.
    fn body_count(&self) -> usize;
}
