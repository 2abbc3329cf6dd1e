//! Physical world for the particle sandbox.
//!
//! This crate owns everything that happens to bodies: the shape and
//! material model, the per-kind profiles, the arena walls, the force laws,
//! the contact rules, and the [`World`] that ties them together over a
//! [`PhysicsBackend`].
//!
//! # Modules
//!
//! - [`arena`] -- Fixed 1200x700 arena and its four walls
//! - [`backend`] -- The solver seam: [`PhysicsBackend`] and contact events
//! - [`body`] -- Shapes, materials, categories, and body descriptions
//! - [`effects`] -- Category-pair dispatch table for contact rules
//! - [`entity`] -- World-side particle and zone records
//! - [`error`] -- [`WorldError`]
//! - [`forces`] -- Wind, magnet, explosion, and gravity laws
//! - [`profile`] -- Per-kind particle and zone profiles
//! - [`rapier`] -- [`RapierBackend`], the default solver
//! - [`world`] -- The [`World`] itself

pub mod arena;
pub mod backend;
pub mod body;
pub mod effects;
pub mod entity;
pub mod error;
pub mod forces;
pub mod profile;
pub mod rapier;
pub mod world;

pub use arena::Boundary;
pub use backend::{BackendError, ContactEvent, ContactPhase, PhysicsBackend};
pub use body::{BodyKind, BodySpec, BodyState, Category, CategoryFilter, CategoryPair, Material, Shape};
pub use effects::ContactRule;
pub use entity::{Particle, Zone};
pub use error::WorldError;
pub use glam::Vec2;
pub use profile::{ParticleProfile, ZoneProfile};
pub use rapier::RapierBackend;
pub use world::{
    ClearReport, MAX_EXPLOSION_POWER, MAX_GRAVITY_SCALE, MAX_MAGNET_STRENGTH, MAX_PARTICLE_SIZE,
    MAX_TIME_SCALE, MAX_WIND, StepReport, World, check_parameters,
};
