//! Shared type definitions for the particle sandbox.
//!
//! This crate is the single source of truth for every type that crosses
//! the transport boundary: what clients send (commands) and what they
//! receive (snapshots, parameters). Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for the browser renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for world entities
//! - [`enums`] -- Particle and zone kinds
//! - [`params`] -- Global world parameters and their defaults
//! - [`snapshot`] -- Per-tick world snapshot views
//! - [`commands`] -- Inbound command payloads and envelope decoding

pub mod commands;
pub mod enums;
pub mod ids;
pub mod params;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use commands::{
    ColorValue, Command, CommandEnvelope, CommandParseError, ExplosionAt, FlagValue, KindValue,
    ScalarValue, SizeValue, SpawnParticle, SpawnZone,
};
pub use enums::{ParticleKind, ZoneKind};
pub use ids::EntityId;
pub use params::WorldParameters;
pub use snapshot::{ColliderView, Geometry, ParticleView, WorldSnapshot};
