//! World-side records for particles and zones.
//!
//! The backend owns position and velocity; these records hold what the
//! backend does not know about: kind, display color, nominal size, and the
//! shape used for snapshots.

use sandbox_types::{EntityId, ParticleKind, ZoneKind};

use crate::body::{Category, Shape};

/// A live particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Backend body key.
    pub id: EntityId,
    /// Material kind.
    pub kind: ParticleKind,
    /// Display color.
    pub color: String,
    /// Nominal size it was spawned with.
    pub size: f32,
    /// Shape as inserted into the backend.
    pub shape: Shape,
    /// Collision category; `Explosive` exactly when `kind` is explosive.
    pub category: Category,
}

/// A live interaction zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// Backend body key.
    pub id: EntityId,
    /// Role of the zone.
    pub kind: ZoneKind,
    /// Shape as inserted into the backend.
    pub shape: Shape,
    /// Collision category.
    pub category: Category,
}
