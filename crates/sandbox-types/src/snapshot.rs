//! Point-in-time world state emitted once per tick.
//!
//! A [`WorldSnapshot`] is what the transport pushes to every observer. The
//! list order follows the world's internal insertion order, which is not
//! stable across removals.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ParticleKind, ZoneKind};

/// Geometry of a body as seen by the renderer.
///
/// Serialized with a `shape` tag of `"circle"` or `"poly"`. Polygon
/// vertices are body-local (relative to `x`/`y`, unrotated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "shape", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Geometry {
    /// A circle centered on the body.
    Circle {
        /// Circle radius.
        radius: f32,
    },
    /// A convex polygon in body-local coordinates.
    Poly {
        /// Ordered `[x, y]` vertex list.
        vertices: Vec<[f32; 2]>,
    },
}

/// One particle in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ParticleView {
    /// World x coordinate of the body's center.
    pub x: f32,
    /// World y coordinate of the body's center.
    pub y: f32,
    /// Body orientation in radians.
    pub angle: f32,
    /// Material of the particle.
    pub kind: ParticleKind,
    /// Display color (hex or HSL string).
    pub color: String,
    /// Nominal size the particle was spawned with.
    pub size: f32,
    /// Shape of the particle.
    #[serde(flatten)]
    #[ts(flatten)]
    pub geometry: Geometry,
}

/// One interaction zone in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ColliderView {
    /// World x coordinate of the body's center.
    pub x: f32,
    /// World y coordinate of the body's center.
    pub y: f32,
    /// Body orientation in radians.
    pub angle: f32,
    /// Role of the zone.
    pub kind: ZoneKind,
    /// Shape of the zone.
    #[serde(flatten)]
    #[ts(flatten)]
    pub geometry: Geometry,
}

/// Consistent view of every particle and zone after a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Tick number the snapshot was taken after (0 before the first tick).
    pub tick: u64,
    /// All live particles, in insertion order.
    pub particles: Vec<ParticleView>,
    /// All live zones, in insertion order.
    pub colliders: Vec<ColliderView>,
}
