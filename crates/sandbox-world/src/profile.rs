//! Per-kind body tables for particles and zones.
//!
//! Every particle kind and zone kind maps to a fixed physical profile:
//! body type, mass, shape, material, sensor flag, and collision category.
//! Keeping the tables here means the world never branches on kind when
//! building bodies.

use glam::Vec2;
use rand::Rng;
use sandbox_types::{ParticleKind, ZoneKind};

use crate::body::{BodyKind, BodySpec, Category, Material, Shape};

/// Fixed color forced onto metal particles.
pub const METAL_COLOR: &str = "#C0C0C0";

/// Fixed color forced onto explosive particles.
pub const EXPLOSIVE_COLOR: &str = "#FF4500";

/// Hue range (degrees) plasma colors are drawn from.
pub const PLASMA_HUE_RANGE: std::ops::Range<u16> = 240..360;

// ---------------------------------------------------------------------------
// Particles
// ---------------------------------------------------------------------------

/// Physical profile of a particle of some kind and size.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleProfile {
    /// Body mass.
    pub mass: f32,
    /// Body shape.
    pub shape: Shape,
    /// Surface material.
    pub material: Material,
    /// Collision category.
    pub category: Category,
}

impl ParticleProfile {
    /// Look up the profile for `kind` at nominal `size`.
    pub fn for_kind(kind: ParticleKind, size: f32) -> Self {
        let (mass_scale, shape, material) = match kind {
            ParticleKind::Balls => (
                0.1,
                Shape::Circle { radius: size },
                Material::new(0.5, 0.8),
            ),
            ParticleKind::Sand => (0.2, Shape::square(size * 1.5), Material::new(0.9, 0.1)),
            ParticleKind::Water => (
                0.05,
                Shape::Circle { radius: size * 0.8 },
                Material::new(0.1, 0.1).with_damping(0.02),
            ),
            ParticleKind::Plasma => (
                0.05,
                Shape::Circle { radius: size },
                Material::new(0.01, 1.2),
            ),
            ParticleKind::Metal => (0.3, Shape::square(size * 2.0), Material::new(0.8, 0.3)),
            ParticleKind::Explosive => (
                0.1,
                Shape::Circle { radius: size },
                Material::new(0.5, 0.6),
            ),
        };
        let category = if kind == ParticleKind::Explosive {
            Category::Explosive
        } else {
            Category::Particle
        };
        Self {
            mass: size * mass_scale,
            shape,
            material,
            category,
        }
    }

    /// The body description for a particle centered at `position`.
    pub fn body_spec(&self, position: Vec2) -> BodySpec {
        BodySpec {
            kind: BodyKind::Dynamic { mass: self.mass },
            position,
            angular_velocity: 0.0,
            shape: self.shape.clone(),
            material: self.material,
            sensor: false,
            continuous: true,
            category: self.category,
        }
    }
}

/// Resolve the display color of a new particle.
///
/// Plasma gets a random violet-to-red hue, metal and explosive particles
/// get their fixed colors, and every other kind keeps `requested`.
pub fn particle_color<R: Rng + ?Sized>(kind: ParticleKind, requested: String, rng: &mut R) -> String {
    match kind {
        ParticleKind::Plasma => {
            let hue = rng.random_range(PLASMA_HUE_RANGE);
            format!("hsl({hue}, 100%, 70%)")
        }
        ParticleKind::Metal => METAL_COLOR.to_owned(),
        ParticleKind::Explosive => EXPLOSIVE_COLOR.to_owned(),
        ParticleKind::Balls | ParticleKind::Sand | ParticleKind::Water => requested,
    }
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// Physical profile of an interaction zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneProfile {
    /// Dynamic (with mass) or static.
    pub body: BodyKind,
    /// Initial angular velocity.
    pub angular_velocity: f32,
    /// Zone shape.
    pub shape: Shape,
    /// Surface material.
    pub material: Material,
    /// Whether the zone is a non-solid trigger region.
    pub sensor: bool,
    /// Collision category.
    pub category: Category,
}

impl ZoneProfile {
    /// Look up the profile for `kind`.
    pub fn for_kind(kind: ZoneKind) -> Self {
        match kind {
            ZoneKind::Platform => Self {
                body: BodyKind::Static,
                angular_velocity: 0.0,
                shape: Shape::rect(120.0, 20.0),
                material: Material::new(0.8, 0.3),
                sensor: false,
                category: Category::Default,
            },
            ZoneKind::Bouncer => Self {
                body: BodyKind::Dynamic { mass: 10.0 },
                angular_velocity: 0.0,
                shape: Shape::Circle { radius: 30.0 },
                material: Material::new(0.0, 1.8),
                sensor: false,
                category: Category::Default,
            },
            ZoneKind::Destroyer => Self {
                body: BodyKind::Static,
                angular_velocity: 0.0,
                shape: Shape::square(60.0),
                material: Material::default(),
                sensor: true,
                category: Category::Destroyer,
            },
            ZoneKind::Magnet => Self {
                body: BodyKind::Static,
                angular_velocity: 0.0,
                shape: Shape::Circle { radius: 40.0 },
                material: Material::default(),
                sensor: true,
                category: Category::Magnet,
            },
            ZoneKind::Portal => Self {
                body: BodyKind::Static,
                angular_velocity: 0.0,
                shape: Shape::Circle { radius: 35.0 },
                material: Material::default(),
                sensor: true,
                category: Category::Portal,
            },
            ZoneKind::Spinner => Self {
                body: BodyKind::Dynamic { mass: 20.0 },
                angular_velocity: 5.0,
                shape: Shape::rect(100.0, 20.0),
                material: Material::new(0.1, 0.5),
                sensor: false,
                category: Category::Default,
            },
        }
    }

    /// The body description for a zone centered at `position`.
    pub fn body_spec(&self, position: Vec2) -> BodySpec {
        BodySpec {
            kind: self.body,
            position,
            angular_velocity: self.angular_velocity,
            shape: self.shape.clone(),
            material: self.material,
            sensor: self.sensor,
            continuous: false,
            category: self.category,
        }
    }
}
