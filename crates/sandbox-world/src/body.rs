//! Passive body model: shapes, materials, collision categories, and the
//! description handed to the physics backend when a body is created.
//!
//! Nothing here talks to a solver. A [`BodySpec`] is a complete, validated
//! description of one body plus its single shape; the backend turns it
//! into whatever internal representation it uses.

use glam::Vec2;
use sandbox_types::Geometry;
use serde::{Deserialize, Serialize};

use crate::backend::BackendError;

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Geometry attached to exactly one body, in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A circle centered on the body.
    Circle {
        /// Circle radius.
        radius: f32,
    },
    /// A convex polygon with an ordered vertex list.
    Polygon {
        /// Vertices relative to the body's center of mass.
        vertices: Vec<Vec2>,
    },
}

impl Shape {
    /// Build an axis-aligned box of the given full width and height.
    ///
    /// Vertices are listed as `(hw, -hh)`, `(hw, hh)`, `(-hw, hh)`,
    /// `(-hw, -hh)`.
    pub fn rect(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::Polygon {
            vertices: vec![
                Vec2::new(hw, -hh),
                Vec2::new(hw, hh),
                Vec2::new(-hw, hh),
                Vec2::new(-hw, -hh),
            ],
        }
    }

    /// Build a square box with the given side length.
    pub fn square(side: f32) -> Self {
        Self::rect(side, side)
    }

    /// Check the shape can be handed to a solver.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidGeometry`] for a non-finite or
    /// non-positive radius, a polygon with fewer than three vertices, or a
    /// non-finite vertex.
    pub fn validate(&self) -> Result<(), BackendError> {
        match self {
            Self::Circle { radius } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(BackendError::InvalidGeometry {
                        reason: format!("circle radius must be finite and positive, got {radius}"),
                    });
                }
            }
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(BackendError::InvalidGeometry {
                        reason: format!("polygon needs at least 3 vertices, got {}", vertices.len()),
                    });
                }
                if !vertices.iter().all(|v| v.is_finite()) {
                    return Err(BackendError::InvalidGeometry {
                        reason: "polygon vertex is not finite".to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The wire geometry emitted in snapshots.
    pub fn geometry(&self) -> Geometry {
        match self {
            Self::Circle { radius } => Geometry::Circle { radius: *radius },
            Self::Polygon { vertices } => Geometry::Poly {
                vertices: vertices.iter().map(|v| [v.x, v.y]).collect(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Material
// ---------------------------------------------------------------------------

/// Per-shape surface properties.
///
/// Friction and elasticity combine multiplicatively between two touching
/// shapes, so a zero on either side cancels the effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Friction coefficient.
    pub friction: f32,
    /// Restitution coefficient; values above 1 add energy.
    pub elasticity: f32,
    /// Linear velocity damping applied to the owning body.
    pub linear_damping: f32,
}

impl Material {
    /// Material with the given friction and elasticity and no damping.
    pub const fn new(friction: f32, elasticity: f32) -> Self {
        Self {
            friction,
            elasticity,
            linear_damping: 0.0,
        }
    }

    /// Return a copy with the given linear damping.
    #[must_use]
    pub const fn with_damping(mut self, linear_damping: f32) -> Self {
        self.linear_damping = linear_damping;
        self
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Tag used to select which collision-effect rule applies to a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Boundaries and solid zones (platform, bouncer, spinner).
    Default,
    /// Every non-explosive particle.
    Particle,
    /// Explosive particles.
    Explosive,
    /// Destroyer zones.
    Destroyer,
    /// Portal zones.
    Portal,
    /// Magnet zones.
    Magnet,
}

/// Right-hand side of a [`CategoryPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Matches exactly one category.
    Is(Category),
    /// Matches every category.
    Any,
}

impl CategoryFilter {
    /// Whether `category` passes this filter.
    pub fn accepts(self, category: Category) -> bool {
        match self {
            Self::Is(expected) => expected == category,
            Self::Any => true,
        }
    }
}

/// An ordered pair of categories a contact rule is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryPair {
    /// Category of the first body in a matching contact.
    pub first: Category,
    /// Filter for the second body.
    pub second: CategoryFilter,
}

impl CategoryPair {
    /// Pair matching exactly `first` against exactly `second`.
    pub const fn new(first: Category, second: Category) -> Self {
        Self {
            first,
            second: CategoryFilter::Is(second),
        }
    }

    /// Pair matching `first` against any category.
    pub const fn with_any(first: Category) -> Self {
        Self {
            first,
            second: CategoryFilter::Any,
        }
    }

    /// Whether a contact between `a` (first) and `b` (second) matches.
    pub fn matches(self, a: Category, b: Category) -> bool {
        self.first == a && self.second.accepts(b)
    }
}

// ---------------------------------------------------------------------------
// Body description and state
// ---------------------------------------------------------------------------

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Moved by the integrator; the mass is explicit and the moment of
    /// inertia is derived from the shape.
    Dynamic {
        /// Total mass of the body.
        mass: f32,
    },
    /// Never moves; infinite mass and moment.
    Static,
}

/// Everything the backend needs to create one body and its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    /// Dynamic or static.
    pub kind: BodyKind,
    /// Initial world position of the center of mass.
    pub position: Vec2,
    /// Initial angular velocity in rad/s.
    pub angular_velocity: f32,
    /// The body's single shape.
    pub shape: Shape,
    /// Surface properties of the shape.
    pub material: Material,
    /// Sensor shapes report overlap but exert no contact force.
    pub sensor: bool,
    /// Continuous collision detection for fast movers.
    pub continuous: bool,
    /// Collision-effect category of the shape.
    pub category: Category,
}

impl BodySpec {
    /// Check every numeric input is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidGeometry`] for a non-finite position
    /// or velocity, a non-positive or non-finite dynamic mass, or an
    /// invalid shape.
    pub fn validate(&self) -> Result<(), BackendError> {
        if !self.position.is_finite() {
            return Err(BackendError::InvalidGeometry {
                reason: format!("position is not finite: {}", self.position),
            });
        }
        if !self.angular_velocity.is_finite() {
            return Err(BackendError::InvalidGeometry {
                reason: "angular velocity is not finite".to_owned(),
            });
        }
        if let BodyKind::Dynamic { mass } = self.kind {
            if !mass.is_finite() || mass <= 0.0 {
                return Err(BackendError::InvalidGeometry {
                    reason: format!("dynamic mass must be finite and positive, got {mass}"),
                });
            }
        }
        self.shape.validate()
    }
}

/// Kinematic state of a body as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// World position of the center of mass.
    pub position: Vec2,
    /// Orientation in radians.
    pub angle: f32,
    /// Linear velocity.
    pub linear_velocity: Vec2,
    /// Angular velocity in rad/s.
    pub angular_velocity: f32,
    /// Total mass (zero for static bodies).
    pub mass: f32,
}
