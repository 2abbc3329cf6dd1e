//! Fixed arena geometry: a 1200x700 box closed by four static walls.

use glam::Vec2;

use crate::body::{BodyKind, BodySpec, Category, Material, Shape};

/// Width of the playable area in world units.
pub const ARENA_WIDTH: f32 = 1200.0;

/// Height of the playable area in world units.
pub const ARENA_HEIGHT: f32 = 700.0;

/// Thickness of every boundary wall.
pub const WALL_THICKNESS: f32 = 30.0;

/// One of the four arena walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Floor along the bottom edge; the only wall with friction and bounce.
    Ground,
    /// Wall beyond the left edge.
    LeftWall,
    /// Wall beyond the right edge.
    RightWall,
    /// Lid above the top edge.
    Ceiling,
}

impl Boundary {
    /// All walls in construction order.
    pub const ALL: [Self; 4] = [Self::Ground, Self::LeftWall, Self::RightWall, Self::Ceiling];

    /// Static body description of this wall.
    ///
    /// The ground overlaps the bottom edge by one unit; the other walls sit
    /// entirely outside the playable area.
    pub fn body_spec(self) -> BodySpec {
        let half = WALL_THICKNESS * 0.5;
        let (position, shape, material) = match self {
            Self::Ground => (
                Vec2::new(ARENA_WIDTH * 0.5, ARENA_HEIGHT + half - 1.0),
                Shape::rect(ARENA_WIDTH, WALL_THICKNESS),
                Material::new(0.8, 0.3),
            ),
            Self::LeftWall => (
                Vec2::new(-half, ARENA_HEIGHT * 0.5),
                Shape::rect(WALL_THICKNESS, ARENA_HEIGHT),
                Material::default(),
            ),
            Self::RightWall => (
                Vec2::new(ARENA_WIDTH + half, ARENA_HEIGHT * 0.5),
                Shape::rect(WALL_THICKNESS, ARENA_HEIGHT),
                Material::default(),
            ),
            Self::Ceiling => (
                Vec2::new(ARENA_WIDTH * 0.5, -half),
                Shape::rect(ARENA_WIDTH, WALL_THICKNESS),
                Material::default(),
            ),
        };
        BodySpec {
            kind: BodyKind::Static,
            position,
            angular_velocity: 0.0,
            shape,
            material,
            sensor: false,
            continuous: false,
            category: Category::Default,
        }
    }
}
