//! Pure force and impulse laws applied by the world each tick.
//!
//! These functions never touch a backend. Each returns `None` when the
//! law yields no effect, so callers can skip the backend call entirely.

use glam::Vec2;

/// Downward acceleration at gravity scale 1 (screen y grows downward).
pub const BASE_GRAVITY: f32 = 900.0;

/// Multiplier turning the wind parameter into a horizontal force.
pub const WIND_FACTOR: f32 = 0.001;

/// Magnets affect particles strictly closer than this.
pub const MAGNET_RANGE: f32 = 200.0;

/// Explosions affect particles strictly closer than this.
pub const EXPLOSION_RADIUS: f32 = 100.0;

/// Global gravity vector for a gravity scale.
pub fn gravity(scale: f32) -> Vec2 {
    Vec2::new(0.0, scale * BASE_GRAVITY)
}

/// Uniform horizontal wind force applied to every particle.
pub fn wind_force(wind: f32) -> Option<Vec2> {
    let force = wind * WIND_FACTOR;
    (force != 0.0).then(|| Vec2::new(force, 0.0))
}

/// Inverse-square pull of a magnet at `magnet` on a particle at `particle`.
///
/// The force points from the particle toward the magnet with magnitude
/// `strength / d²`. Particles at distance zero or at `MAGNET_RANGE` and
/// beyond feel nothing.
#[allow(clippy::arithmetic_side_effects)]
pub fn magnet_force(magnet: Vec2, particle: Vec2, strength: f32) -> Option<Vec2> {
    if strength == 0.0 {
        return None;
    }
    let offset = magnet - particle;
    let distance = offset.length();
    if distance <= 0.0 || distance >= MAGNET_RANGE {
        return None;
    }
    let magnitude = strength / (distance * distance);
    Some(offset / distance * magnitude)
}

/// Impulse an explosion at `center` gives a particle at `particle`.
///
/// Directed from the center outward with magnitude `power`. Particles at
/// the exact center or at `EXPLOSION_RADIUS` and beyond are untouched.
#[allow(clippy::arithmetic_side_effects)]
pub fn explosion_impulse(center: Vec2, particle: Vec2, power: f32) -> Option<Vec2> {
    let offset = particle - center;
    let distance = offset.length();
    if distance <= 0.0 || distance >= EXPLOSION_RADIUS {
        return None;
    }
    Some(offset / distance * power)
}
