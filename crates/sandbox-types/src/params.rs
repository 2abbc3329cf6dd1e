//! Global, runtime-adjustable world configuration.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ParticleKind;

/// Default particle color when a spawn omits one.
pub const DEFAULT_PARTICLE_COLOR: &str = "#ff0000";

/// Default nominal particle size when a spawn omits one.
pub const DEFAULT_PARTICLE_SIZE: f32 = 5.0;

/// Default explosion power.
pub const DEFAULT_EXPLOSION_POWER: f32 = 50.0;

/// Global mutable parameters of the world.
///
/// The screen-shake and particle-trail flags are stored here and echoed
/// back to clients, but the simulation itself never reads them. Missing
/// fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct WorldParameters {
    /// Multiplier on the base downward gravity of 900 units/s².
    pub gravity_scale: f32,
    /// Horizontal wind strength (applied as `wind * 0.001` per particle).
    pub wind: f32,
    /// Multiplier on the physics timestep.
    pub time_scale: f32,
    /// Kind used when a spawn omits one.
    pub particle_kind: ParticleKind,
    /// Nominal size used when a spawn omits one.
    pub particle_size: f32,
    /// Display color used when a spawn omits one.
    pub particle_color: String,
    /// Numerator of the inverse-square magnet attraction.
    pub magnet_strength: f32,
    /// Impulse magnitude applied by explosions.
    pub explosion_power: f32,
    /// Presentation flag: shake the screen on explosions.
    pub screen_shake: bool,
    /// Presentation flag: draw particle trails.
    pub particle_trails: bool,
}

impl Default for WorldParameters {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            wind: 0.0,
            time_scale: 1.0,
            particle_kind: ParticleKind::Balls,
            particle_size: DEFAULT_PARTICLE_SIZE,
            particle_color: DEFAULT_PARTICLE_COLOR.to_owned(),
            magnet_strength: 0.0,
            explosion_power: DEFAULT_EXPLOSION_POWER,
            screen_shake: false,
            particle_trails: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let params = WorldParameters::default();
        assert!((params.gravity_scale - 1.0).abs() < f32::EPSILON);
        assert!(params.wind.abs() < f32::EPSILON);
        assert!((params.time_scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(params.particle_kind, ParticleKind::Balls);
        assert!((params.particle_size - 5.0).abs() < f32::EPSILON);
        assert_eq!(params.particle_color, "#ff0000");
        assert!((params.explosion_power - 50.0).abs() < f32::EPSILON);
        assert!(!params.screen_shake);
        assert!(!params.particle_trails);
    }
}
