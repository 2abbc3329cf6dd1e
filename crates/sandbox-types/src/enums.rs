//! Enumeration types for the particle sandbox.
//!
//! Kinds serialize in lowercase (`"balls"`, `"portal"`, ...) because that
//! is the vocabulary clients send in command payloads and read back from
//! snapshots. An unknown kind string fails deserialization, which is how
//! the command surface rejects invalid payloads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Particle kinds
// ---------------------------------------------------------------------------

/// The material a dynamic particle is made of.
///
/// Each kind maps to a fixed physical profile (mass scale, shape, friction,
/// elasticity, damping) in the world crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ParticleKind {
    /// Bouncy circles.
    Balls,
    /// Heavy, grippy boxes that barely bounce.
    Sand,
    /// Light, slippery circles with a little damping.
    Water,
    /// Super-elastic circles with a random blue-to-purple hue.
    Plasma,
    /// Dense silver boxes.
    Metal,
    /// Circles that detonate on first contact with anything.
    Explosive,
}

impl ParticleKind {
    /// Every particle kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Balls,
        Self::Sand,
        Self::Water,
        Self::Plasma,
        Self::Metal,
        Self::Explosive,
    ];

    /// The lowercase wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balls => "balls",
            Self::Sand => "sand",
            Self::Water => "water",
            Self::Plasma => "plasma",
            Self::Metal => "metal",
            Self::Explosive => "explosive",
        }
    }
}

impl core::fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Zone kinds
// ---------------------------------------------------------------------------

/// The role of an interaction zone placed in the world.
///
/// Platforms, bouncers, and spinners are solid colliders. Destroyers,
/// magnets, and portals are sensors: they detect overlap but exert no
/// contact force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ZoneKind {
    /// Static ledge.
    Platform,
    /// Heavy dynamic circle with restitution above one.
    Bouncer,
    /// Sensor that removes particles on contact.
    Destroyer,
    /// Sensor that attracts nearby particles.
    Magnet,
    /// Sensor that teleports particles to another portal.
    Portal,
    /// Dynamic bar spawned with an initial spin.
    Spinner,
}

impl ZoneKind {
    /// Every zone kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Platform,
        Self::Bouncer,
        Self::Destroyer,
        Self::Magnet,
        Self::Portal,
        Self::Spinner,
    ];

    /// The lowercase wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Bouncer => "bouncer",
            Self::Destroyer => "destroyer",
            Self::Magnet => "magnet",
            Self::Portal => "portal",
            Self::Spinner => "spinner",
        }
    }

    /// Whether zones of this kind only report overlap.
    pub const fn is_sensor(self) -> bool {
        matches!(self, Self::Destroyer | Self::Magnet | Self::Portal)
    }
}

impl core::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_kind_wire_names_match_serde() {
        for kind in ParticleKind::ALL {
            let json = serde_json::to_string(&kind).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn zone_kind_wire_names_match_serde() {
        for kind in ZoneKind::ALL {
            let json = serde_json::to_string(&kind).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed: Result<ParticleKind, _> = serde_json::from_str("\"lava\"");
        assert!(parsed.is_err());
        let parsed: Result<ZoneKind, _> = serde_json::from_str("\"trampoline\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn sensors_are_destroyer_magnet_portal() {
        let sensors: Vec<ZoneKind> = ZoneKind::ALL
            .into_iter()
            .filter(|k| k.is_sensor())
            .collect();
        assert_eq!(
            sensors,
            vec![ZoneKind::Destroyer, ZoneKind::Magnet, ZoneKind::Portal]
        );
    }
}
