//! Inbound command payloads consumed from the transport.
//!
//! Clients send one JSON message per command:
//!
//! ```json
//! { "event": "spawn-particle", "data": { "x": 320, "y": 40, "kind": "sand" } }
//! ```
//!
//! The envelope is decoded first, then `data` is decoded into the payload
//! type named by `event`. Missing fields inside `data` fall back to the
//! documented defaults; a missing or `null` `data` is treated as `{}`.
//! The snake-case event names used by earlier socket clients
//! (`add_particle`, `add_collider`, `set_particle_type`, ...) are accepted
//! as aliases.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ParticleKind, ZoneKind};
use crate::params::{DEFAULT_EXPLOSION_POWER, DEFAULT_PARTICLE_COLOR, DEFAULT_PARTICLE_SIZE};

/// Default spawn x coordinate.
pub const DEFAULT_SPAWN_X: f32 = 100.0;
/// Default spawn y coordinate.
pub const DEFAULT_SPAWN_Y: f32 = 100.0;
/// Default explosion x coordinate (center of the arena).
pub const DEFAULT_EXPLOSION_X: f32 = 600.0;
/// Default explosion y coordinate (center of the arena).
pub const DEFAULT_EXPLOSION_Y: f32 = 350.0;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload of `spawn-particle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpawnParticle {
    /// Spawn x coordinate.
    #[serde(default = "default_spawn_x")]
    #[ts(as = "Option<_>", optional)]
    pub x: f32,
    /// Spawn y coordinate.
    #[serde(default = "default_spawn_y")]
    #[ts(as = "Option<_>", optional)]
    pub y: f32,
    /// Particle kind; the world default when omitted.
    #[serde(default, alias = "type")]
    #[ts(optional = nullable)]
    pub kind: Option<ParticleKind>,
    /// Nominal size; the world default when omitted.
    #[serde(default)]
    #[ts(optional = nullable)]
    pub size: Option<f32>,
    /// Display color; the world default when omitted.
    #[serde(default)]
    #[ts(optional = nullable)]
    pub color: Option<String>,
}

/// Payload of `spawn-zone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpawnZone {
    /// Spawn x coordinate.
    #[serde(default = "default_spawn_x")]
    #[ts(as = "Option<_>", optional)]
    pub x: f32,
    /// Spawn y coordinate.
    #[serde(default = "default_spawn_y")]
    #[ts(as = "Option<_>", optional)]
    pub y: f32,
    /// Zone kind.
    #[serde(default = "default_zone_kind", alias = "type")]
    #[ts(as = "Option<_>", optional)]
    pub kind: ZoneKind,
}

/// Payload of the numeric setters (`set-gravity`, `set-wind`, ...).
///
/// The default depends on the command, so each setter decodes through its
/// own default function; see [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScalarValue {
    /// New value.
    #[ts(as = "Option<_>", optional = nullable)]
    pub value: f32,
}

/// Payload of the boolean presentation setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlagValue {
    /// New value.
    #[serde(default)]
    #[ts(as = "Option<_>", optional)]
    pub value: bool,
}

/// Payload of `set-default-particle-kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct KindValue {
    /// New default kind.
    #[serde(default = "default_particle_kind", alias = "type")]
    #[ts(as = "Option<_>", optional)]
    pub kind: ParticleKind,
}

/// Payload of `set-default-particle-size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SizeValue {
    /// New default size.
    #[serde(default = "default_particle_size")]
    #[ts(as = "Option<_>", optional)]
    pub size: f32,
}

/// Payload of `set-default-particle-color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ColorValue {
    /// New default color.
    #[serde(default = "default_particle_color")]
    #[ts(as = "Option<_>", optional)]
    pub color: String,
}

/// Payload of `trigger-explosion`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExplosionAt {
    /// Explosion center x.
    #[serde(default = "default_explosion_x")]
    #[ts(as = "Option<_>", optional)]
    pub x: f32,
    /// Explosion center y.
    #[serde(default = "default_explosion_y")]
    #[ts(as = "Option<_>", optional)]
    pub y: f32,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A single mutation request against the world.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CommandEnvelope")]
pub enum Command {
    /// Spawn one particle.
    SpawnParticle(SpawnParticle),
    /// Spawn one interaction zone.
    SpawnZone(SpawnZone),
    /// Set the gravity scale.
    SetGravity(ScalarValue),
    /// Set the horizontal wind strength.
    SetWind(ScalarValue),
    /// Set the timestep multiplier.
    SetTimeScale(ScalarValue),
    /// Set the kind used when a spawn omits one.
    SetDefaultParticleKind(KindValue),
    /// Set the size used when a spawn omits one.
    SetDefaultParticleSize(SizeValue),
    /// Set the color used when a spawn omits one.
    SetDefaultParticleColor(ColorValue),
    /// Set the magnet attraction strength.
    SetMagnetStrength(ScalarValue),
    /// Set the explosion impulse magnitude.
    SetExplosionPower(ScalarValue),
    /// Toggle the screen-shake presentation flag.
    SetScreenShake(FlagValue),
    /// Toggle the particle-trail presentation flag.
    SetParticleTrails(FlagValue),
    /// Remove every particle and zone.
    Clear,
    /// Apply an explosion impulse around a point.
    TriggerExplosion(ExplosionAt),
}

impl Command {
    /// The canonical event name of this command.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SpawnParticle(_) => "spawn-particle",
            Self::SpawnZone(_) => "spawn-zone",
            Self::SetGravity(_) => "set-gravity",
            Self::SetWind(_) => "set-wind",
            Self::SetTimeScale(_) => "set-time-scale",
            Self::SetDefaultParticleKind(_) => "set-default-particle-kind",
            Self::SetDefaultParticleSize(_) => "set-default-particle-size",
            Self::SetDefaultParticleColor(_) => "set-default-particle-color",
            Self::SetMagnetStrength(_) => "set-magnet-strength",
            Self::SetExplosionPower(_) => "set-explosion-power",
            Self::SetScreenShake(_) => "set-screen-shake",
            Self::SetParticleTrails(_) => "set-particle-trails",
            Self::Clear => "clear",
            Self::TriggerExplosion(_) => "trigger-explosion",
        }
    }
}

/// Raw `{ "event": ..., "data": ... }` message before payload decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Event name.
    pub event: String,
    /// Event payload; `null` when absent.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Errors produced while decoding a [`CommandEnvelope`] into a [`Command`].
#[derive(Debug, thiserror::Error)]
pub enum CommandParseError {
    /// The event name is not a known command.
    #[error("unknown command event: {0}")]
    UnknownEvent(String),

    /// The payload did not match the command's schema.
    #[error("invalid payload for {event}: {source}")]
    InvalidPayload {
        /// The command whose payload failed to decode.
        event: &'static str,
        /// The underlying decode error.
        source: serde_json::Error,
    },
}

impl TryFrom<CommandEnvelope> for Command {
    type Error = CommandParseError;

    fn try_from(envelope: CommandEnvelope) -> Result<Self, Self::Error> {
        let data = match envelope.data {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            other => other,
        };

        let command = match envelope.event.as_str() {
            "spawn-particle" | "add_particle" => Self::SpawnParticle(decode("spawn-particle", data)?),
            "spawn-zone" | "add_collider" => Self::SpawnZone(decode("spawn-zone", data)?),
            "set-gravity" | "set_gravity" => {
                Self::SetGravity(decode_scalar("set-gravity", data, 1.0)?)
            }
            "set-wind" | "set_wind" => Self::SetWind(decode_scalar("set-wind", data, 0.0)?),
            "set-time-scale" | "set_time_scale" => {
                Self::SetTimeScale(decode_scalar("set-time-scale", data, 1.0)?)
            }
            "set-default-particle-kind" | "set_particle_type" => {
                Self::SetDefaultParticleKind(decode("set-default-particle-kind", data)?)
            }
            "set-default-particle-size" | "set_particle_size" => {
                Self::SetDefaultParticleSize(decode("set-default-particle-size", data)?)
            }
            "set-default-particle-color" | "set_particle_color" => {
                Self::SetDefaultParticleColor(decode("set-default-particle-color", data)?)
            }
            "set-magnet-strength" | "set_magnet_strength" => {
                Self::SetMagnetStrength(decode_scalar("set-magnet-strength", data, 0.0)?)
            }
            "set-explosion-power" | "set_explosion_power" => Self::SetExplosionPower(
                decode_scalar("set-explosion-power", data, DEFAULT_EXPLOSION_POWER)?,
            ),
            "set-screen-shake" | "set_screen_shake" => {
                Self::SetScreenShake(decode("set-screen-shake", data)?)
            }
            "set-particle-trails" | "set_particle_trails" => {
                Self::SetParticleTrails(decode("set-particle-trails", data)?)
            }
            "clear" => Self::Clear,
            "trigger-explosion" | "trigger_explosion" => {
                Self::TriggerExplosion(decode("trigger-explosion", data)?)
            }
            _ => return Err(CommandParseError::UnknownEvent(envelope.event)),
        };

        Ok(command)
    }
}

/// Decode a payload object into its typed form.
fn decode<T: serde::de::DeserializeOwned>(
    event: &'static str,
    data: serde_json::Value,
) -> Result<T, CommandParseError> {
    serde_json::from_value(data).map_err(|source| CommandParseError::InvalidPayload { event, source })
}

/// Decode a `{ "value": f32 }` payload, substituting `default` when the
/// field is absent.
fn decode_scalar(
    event: &'static str,
    data: serde_json::Value,
    default: f32,
) -> Result<ScalarValue, CommandParseError> {
    #[derive(Deserialize)]
    struct Partial {
        #[serde(default)]
        value: Option<f32>,
    }

    let partial: Partial = decode(event, data)?;
    Ok(ScalarValue {
        value: partial.value.unwrap_or(default),
    })
}

const fn default_spawn_x() -> f32 {
    DEFAULT_SPAWN_X
}

const fn default_spawn_y() -> f32 {
    DEFAULT_SPAWN_Y
}

const fn default_explosion_x() -> f32 {
    DEFAULT_EXPLOSION_X
}

const fn default_explosion_y() -> f32 {
    DEFAULT_EXPLOSION_Y
}

const fn default_zone_kind() -> ZoneKind {
    ZoneKind::Platform
}

const fn default_particle_kind() -> ParticleKind {
    ParticleKind::Balls
}

const fn default_particle_size() -> f32 {
    DEFAULT_PARTICLE_SIZE
}

fn default_particle_color() -> String {
    DEFAULT_PARTICLE_COLOR.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Result<Command, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn spawn_particle_defaults_position() {
        let cmd = parse(json!({ "event": "spawn-particle", "data": {} })).unwrap();
        let Command::SpawnParticle(payload) = cmd else {
            panic!("expected spawn-particle");
        };
        assert!((payload.x - 100.0).abs() < f32::EPSILON);
        assert!((payload.y - 100.0).abs() < f32::EPSILON);
        assert!(payload.kind.is_none());
        assert!(payload.size.is_none());
        assert!(payload.color.is_none());
    }

    #[test]
    fn legacy_event_names_and_type_alias_are_accepted() {
        let cmd = parse(json!({
            "event": "add_particle",
            "data": { "x": 5, "y": 6, "type": "sand", "radius": 9 }
        }))
        .unwrap();
        let Command::SpawnParticle(payload) = cmd else {
            panic!("expected spawn-particle");
        };
        assert_eq!(payload.kind, Some(ParticleKind::Sand));
        assert!((payload.x - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn spawn_zone_defaults_to_platform() {
        let cmd = parse(json!({ "event": "spawn-zone" })).unwrap();
        assert_eq!(
            cmd,
            Command::SpawnZone(SpawnZone {
                x: 100.0,
                y: 100.0,
                kind: ZoneKind::Platform
            })
        );
    }

    #[test]
    fn scalar_setters_use_per_command_defaults() {
        let gravity = parse(json!({ "event": "set-gravity", "data": {} })).unwrap();
        assert_eq!(gravity, Command::SetGravity(ScalarValue { value: 1.0 }));

        let wind = parse(json!({ "event": "set-wind", "data": {} })).unwrap();
        assert_eq!(wind, Command::SetWind(ScalarValue { value: 0.0 }));

        let power = parse(json!({ "event": "set-explosion-power" })).unwrap();
        assert_eq!(power, Command::SetExplosionPower(ScalarValue { value: 50.0 }));
    }

    #[test]
    fn clear_accepts_missing_or_empty_data() {
        assert_eq!(parse(json!({ "event": "clear" })).unwrap(), Command::Clear);
        assert_eq!(
            parse(json!({ "event": "clear", "data": {} })).unwrap(),
            Command::Clear
        );
    }

    #[test]
    fn explosion_defaults_to_arena_center() {
        let cmd = parse(json!({ "event": "trigger-explosion", "data": {} })).unwrap();
        assert_eq!(
            cmd,
            Command::TriggerExplosion(ExplosionAt { x: 600.0, y: 350.0 })
        );
    }

    #[test]
    fn unknown_event_is_rejected() {
        assert!(parse(json!({ "event": "summon-dragon", "data": {} })).is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(parse(json!({ "event": "spawn-zone", "data": { "kind": "lava" } })).is_err());
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        assert!(parse(json!({ "event": "set-gravity", "data": { "value": "heavy" } })).is_err());
    }

    #[test]
    fn names_round_trip_through_the_envelope() {
        let commands = [
            json!({ "event": "set-default-particle-kind", "data": { "kind": "metal" } }),
            json!({ "event": "set-default-particle-size", "data": { "size": 8 } }),
            json!({ "event": "set-default-particle-color", "data": { "color": "#00ff00" } }),
            json!({ "event": "set-screen-shake", "data": { "value": true } }),
            json!({ "event": "set-particle-trails", "data": { "value": true } }),
            json!({ "event": "set-magnet-strength", "data": { "value": 3000 } }),
            json!({ "event": "set-time-scale", "data": { "value": 0.5 } }),
        ];
        for raw in commands {
            let event = raw["event"].as_str().unwrap().to_owned();
            let cmd = parse(raw).unwrap();
            assert_eq!(cmd.name(), event);
        }
    }
}
