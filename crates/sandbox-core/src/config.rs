//! Configuration loading and typed config structures for the sandbox.
//!
//! The canonical configuration lives in `sandbox-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use sandbox_types::WorldParameters;
use serde::Deserialize;

/// Highest accepted tick rate.
pub const MAX_TICK_RATE_HZ: u32 = 1000;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its accepted range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level sandbox configuration.
///
/// Mirrors the structure of `sandbox-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SandboxConfig {
    /// Clock settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Initial world parameters.
    #[serde(default)]
    pub parameters: WorldParameters,

    /// HTTP/WebSocket listener.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SandboxConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `SANDBOX_HOST` and `SANDBOX_PORT` override the observer listener.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.observer.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.simulation.tick_rate_hz;
        if rate == 0 || rate > MAX_TICK_RATE_HZ {
            return Err(ConfigError::Invalid {
                reason: format!("simulation.tick_rate_hz must be in 1..={MAX_TICK_RATE_HZ}, got {rate}"),
            });
        }
        sandbox_world::check_parameters(&self.parameters).map_err(|e| ConfigError::Invalid {
            reason: format!("parameters: {e}"),
        })?;
        Ok(())
    }
}

/// Simulation clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Ticks per second; the physics timestep is its reciprocal.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Stop after this many ticks (0 = run until stopped).
    #[serde(default)]
    pub max_ticks: u64,

    /// RNG seed for portal choice and plasma hues (random when absent).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
            max_ticks: 0,
            seed: None,
        }
    }
}

/// Observer listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ObserverConfig {
    /// Override the listener with `SANDBOX_HOST` / `SANDBOX_PORT` when set.
    ///
    /// An unparsable port is ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SANDBOX_HOST") {
            self.host = val;
        }
        if let Some(port) = std::env::var("SANDBOX_PORT")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            self.port = port;
        }
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_tick_rate_hz() -> u32 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_owned()
}
