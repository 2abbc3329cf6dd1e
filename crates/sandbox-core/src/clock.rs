//! Simulation clock: tick counter and fixed tick period.
//!
//! The tick number is the only temporal state. The physics timestep and
//! the wall-clock sleep between ticks are both derived from the configured
//! rate and never change at runtime.

use std::time::Duration;

use crate::config::MAX_TICK_RATE_HZ;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// The tick rate is zero or above the supported maximum.
    #[error("invalid tick rate: {rate} Hz")]
    InvalidRate {
        /// The rejected rate.
        rate: u32,
    },
}

/// Tick counter plus the fixed rate it advances at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    /// Number of completed ticks (0 before the first tick).
    tick: u64,

    /// Ticks per second.
    rate_hz: u32,
}

impl SimulationClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidRate`] unless `rate_hz` is in
    /// `1..=MAX_TICK_RATE_HZ`.
    pub const fn new(rate_hz: u32) -> Result<Self, ClockError> {
        if rate_hz == 0 || rate_hz > MAX_TICK_RATE_HZ {
            return Err(ClockError::InvalidRate { rate: rate_hz });
        }
        Ok(Self { tick: 0, rate_hz })
    }

    /// Number of completed ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Configured ticks per second.
    pub const fn rate_hz(&self) -> u32 {
        self.rate_hz
    }

    /// Nominal physics timestep in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub const fn dt(&self) -> f32 {
        1.0 / self.rate_hz as f32
    }

    /// Wall-clock sleep between ticks.
    pub fn period(&self) -> Duration {
        Duration::from_secs(1)
            .checked_div(self.rate_hz)
            .unwrap_or_default()
    }

    /// Record one more completed tick and return its number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] at `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }
}
