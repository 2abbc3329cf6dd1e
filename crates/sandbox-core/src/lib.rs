//! Configuration, command surface, and simulation clock for the sandbox.
//!
//! The world lives behind one async mutex ([`SharedWorld`]). The clock
//! takes it once per tick; every command takes it once per mutation.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and the fixed period derived from the rate.
//! - [`command`] -- Applies inbound commands to the world.
//! - [`config`] -- Loading of `sandbox-config.yaml` into typed structs.
//! - [`operator`] -- Pause, resume, and stop controls for the clock.
//! - [`runner`] -- The clock loop around [`tick::run_tick`].
//! - [`shared`] -- The single exclusion domain around the world.
//! - [`tick`] -- One step-then-snapshot tick.
//!
//! [`SharedWorld`]: shared::SharedWorld

pub mod clock;
pub mod command;
pub mod config;
pub mod operator;
pub mod runner;
pub mod shared;
pub mod tick;

pub use clock::{ClockError, SimulationClock};
pub use command::{CommandError, CommandOutcome, execute, submit};
pub use config::{ConfigError, SandboxConfig};
pub use operator::{OperatorState, SimulationEndReason, SimulationStatus};
pub use runner::{NoOpCallback, SimulationResult, TickCallback, run_simulation};
pub use shared::{SharedWorld, share};
pub use tick::{TickError, TickSummary, run_tick};
