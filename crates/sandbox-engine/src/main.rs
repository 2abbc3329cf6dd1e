//! Particle sandbox server.
//!
//! Wires the world, the simulation clock, and the observer transport
//! together and runs until the clock ends.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `sandbox-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the world from the configured parameters and seed
//! 4. Create the clock and operator state
//! 5. Start the observer server on a background task
//! 6. Install the Ctrl-C handler
//! 7. Run the clock
//! 8. Log the result; keep serving until Ctrl-C if the clock stopped on
//!    its own

mod error;
mod observer_callback;

use std::path::Path;
use std::sync::Arc;

use sandbox_core::clock::SimulationClock;
use sandbox_core::config::SandboxConfig;
use sandbox_core::operator::OperatorState;
use sandbox_core::runner;
use sandbox_core::shared;
use sandbox_observer::state::AppState;
use sandbox_world::World;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::ObserverCallback;

const CONFIG_PATH: &str = "sandbox-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, world construction, or observer
/// startup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("sandbox-engine starting");
    if !from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        tick_rate_hz = config.simulation.tick_rate_hz,
        max_ticks = config.simulation.max_ticks,
        seed = ?config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Build the world.
    let params = config.parameters.clone();
    let world = match config.simulation.seed {
        Some(seed) => World::seeded(params, seed),
        None => World::new(params),
    }
    .map_err(EngineError::from)?;
    info!(boundaries = world.boundaries().len(), "World initialized");
    let world = shared::share(world);

    // 4. Clock and operator.
    let mut clock =
        SimulationClock::new(config.simulation.tick_rate_hz).map_err(EngineError::from)?;
    let operator = Arc::new(OperatorState::new(config.simulation.max_ticks));

    // 5. Observer.
    let app_state = Arc::new(AppState::with_operator(
        Arc::clone(&world),
        Arc::clone(&operator),
    ));
    let _observer_handle =
        sandbox_observer::spawn_observer(config.observer.clone(), Arc::clone(&app_state))
            .map_err(EngineError::from)?;

    // 6. Ctrl-C stops the clock and ends the process.
    let shutdown = Arc::new(Notify::new());
    {
        let operator = Arc::clone(&operator);
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    operator.request_stop();
                }
                // Without a signal handler the process exits when the clock ends.
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
            shutdown.notify_one();
        });
    }

    // 7. Run the clock.
    let mut callback = ObserverCallback::new(app_state);
    let result = runner::run_simulation(&world, &mut clock, &operator, &mut callback).await;

    // 8. Log results.
    runner::log_simulation_end(&result);

    info!("Observer still serving; press Ctrl-C to exit");
    shutdown.notified().await;

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "sandbox-engine shutdown complete"
    );

    Ok(())
}

/// Load `sandbox-config.yaml` from the working directory.
///
/// Returns the config and whether it came from the file. A missing file
/// yields defaults with environment overrides applied.
fn load_config() -> Result<(SandboxConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((SandboxConfig::from_file(config_path)?, true))
    } else {
        Ok((SandboxConfig::parse("")?, false))
    }
}
