//! Observer transport for the particle sandbox.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) pushing one state frame per tick via
//!   [`tokio::sync::broadcast`] and accepting commands from clients
//! - **REST endpoints** for the latest snapshot, the world parameters, and
//!   command submission
//! - **Operator endpoints** for pausing, resuming, and stopping the clock
//! - **Minimal HTML page** (`GET /`) with the current tick and counts
//!
//! Snapshot reads come from an in-memory copy updated by the engine after
//! each tick, so they never wait on the world lock. Commands and the
//! parameters query take the world lock.

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::{StartupError, spawn_observer};
pub use state::{AppState, StateUpdate};
