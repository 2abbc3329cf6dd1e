//! Operator control state for runtime clock management.
//!
//! Shared atomic state used by the tick loop and the operator REST API.
//! The operator can pause, resume, and stop the clock without stopping the
//! process; the HTTP server keeps serving after the clock ends.
//!
//! All mutable control fields are atomics so the tick loop reads them
//! without taking a lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

/// Reason why the clock stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator (or Ctrl-C) requested a stop.
    OperatorStop,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the clock is currently paused.
    paused: AtomicBool,

    /// Wakes the tick loop on resume or stop.
    wake: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wall-clock time the operator state was created.
    started_at: DateTime<Utc>,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Reason the clock ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,

    /// Ticks whose step failed and were rolled back.
    failed_ticks: AtomicU64,

    /// Message of the most recent failed tick.
    last_tick_error: Mutex<Option<String>>,
}

impl OperatorState {
    /// Create operator state with a tick bound (0 = unlimited).
    pub fn new(max_ticks: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            wake: Notify::new(),
            stop_requested: AtomicBool::new(false),
            started_at: Utc::now(),
            max_ticks,
            end_reason: Mutex::new(None),
            failed_ticks: AtomicU64::new(0),
            last_tick_error: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the clock is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the clock. The tick loop sleeps until resumed or stopped.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the clock and wake the tick loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake.notify_one();
    }

    /// Wait until the clock is no longer paused or a stop is requested.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.wake.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop. Also wakes a paused loop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the clock ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the clock ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason.lock().await.clone()
    }

    // -----------------------------------------------------------------------
    // Tick failures
    // -----------------------------------------------------------------------

    /// Record a tick whose step failed. The clock keeps running.
    pub async fn record_tick_failure(&self, message: String) {
        self.failed_ticks.fetch_add(1, Ordering::AcqRel);
        *self.last_tick_error.lock().await = Some(message);
    }

    /// Number of failed ticks so far.
    pub fn failed_ticks(&self) -> u64 {
        self.failed_ticks.load(Ordering::Acquire)
    }

    /// Message of the most recent failed tick, if any.
    pub async fn last_tick_error(&self) -> Option<String> {
        self.last_tick_error.lock().await.clone()
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed seconds since start.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }
}

/// JSON-serializable status of the clock for the operator API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStatus {
    /// Last completed tick.
    pub tick: u64,
    /// Whether the clock is paused.
    pub paused: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Elapsed wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Configured maximum ticks (0 = unlimited).
    pub max_ticks: u64,
    /// Live particles.
    pub particles: usize,
    /// Live zones.
    pub zones: usize,
    /// Why the clock ended, if it has.
    pub end_reason: Option<SimulationEndReason>,
    /// Ticks whose step failed and were rolled back.
    pub failed_ticks: u64,
    /// Message of the most recent failed tick.
    pub last_tick_error: Option<String>,
    /// ISO 8601 timestamp of when the clock started.
    pub started_at: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn initial_state_is_running() {
        let state = OperatorState::new(0);
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let state = OperatorState::new(0);
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn tick_limit_zero_means_unlimited() {
        let state = OperatorState::new(0);
        assert!(!state.tick_limit_reached(999_999));
    }

    #[test]
    fn tick_limit_reached() {
        let state = OperatorState::new(100);
        assert!(!state.tick_limit_reached(99));
        assert!(state.tick_limit_reached(100));
        assert!(state.tick_limit_reached(101));
    }

    #[tokio::test]
    async fn stop_wakes_a_paused_waiter() {
        let state = Arc::new(OperatorState::new(0));
        state.pause();
        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.wait_if_paused().await })
        };
        tokio::task::yield_now().await;
        state.request_stop();
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn end_reason_round_trip() {
        let state = OperatorState::new(0);
        assert_eq!(state.end_reason().await, None);
        state.set_end_reason(SimulationEndReason::OperatorStop).await;
        assert_eq!(
            state.end_reason().await,
            Some(SimulationEndReason::OperatorStop)
        );
    }

    #[tokio::test]
    async fn tick_failures_are_counted() {
        let state = OperatorState::new(0);
        assert_eq!(state.failed_ticks(), 0);
        assert_eq!(state.last_tick_error().await, None);

        state.record_tick_failure("first".to_owned()).await;
        state.record_tick_failure("second".to_owned()).await;
        assert_eq!(state.failed_ticks(), 2);
        assert_eq!(state.last_tick_error().await.as_deref(), Some("second"));
        assert_eq!(state.end_reason().await, None);
    }
}
