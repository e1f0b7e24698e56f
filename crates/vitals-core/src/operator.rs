//! Operator control state for a running monitor.
//!
//! The tick loop and whatever controls it (the engine's Ctrl-C handler,
//! tests) share one [`OperatorState`] through an [`Arc`](std::sync::Arc).
//! The stop flag is atomic, so the tick loop checks it without locking.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use crate::config::SimulationSection;

/// Reason why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Pause between ticks in milliseconds.
    tick_interval_ms: u64,

    /// Wall-clock time when the run started.
    started_at: DateTime<Utc>,

    /// Maximum number of evaluated ticks (0 = unlimited).
    max_ticks: u64,
}

impl OperatorState {
    /// Create operator state with explicit bounds.
    pub fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            tick_interval_ms,
            started_at: Utc::now(),
            max_ticks,
        }
    }

    /// Create operator state from the simulation section of the config.
    pub fn from_config(simulation: &SimulationSection) -> Self {
        Self::new(simulation.tick_interval_ms, simulation.max_ticks)
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop before the next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Get the tick interval in milliseconds.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Returns `true` if `max_ticks > 0` and `ticks_run >= max_ticks`.
    pub const fn tick_limit_reached(&self, ticks_run: u64) -> bool {
        self.max_ticks > 0 && ticks_run >= self.max_ticks
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Return elapsed seconds since the run started.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_running() {
        let state = OperatorState::new(1000, 0);
        assert!(!state.is_stop_requested());
        assert_eq!(state.tick_interval_ms(), 1000);
    }

    #[test]
    fn stop_request() {
        let state = OperatorState::new(1000, 0);
        state.request_stop();
        assert!(state.is_stop_requested());
    }

    #[test]
    fn unlimited_ticks_never_reach_limit() {
        let state = OperatorState::new(0, 0);
        assert!(!state.tick_limit_reached(u64::MAX));
    }

    #[test]
    fn tick_limit_is_inclusive() {
        let state = OperatorState::new(0, 5);
        assert!(!state.tick_limit_reached(4));
        assert!(state.tick_limit_reached(5));
    }

    #[test]
    fn from_config_copies_bounds() {
        let simulation = SimulationSection {
            tick_interval_ms: 20,
            max_ticks: 7,
            ..SimulationSection::default()
        };
        let state = OperatorState::from_config(&simulation);
        assert_eq!(state.tick_interval_ms(), 20);
        assert_eq!(state.max_ticks(), 7);
    }

    #[test]
    fn elapsed_seconds_starts_near_zero() {
        let state = OperatorState::new(0, 0);
        assert!(state.elapsed_seconds() < 5);
    }
}
