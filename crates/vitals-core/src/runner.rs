//! Monitor loop runner with operator controls.
//!
//! This module provides [`run_monitor`], the top-level async function that
//! drives [`SimulationDriver::step`] on a fixed interval with support for:
//!
//! - **Bounded runs**: stop after `max_ticks` evaluated ticks
//! - **Variable tick speed**: interval adjustable at runtime
//! - **Operator stop**: clean stop requested from another task
//!
//! The simulation itself stays synchronous. The only suspension point is
//! the sleep between ticks, so a tick is never observed half-done.

use std::sync::Arc;

use tracing::{info, warn};
use vitals_types::Reading;

use crate::driver::{SimulationDriver, StepError};
use crate::history::HistoryStore;
use crate::operator::{OperatorState, SimulationEndReason};

/// Errors that can occur during the run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A step failed. History invariant violations end the run here.
    #[error("step error: {source}")]
    Step {
        /// The underlying step error.
        #[from]
        source: StepError,
    },
}

/// Result of a monitor run.
#[derive(Debug)]
pub struct MonitorResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// Number of ticks executed by this loop (warm-up excluded).
    pub total_ticks: u64,
    /// Time step of the last executed tick, if any.
    pub final_time_step: Option<u64>,
}

/// Callback invoked after each tick completes.
///
/// Implementations evaluate alerts, write records, render tables, and so
/// on. The callback receives the readings of the tick that just ran and
/// read access to the driver for history queries.
pub trait StepCallback: Send {
    /// Called after a tick completes successfully.
    fn on_step(&mut self, readings: &[Reading], driver: &SimulationDriver);
}

/// A no-op step callback for testing.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _readings: &[Reading], _driver: &SimulationDriver) {}
}

/// Run the monitor loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a step fails. The run is over at that point.
pub async fn run_monitor(
    driver: &mut SimulationDriver,
    operator: &Arc<OperatorState>,
    callback: &mut dyn StepCallback,
) -> Result<MonitorResult, RunnerError> {
    let mut total_ticks: u64 = 0;
    let mut final_time_step: Option<u64> = None;

    info!(
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        starting_time_step = driver.time_step(),
        "Monitor loop starting"
    );

    loop {
        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return Ok(MonitorResult {
                end_reason: SimulationEndReason::OperatorStop,
                total_ticks,
                final_time_step,
            });
        }

        // --- Execute tick ---
        let readings = driver.step()?;
        total_ticks = total_ticks.saturating_add(1);
        final_time_step = readings.first().map(|reading| reading.time_step);

        // --- Notify callback ---
        callback.on_step(&readings, driver);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(total_ticks) {
            info!(
                total_ticks,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return Ok(MonitorResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                total_ticks,
                final_time_step,
            });
        }

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Log the end of a run, including how much history is still held.
pub fn log_run_end(result: &MonitorResult, operator: &OperatorState, history: &dyn HistoryStore) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_time_step = result.final_time_step,
        elapsed_seconds = operator.elapsed_seconds(),
        history_steps = history.step_count(),
        history_readings = history.reading_count(),
        evicted_steps = history.evicted_steps(),
        "Monitor run ended"
    );
    if result.total_ticks == 0 {
        warn!("Monitor run ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitals_patients::DriftConfig;

    use super::*;

    fn make_driver() -> SimulationDriver {
        SimulationDriver::new(2, DriftConfig::default(), 42).unwrap()
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut driver = make_driver();
        let operator = Arc::new(OperatorState::new(0, 5));
        let mut cb = NoOpCallback;

        let result = run_monitor(&mut driver, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_time_step, Some(4));
    }

    #[tokio::test]
    async fn operator_stop_before_first_tick() {
        let mut driver = make_driver();
        let operator = Arc::new(OperatorState::new(0, 0));
        operator.request_stop();
        let mut cb = NoOpCallback;

        let result = run_monitor(&mut driver, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert_eq!(result.final_time_step, None);
        assert_eq!(driver.history().step_count(), 0);
    }

    #[tokio::test]
    async fn tick_limit_counts_from_after_warm_up() {
        let mut driver = make_driver();
        driver.warm_up(10).unwrap();
        let operator = Arc::new(OperatorState::new(0, 3));
        let mut cb = NoOpCallback;

        let result = run_monitor(&mut driver, &operator, &mut cb).await.unwrap();

        assert_eq!(result.total_ticks, 3);
        assert_eq!(result.final_time_step, Some(12));
        assert_eq!(driver.history().step_count(), 13);
    }

    #[tokio::test]
    async fn step_callback_is_called() {
        struct CountCallback {
            count: u64,
            readings: usize,
        }
        impl StepCallback for CountCallback {
            fn on_step(&mut self, readings: &[Reading], _driver: &SimulationDriver) {
                self.count = self.count.saturating_add(1);
                self.readings = self.readings.saturating_add(readings.len());
            }
        }

        let mut driver = make_driver();
        let operator = Arc::new(OperatorState::new(0, 3));
        let mut cb = CountCallback {
            count: 0,
            readings: 0,
        };

        let _ = run_monitor(&mut driver, &operator, &mut cb).await.unwrap();

        assert_eq!(cb.count, 3);
        assert_eq!(cb.readings, 6);
    }

    #[tokio::test]
    async fn callback_can_request_stop() {
        struct StopAfter {
            operator: Arc<OperatorState>,
            remaining: u32,
        }
        impl StepCallback for StopAfter {
            fn on_step(&mut self, _readings: &[Reading], _driver: &SimulationDriver) {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.operator.request_stop();
                }
            }
        }

        let mut driver = make_driver();
        let operator = Arc::new(OperatorState::new(0, 0));
        let mut cb = StopAfter {
            operator: Arc::clone(&operator),
            remaining: 2,
        };

        let result = run_monitor(&mut driver, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 2);
    }
}
