//! Step callback that evaluates, reports, and persists each tick.
//!
//! After every evaluated tick the [`MonitorCallback`]
//!
//! 1. renders the step as a table at `debug` level,
//! 2. evaluates threshold alerts and logs each one at `warn`,
//! 3. appends the readings to the CSV record log, if enabled.
//!
//! Record failures are logged and the run continues.

use chrono::Utc;
use tracing::{debug, info, warn};
use vitals_core::driver::SimulationDriver;
use vitals_core::runner::StepCallback;
use vitals_observer::format::{alert_line, render_step_table, trend_summary};
use vitals_observer::{CsvRecordSink, evaluate};
use vitals_types::{AlertThresholds, Reading, VitalSign};

/// Callback that bridges the tick loop to alerting and the record log.
#[derive(Debug)]
pub struct MonitorCallback {
    thresholds: AlertThresholds,
    sink: Option<CsvRecordSink>,
    alerts_raised: u64,
    record_failures: u64,
}

impl MonitorCallback {
    /// Create a callback. `sink` is `None` when records are disabled.
    pub const fn new(thresholds: AlertThresholds, sink: Option<CsvRecordSink>) -> Self {
        Self {
            thresholds,
            sink,
            alerts_raised: 0,
            record_failures: 0,
        }
    }

    /// Total alerts raised so far.
    pub const fn alerts_raised(&self) -> u64 {
        self.alerts_raised
    }

    /// Number of ticks whose records could not be written.
    pub const fn record_failures(&self) -> u64 {
        self.record_failures
    }

    /// Rows written to the record log, or zero when records are disabled.
    pub fn rows_written(&self) -> u64 {
        self.sink.as_ref().map_or(0, CsvRecordSink::rows_written)
    }
}

impl StepCallback for MonitorCallback {
    fn on_step(&mut self, readings: &[Reading], driver: &SimulationDriver) {
        let time_step = readings.first().map_or(0, |reading| reading.time_step);

        debug!(
            time_step,
            elapsed_minutes = driver.elapsed_minutes(time_step),
            "\n{}",
            render_step_table(readings)
        );

        let alerts = evaluate(readings, &self.thresholds);
        for alert in &alerts {
            warn!(
                patient_id = %alert.patient_id,
                time_step = alert.time_step,
                kind = ?alert.kind,
                "{}",
                alert_line(alert)
            );
        }
        let raised = u64::try_from(alerts.len()).unwrap_or(u64::MAX);
        self.alerts_raised = self.alerts_raised.saturating_add(raised);

        if let Some(sink) = self.sink.as_mut()
            && let Err(e) = sink.write_step(readings, Utc::now())
        {
            self.record_failures = self.record_failures.saturating_add(1);
            warn!(
                error = %e,
                path = %sink.path().display(),
                time_step,
                "Failed to write records, continuing"
            );
        }
    }
}

/// Log a per-patient trend over the last `window_steps` steps.
pub fn log_window_trends(driver: &SimulationDriver, window_steps: usize) {
    for patient in driver.population().patients() {
        let patient_id = patient.patient_id();
        let series = driver.patient_series(patient_id, window_steps);
        let (Some(temperature), Some(flow_rate), Some(pressure)) = (
            trend_summary(&series, VitalSign::Temperature),
            trend_summary(&series, VitalSign::FlowRate),
            trend_summary(&series, VitalSign::Pressure),
        ) else {
            continue;
        };
        info!(
            patient_id = %patient_id,
            window_steps,
            temperature = %temperature,
            flow_rate = %flow_rate,
            pressure = %pressure,
            "Patient trend"
        );
    }
}
