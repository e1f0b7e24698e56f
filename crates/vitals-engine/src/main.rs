//! Monitor engine binary for the vitals simulation.
//!
//! This is the main entry point that wires together the patient
//! population, the history backend, alerting, the CSV record log, and
//! operator controls. It loads configuration, warms up the trend window,
//! and runs the monitor loop until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `vitals-config.yaml` (or defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation driver and its history backend
//! 4. Warm up: pre-fill history without alerting or persisting
//! 5. Open the record log
//! 6. Create operator state and install the Ctrl-C handler
//! 7. Run the monitor loop
//! 8. Log the result and per-patient trends

mod callback;
mod error;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vitals_core::config::{LogFormat, LoggingConfig, MonitorConfig};
use vitals_core::driver::SimulationDriver;
use vitals_core::operator::OperatorState;
use vitals_core::runner;
use vitals_observer::CsvRecordSink;

use crate::callback::MonitorCallback;
use crate::error::EngineError;

/// Config file looked up relative to the working directory.
const CONFIG_PATH: &str = "vitals-config.yaml";

/// Application entry point for the monitor engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the driver cannot be
/// built, or a step violates history ordering.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        run_name = %config.simulation.name,
        seed = config.simulation.seed,
        patients = config.simulation.patients,
        tick_interval_ms = config.simulation.tick_interval_ms,
        "vitals-engine starting"
    );

    // 3. Build the driver.
    let mut driver = SimulationDriver::from_config(&config).map_err(EngineError::from)?;
    info!(
        patients = driver.population().len(),
        backend = ?config.history.backend,
        step_interval_minutes = config.simulation.step_interval_minutes,
        "Simulation driver ready"
    );

    // 4. Warm up the trend window.
    driver
        .warm_up(config.simulation.warmup_steps)
        .map_err(EngineError::from)?;
    info!(
        warmup_steps = config.simulation.warmup_steps,
        next_time_step = driver.time_step(),
        "Warm-up complete"
    );

    // 5. Open the record log.
    let sink = open_record_sink(&config);
    let mut callback = MonitorCallback::new(config.alerts.thresholds(), sink);

    // 6. Operator state and Ctrl-C.
    let operator = Arc::new(OperatorState::from_config(&config.simulation));
    spawn_ctrl_c_handler(Arc::clone(&operator));

    // 7. Run the monitor loop.
    let result = runner::run_monitor(&mut driver, &operator, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 8. Log results.
    runner::log_run_end(&result, &operator, driver.history());
    callback::log_window_trends(&driver, config.history.window_steps);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        alerts_raised = callback.alerts_raised(),
        rows_written = callback.rows_written(),
        record_failures = callback.record_failures(),
        "vitals-engine shutdown complete"
    );

    Ok(())
}

/// Load the monitor configuration from `vitals-config.yaml`.
///
/// Falls back to defaults (with environment overrides) when the file is
/// absent. The result is validated either way.
fn load_config() -> Result<MonitorConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    let config = if config_path.exists() {
        MonitorConfig::from_file(config_path)?
    } else {
        let mut config = MonitorConfig::default();
        config.apply_env_overrides();
        config
    };
    config.validate()?;
    Ok(config)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Open the CSV record log, or `None` if disabled or unavailable.
fn open_record_sink(config: &MonitorConfig) -> Option<CsvRecordSink> {
    if !config.records.enabled {
        info!("Record log disabled");
        return None;
    }
    match CsvRecordSink::open(&config.records.path) {
        Ok(sink) => {
            info!(path = %sink.path().display(), "Record log opened");
            Some(sink)
        }
        Err(e) => {
            warn!(
                error = %e,
                path = %config.records.path.display(),
                "Failed to open record log, continuing without records"
            );
            None
        }
    }
}

/// Request a clean stop on Ctrl-C.
fn spawn_ctrl_c_handler(operator: Arc<OperatorState>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                operator.request_stop();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });
}
