//! Configuration loading and typed config structures for the vitals monitor.
//!
//! The canonical configuration lives in `vitals-config.yaml` in the working
//! directory. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty or missing file is a valid
//! configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use vitals_patients::DriftConfig;
use vitals_types::AlertThresholds;

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

    /// The configuration parsed but describes an unusable setup.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level monitor configuration.
///
/// Mirrors the structure of `vitals-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonitorConfig {
    /// Run-level settings (seed, population size, timing).
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Drift model parameters.
    #[serde(default)]
    pub drift: DriftConfig,

    /// Alert thresholds handed to the evaluator.
    #[serde(default)]
    pub alerts: AlertsConfig,

    /// History backend selection.
    #[serde(default)]
    pub history: HistoryConfig,

    /// CSV record log settings.
    #[serde(default)]
    pub records: RecordsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `VITALS_SEED` overrides `simulation.seed`
    /// - `VITALS_RECORDS_PATH` overrides `records.path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Only the YAML is consulted; environment overrides are applied by
    /// [`MonitorConfig::from_file`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var("VITALS_SEED")
            && let Ok(seed) = raw.trim().parse::<u64>()
        {
            self.simulation.seed = seed;
        }
        if let Ok(path) = std::env::var("VITALS_RECORDS_PATH") {
            self.records.path = PathBuf::from(path);
        }
    }

    /// Check the parts of the configuration that cannot be expressed by
    /// types alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the population is empty, the
    /// ring capacity is zero, or the drift parameters are unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.patients == 0 {
            return Err(ConfigError::Invalid {
                reason: "simulation.patients must be at least 1".to_owned(),
            });
        }
        if self.history.backend == HistoryBackend::Ring && self.history.capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "history.capacity must be at least 1 for the ring backend".to_owned(),
            });
        }
        self.drift
            .validate()
            .map_err(|source| ConfigError::Invalid {
                reason: source.to_string(),
            })
    }
}

/// Run-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSection {
    /// Human-readable run name.
    #[serde(default = "default_run_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of simulated patients.
    #[serde(default = "default_patients")]
    pub patients: u32,

    /// Steps pre-filled before the first evaluated tick.
    #[serde(default = "default_warmup_steps")]
    pub warmup_steps: u32,

    /// Simulated minutes represented by one step.
    #[serde(default = "default_step_interval_minutes")]
    pub step_interval_minutes: u32,

    /// Real-time milliseconds between ticks (0 = no delay).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Maximum evaluated ticks before stopping (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            name: default_run_name(),
            seed: default_seed(),
            patients: default_patients(),
            warmup_steps: default_warmup_steps(),
            step_interval_minutes: default_step_interval_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
        }
    }
}

/// Alert threshold configuration.
///
/// Defaults live here, on the caller side, so the evaluator itself never
/// supplies a bound.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AlertsConfig {
    /// Lowest non-alerting temperature (°C).
    #[serde(default = "default_temp_min")]
    pub temp_min: f64,

    /// Highest non-alerting temperature (°C).
    #[serde(default = "default_temp_max")]
    pub temp_max: f64,

    /// Lowest non-alerting pressure (mmHg).
    #[serde(default = "default_pressure_min")]
    pub pressure_min: f64,

    /// Highest non-alerting pressure (mmHg).
    #[serde(default = "default_pressure_max")]
    pub pressure_max: f64,

    /// Lowest non-alerting flow rate (mL/min).
    #[serde(default = "default_flow_min")]
    pub flow_min: f64,

    /// Highest non-alerting flow rate (mL/min).
    #[serde(default = "default_flow_max")]
    pub flow_max: f64,
}

impl AlertsConfig {
    /// Convert into the threshold set consumed by the evaluator.
    pub const fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            pressure_min: self.pressure_min,
            pressure_max: self.pressure_max,
            flow_min: self.flow_min,
            flow_max: self.flow_max,
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            temp_min: default_temp_min(),
            temp_max: default_temp_max(),
            pressure_min: default_pressure_min(),
            pressure_max: default_pressure_max(),
            flow_min: default_flow_min(),
            flow_max: default_flow_max(),
        }
    }
}

/// Which [`HistoryStore`](crate::history::HistoryStore) backs the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackend {
    /// Keep every step for the whole run.
    #[default]
    Unbounded,
    /// Keep only the most recent `capacity` steps.
    Ring,
}

/// History configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    /// Backing store for the step history.
    #[serde(default)]
    pub backend: HistoryBackend,

    /// Steps retained by the ring backend.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,

    /// Number of recent steps shown in trend views.
    #[serde(default = "default_window_steps")]
    pub window_steps: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::default(),
            capacity: default_history_capacity(),
            window_steps: default_window_steps(),
        }
    }
}

/// CSV record log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordsConfig {
    /// Whether readings are appended to the record log.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path of the CSV file.
    #[serde(default = "default_records_path")]
    pub path: PathBuf,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_records_path(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------

fn default_run_name() -> String {
    "Ward Simulation".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_patients() -> u32 {
    10
}

const fn default_warmup_steps() -> u32 {
    10
}

const fn default_step_interval_minutes() -> u32 {
    1
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_temp_min() -> f64 {
    36.0
}

const fn default_temp_max() -> f64 {
    38.0
}

const fn default_pressure_min() -> f64 {
    90.0
}

const fn default_pressure_max() -> f64 {
    125.0
}

const fn default_flow_min() -> f64 {
    3.0
}

const fn default_flow_max() -> f64 {
    6.0
}

const fn default_history_capacity() -> usize {
    1_000
}

const fn default_window_steps() -> usize {
    10
}

fn default_records_path() -> PathBuf {
    PathBuf::from("data/log.csv")
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
