//! Error types for the monitor engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the monitor run. Record log failures
//! are not among them; those are logged and the run continues.

/// Top-level error for the monitor engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: vitals_core::config::ConfigError,
    },

    /// Building the driver or warming it up failed.
    #[error("driver error: {source}")]
    Driver {
        /// The underlying step error.
        #[from]
        source: vitals_core::driver::StepError,
    },

    /// The monitor loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: vitals_core::runner::RunnerError,
    },
}
