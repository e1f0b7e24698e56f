//! Patient vital state, drift model, and population for the vitals monitor.
//!
//! This crate contains the logic layer for simulated patients -- everything
//! that operates on vital state without touching I/O. It sits between
//! `vitals-types` (which defines the data structures) and `vitals-core`
//! (which handles history and orchestration).
//!
//! # Modules
//!
//! - [`config`] -- Configurable parameters of the drift model ([`DriftConfig`])
//! - [`error`] -- Error types for patient operations ([`PatientError`])
//! - [`population`] -- Fixed-size population and the step operation ([`Population`])
//! - [`vitals`] -- Per-tick vital mechanics ([`VitalState`])

pub mod config;
pub mod error;
pub mod population;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use config::DriftConfig;
pub use error::PatientError;
pub use population::Population;
pub use vitals::VitalState;
