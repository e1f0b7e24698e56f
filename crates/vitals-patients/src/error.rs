//! Error types for the vitals-patients crate.
//!
//! Numeric drift itself never fails: unbounded values are valid states.
//! The only failure modes are malformed model parameters and a step
//! counter that cannot advance.

/// Errors that can occur while building or stepping a population.
#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    /// Drift parameters or population size are unusable.
    #[error("invalid patient model configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The step counter would overflow.
    #[error("time step overflow: cannot advance beyond u64::MAX")]
    TimeStepOverflow,
}
