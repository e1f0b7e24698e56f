//! Shared type definitions for the vitals monitor simulation.
//!
//! This crate is the single source of truth for the data that crosses
//! crate boundaries: patient identifiers, per-step readings, and alert
//! events. It contains no logic beyond field accessors.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers
//! - [`enums`] -- Vital signs and alert kinds
//! - [`structs`] -- Readings, alert events, and alert thresholds

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AlertKind, VitalSign};
pub use ids::PatientId;
pub use structs::{AlertEvent, AlertThresholds, Reading};
