//! Core data structs shared across the workspace.
//!
//! [`Reading`] is the immutable per-step snapshot of one patient,
//! [`AlertEvent`] is the structured output of threshold evaluation, and
//! [`AlertThresholds`] is the caller-supplied bound set the evaluator
//! checks against.

use serde::{Deserialize, Serialize};

use crate::enums::{AlertKind, VitalSign};
use crate::ids::PatientId;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Snapshot of one patient's vitals at one simulation step.
///
/// Readings are produced by copying the patient's state at the moment of
/// a tick and are never mutated afterwards. All readings produced by the
/// same tick share the same `time_step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Patient this reading belongs to.
    pub patient_id: PatientId,
    /// Body temperature in °C.
    pub temperature: f64,
    /// Infusion flow rate in mL/min.
    pub flow_rate: f64,
    /// Line pressure in mmHg.
    pub pressure: f64,
    /// Whether a bubble was detected during this step.
    pub bubble_present: bool,
    /// Step number shared by every reading of the same tick.
    pub time_step: u64,
}

impl Reading {
    /// Return the value of the given vital sign.
    pub const fn value(&self, vital: VitalSign) -> f64 {
        match vital {
            VitalSign::Temperature => self.temperature,
            VitalSign::Pressure => self.pressure,
            VitalSign::FlowRate => self.flow_rate,
        }
    }

    /// Whether every numeric field is a finite real number.
    pub const fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.flow_rate.is_finite() && self.pressure.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// A single alert raised for one patient at one step.
///
/// Alerts carry the kind and the offending value only; human-readable
/// wording is produced at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Patient the alert is about.
    pub patient_id: PatientId,
    /// Step of the reading that triggered the alert.
    pub time_step: u64,
    /// What was violated.
    pub kind: AlertKind,
    /// The offending value, `None` for [`AlertKind::BubbleDetected`].
    pub value: Option<f64>,
}

/// Inclusive bounds for each monitored vital sign.
///
/// There are no defaults here: the caller (configuration layer) owns them.
/// `min <= max` is assumed, not checked. Inverted bounds degrade to
/// over- or under-alerting rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Lowest temperature that does not alert (°C).
    pub temp_min: f64,
    /// Highest temperature that does not alert (°C).
    pub temp_max: f64,
    /// Lowest pressure that does not alert (mmHg).
    pub pressure_min: f64,
    /// Highest pressure that does not alert (mmHg).
    pub pressure_max: f64,
    /// Lowest flow rate that does not alert (mL/min).
    pub flow_min: f64,
    /// Highest flow rate that does not alert (mL/min).
    pub flow_max: f64,
}

impl AlertThresholds {
    /// Return the `(min, max)` pair for a vital sign.
    pub const fn bounds(&self, vital: VitalSign) -> (f64, f64) {
        match vital {
            VitalSign::Temperature => (self.temp_min, self.temp_max),
            VitalSign::Pressure => (self.pressure_min, self.pressure_max),
            VitalSign::FlowRate => (self.flow_min, self.flow_max),
        }
    }
}
