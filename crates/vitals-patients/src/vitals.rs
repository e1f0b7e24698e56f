//! Vital mechanics applied to patients each tick.
//!
//! Each patient follows an independent random walk:
//!
//! - `temperature += U(-temp_noise, temp_noise) + temp_drift`
//! - `flow_rate += U(-flow_noise, flow_noise) + flow_drift`
//! - `pressure += U(-pressure_noise, pressure_noise) + pressure_drift`
//! - `bubble_present = Bernoulli(bubble_probability)`, redrawn every step
//!
//! The drift terms are sampled once at creation and never change. There is
//! no clamping and no mean reversion, so long runs can wander arbitrarily
//! far from baseline; crossing alert thresholds is the point.

use rand::Rng;
use rand::distr::{Distribution, Uniform};
use vitals_types::{PatientId, Reading};

use crate::config::DriftConfig;

/// Mutable vital state of one patient.
///
/// Created once at population initialization and mutated in place once per
/// tick. The identity and drift coefficients are fixed for the lifetime of
/// the value.
#[derive(Debug, Clone, PartialEq)]
pub struct VitalState {
    /// Stable identity, assigned at creation.
    patient_id: PatientId,
    /// Current temperature in °C.
    temperature: f64,
    /// Current flow rate in mL/min.
    flow_rate: f64,
    /// Current pressure in mmHg.
    pressure: f64,
    /// Bubble flag for the most recent step only.
    bubble_present: bool,
    /// Per-step temperature bias.
    temp_drift: f64,
    /// Per-step flow bias.
    flow_drift: f64,
    /// Per-step pressure bias.
    pressure_drift: f64,
}

impl VitalState {
    /// Create a patient at baseline vitals with freshly sampled drift.
    ///
    /// The config is expected to have passed [`DriftConfig::validate`];
    /// unusable bounds sample as zero rather than panicking.
    pub fn create(patient_id: PatientId, config: &DriftConfig, rng: &mut impl Rng) -> Self {
        Self {
            patient_id,
            temperature: config.baseline_temperature,
            flow_rate: config.baseline_flow_rate,
            pressure: config.baseline_pressure,
            bubble_present: false,
            temp_drift: symmetric(rng, config.temp_drift_bound),
            flow_drift: symmetric(rng, config.flow_drift_bound),
            pressure_drift: symmetric(rng, config.pressure_drift_bound),
        }
    }

    /// Apply one tick of noise and drift, and redraw the bubble flag.
    ///
    /// Draw order is temperature, flow, pressure, bubble. Keeping it fixed
    /// keeps seeded runs reproducible.
    pub fn advance(&mut self, config: &DriftConfig, rng: &mut impl Rng) {
        self.temperature += symmetric(rng, config.temp_noise) + self.temp_drift;
        self.flow_rate += symmetric(rng, config.flow_noise) + self.flow_drift;
        self.pressure += symmetric(rng, config.pressure_noise) + self.pressure_drift;
        self.bubble_present = rng.random::<f64>() < config.bubble_probability;
    }

    /// Copy the current values into an immutable [`Reading`].
    pub const fn snapshot(&self, time_step: u64) -> Reading {
        Reading {
            patient_id: self.patient_id,
            temperature: self.temperature,
            flow_rate: self.flow_rate,
            pressure: self.pressure,
            bubble_present: self.bubble_present,
            time_step,
        }
    }

    /// Return the patient's identity.
    pub const fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    /// Return the current temperature in °C.
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Return the current flow rate in mL/min.
    pub const fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    /// Return the current pressure in mmHg.
    pub const fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Return whether a bubble was detected on the most recent step.
    pub const fn bubble_present(&self) -> bool {
        self.bubble_present
    }

    /// Return the `(temperature, flow, pressure)` drift coefficients.
    pub const fn drift(&self) -> (f64, f64, f64) {
        (self.temp_drift, self.flow_drift, self.pressure_drift)
    }
}

/// Draw uniformly from `[-bound, bound]`.
///
/// Returns `0.0` for a zero, negative, or NaN bound, and for a bound whose
/// range cannot be sampled.
fn symmetric(rng: &mut impl Rng, bound: f64) -> f64 {
    if bound > 0.0 {
        Uniform::new_inclusive(-bound, bound).map_or(0.0, |range| range.sample(rng))
    } else {
        0.0
    }
}
