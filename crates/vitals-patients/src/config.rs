//! Parameters of the vital drift model.
//!
//! The [`DriftConfig`] struct bundles every tunable of the random-walk
//! model so callers (driver, tests, YAML config) can override defaults.
//! Defaults reproduce the reference model: baselines of 37.0 °C,
//! 5.0 mL/min and 120.0 mmHg, drift bounds of 0.05/0.05/0.2, per-step
//! noise bounds of 0.2/0.5/2.0 and a 0.5% bubble chance per step.

use serde::Deserialize;

use crate::error::PatientError;

/// Configuration for the per-patient drift model.
///
/// Every `*_drift_bound` and `*_noise` value `b` describes a symmetric
/// uniform draw over `[-b, b]`. Drift is sampled once per patient, noise
/// once per patient per step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Starting temperature for every patient (default: 37.0 °C).
    pub baseline_temperature: f64,

    /// Starting flow rate for every patient (default: 5.0 mL/min).
    pub baseline_flow_rate: f64,

    /// Starting pressure for every patient (default: 120.0 mmHg).
    pub baseline_pressure: f64,

    /// Bound of the per-patient temperature drift (default: 0.05).
    pub temp_drift_bound: f64,

    /// Bound of the per-patient flow drift (default: 0.05).
    pub flow_drift_bound: f64,

    /// Bound of the per-patient pressure drift (default: 0.2).
    pub pressure_drift_bound: f64,

    /// Bound of the per-step temperature noise (default: 0.2).
    pub temp_noise: f64,

    /// Bound of the per-step flow noise (default: 0.5).
    pub flow_noise: f64,

    /// Bound of the per-step pressure noise (default: 2.0).
    pub pressure_noise: f64,

    /// Probability of a bubble event on any given step (default: 0.005).
    pub bubble_probability: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            baseline_temperature: 37.0,
            baseline_flow_rate: 5.0,
            baseline_pressure: 120.0,
            temp_drift_bound: 0.05,
            flow_drift_bound: 0.05,
            pressure_drift_bound: 0.2,
            temp_noise: 0.2,
            flow_noise: 0.5,
            pressure_noise: 2.0,
            bubble_probability: 0.005,
        }
    }
}

/// Largest accepted drift or noise bound.
///
/// A draw from `[-b, b]` needs the width `2b` to be finite.
pub const MAX_BOUND: f64 = 8.0e307;

impl DriftConfig {
    /// Check that every parameter can be sampled from.
    ///
    /// Baselines must be finite, bounds non-negative and at most
    /// [`MAX_BOUND`], and the bubble probability within `[0, 1]`.
    pub fn validate(&self) -> Result<(), PatientError> {
        let baselines = [
            ("baseline_temperature", self.baseline_temperature),
            ("baseline_flow_rate", self.baseline_flow_rate),
            ("baseline_pressure", self.baseline_pressure),
        ];
        for (name, value) in baselines {
            if !value.is_finite() {
                return Err(PatientError::InvalidConfig {
                    reason: format!("{name} must be finite, got {value}"),
                });
            }
        }

        let bounds = [
            ("temp_drift_bound", self.temp_drift_bound),
            ("flow_drift_bound", self.flow_drift_bound),
            ("pressure_drift_bound", self.pressure_drift_bound),
            ("temp_noise", self.temp_noise),
            ("flow_noise", self.flow_noise),
            ("pressure_noise", self.pressure_noise),
        ];
        for (name, value) in bounds {
            if !value.is_finite() || value < 0.0 {
                return Err(PatientError::InvalidConfig {
                    reason: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
            if value > MAX_BOUND {
                return Err(PatientError::InvalidConfig {
                    reason: format!("{name} must be at most {MAX_BOUND:e}, got {value:e}"),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.bubble_probability) {
            return Err(PatientError::InvalidConfig {
                reason: format!(
                    "bubble_probability must be within [0, 1], got {}",
                    self.bubble_probability
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DriftConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_bound_is_rejected() {
        let config = DriftConfig {
            pressure_noise: -1.0,
            ..DriftConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PatientError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn bound_too_wide_to_sample_is_rejected() {
        let config = DriftConfig {
            pressure_noise: 1e308,
            ..DriftConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PatientError::InvalidConfig { .. })
        ));

        let at_limit = DriftConfig {
            temp_drift_bound: MAX_BOUND,
            ..DriftConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn nan_baseline_is_rejected() {
        let config = DriftConfig {
            baseline_temperature: f64::NAN,
            ..DriftConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        let config = DriftConfig {
            bubble_probability: 1.5,
            ..DriftConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DriftConfig {
            bubble_probability: f64::NAN,
            ..DriftConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_bounds_are_allowed() {
        let config = DriftConfig {
            temp_drift_bound: 0.0,
            temp_noise: 0.0,
            bubble_probability: 0.0,
            ..DriftConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
