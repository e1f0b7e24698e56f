//! Fixed-size patient population.
//!
//! The [`Population`] owns every [`VitalState`] in canonical (creation)
//! order and the shared step counter. Stepping advances every patient and
//! returns one [`Reading`] per patient, all tagged with the same
//! `time_step`.

use rand::Rng;
use tracing::debug;
use vitals_types::{PatientId, Reading};

use crate::config::DriftConfig;
use crate::error::PatientError;
use crate::vitals::VitalState;

/// All simulated patients of one run.
///
/// Population size is fixed at construction: patients are never added or
/// removed during a run.
#[derive(Debug, Clone)]
pub struct Population {
    /// Patients in canonical order (ascending identity).
    patients: Vec<VitalState>,
    /// Drift model shared by every patient.
    config: DriftConfig,
    /// Step number the next call to [`step`](Self::step) will use.
    time_step: u64,
}

impl Population {
    /// Create `size` patients with identities `1..=size`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidConfig`] if `size` is zero or the
    /// drift configuration fails validation.
    pub fn new(size: u32, config: DriftConfig, rng: &mut impl Rng) -> Result<Self, PatientError> {
        if size == 0 {
            return Err(PatientError::InvalidConfig {
                reason: "population size must be at least 1".to_owned(),
            });
        }
        config.validate()?;

        let patients: Vec<VitalState> = (1..=size)
            .map(|raw| VitalState::create(PatientId::new(raw), &config, rng))
            .collect();

        debug!(patients = size, "Population created");

        Ok(Self {
            patients,
            config,
            time_step: 0,
        })
    }

    /// Advance every patient by one tick and snapshot the result.
    ///
    /// Readings are returned in canonical order and all carry the current
    /// step number, after which the step counter increments. The whole
    /// population is mutated before this returns, so callers never observe
    /// a partially advanced step.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::TimeStepOverflow`] if the step counter is
    /// exhausted. No patient is mutated in that case.
    pub fn step(&mut self, rng: &mut impl Rng) -> Result<Vec<Reading>, PatientError> {
        let time_step = self.time_step;
        let next = time_step
            .checked_add(1)
            .ok_or(PatientError::TimeStepOverflow)?;

        let mut readings = Vec::with_capacity(self.patients.len());
        for state in &mut self.patients {
            state.advance(&self.config, rng);
            readings.push(state.snapshot(time_step));
        }

        self.time_step = next;
        Ok(readings)
    }

    /// Return the step number the next tick will carry.
    pub const fn time_step(&self) -> u64 {
        self.time_step
    }

    /// Return the number of patients.
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Always `false`: construction rejects empty populations.
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Return all patients in canonical order.
    pub fn patients(&self) -> &[VitalState] {
        &self.patients
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn make_population(size: u32, seed: u64) -> (Population, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let population = Population::new(size, DriftConfig::default(), &mut rng).unwrap();
        (population, rng)
    }

    #[test]
    fn identities_are_assigned_in_creation_order() {
        let (population, _rng) = make_population(4, 42);
        let ids: Vec<u32> = population
            .patients()
            .iter()
            .map(|p| p.patient_id().into_inner())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(population.time_step(), 0);
    }

    #[test]
    fn empty_population_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);
        let result = Population::new(0, DriftConfig::default(), &mut rng);
        assert!(matches!(result, Err(PatientError::InvalidConfig { .. })));
    }

    #[test]
    fn invalid_drift_config_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);
        let config = DriftConfig {
            bubble_probability: 2.0,
            ..DriftConfig::default()
        };
        assert!(Population::new(3, config, &mut rng).is_err());
    }

    #[test]
    fn step_returns_one_reading_per_patient_with_shared_time_step() {
        let (mut population, mut rng) = make_population(5, 42);

        for expected_step in 0..3_u64 {
            let readings = population.step(&mut rng).unwrap();
            assert_eq!(readings.len(), 5);
            assert!(readings.iter().all(|r| r.time_step == expected_step));
            let ids: Vec<u32> = readings.iter().map(|r| r.patient_id.into_inner()).collect();
            assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        }
        assert_eq!(population.time_step(), 3);
    }

    #[test]
    fn readings_stay_finite_over_long_runs() {
        let (mut population, mut rng) = make_population(10, 2024);
        for _ in 0..10_000 {
            let readings = population.step(&mut rng).unwrap();
            assert!(readings.iter().all(Reading::is_finite));
        }
    }

    #[test]
    fn same_seed_produces_identical_runs() {
        let (mut a, mut rng_a) = make_population(3, 77);
        let (mut b, mut rng_b) = make_population(3, 77);
        for _ in 0..25 {
            assert_eq!(a.step(&mut rng_a).unwrap(), b.step(&mut rng_b).unwrap());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let (mut a, mut rng_a) = make_population(3, 1);
        let (mut b, mut rng_b) = make_population(3, 2);
        assert_ne!(a.step(&mut rng_a).unwrap(), b.step(&mut rng_b).unwrap());
    }

    #[test]
    fn unsampleable_noise_is_rejected_before_any_draw() {
        let mut rng = SmallRng::seed_from_u64(42);
        let config = DriftConfig {
            pressure_noise: 1e308,
            ..DriftConfig::default()
        };
        assert!(matches!(
            Population::new(2, config, &mut rng),
            Err(PatientError::InvalidConfig { .. })
        ));
    }
}
