//! Simulation driver: one logical tick for external callers.
//!
//! The [`SimulationDriver`] composes a [`Population`], a [`HistoryStore`],
//! and the run's random source. Each call to [`step`](SimulationDriver::step)
//!
//! 1. advances every patient (the whole population, before anything else),
//! 2. appends the resulting readings to history,
//! 3. returns the same readings to the caller.
//!
//! Alert evaluation, logging, and persistence happen afterwards, in the
//! caller. A driver is owned by exactly one run; concurrent runs each
//! build their own driver, so nothing here is shared or locked.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::debug;
use vitals_patients::{DriftConfig, PatientError, Population};
use vitals_types::{PatientId, Reading};

use crate::config::{HistoryBackend, MonitorConfig};
use crate::history::{HistoryError, HistoryLog, HistoryStore, RingHistory};

/// Errors that can occur while stepping the simulation.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// The population could not be built or advanced.
    #[error("patient error: {source}")]
    Patient {
        /// The underlying patient error.
        #[from]
        source: PatientError,
    },

    /// History rejected the step. Fatal to the run.
    #[error("history error: {source}")]
    History {
        /// The underlying history error.
        #[from]
        source: HistoryError,
    },
}

/// Owns all state of one simulation run.
#[derive(Debug)]
pub struct SimulationDriver {
    /// The simulated patients.
    population: Population,
    /// Record of every step (or the most recent ones, for a ring).
    history: Box<dyn HistoryStore>,
    /// Random source for every draw in this run.
    rng: SmallRng,
    /// Simulated minutes per step.
    step_interval_minutes: u32,
}

impl SimulationDriver {
    /// Build a driver with `patients` patients and an unbounded history.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Patient`] if the population cannot be built.
    pub fn new(patients: u32, drift: DriftConfig, seed: u64) -> Result<Self, StepError> {
        Self::with_history(patients, drift, seed, Box::new(HistoryLog::new()))
    }

    /// Build a driver over an explicit history backend.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Patient`] if the population cannot be built.
    pub fn with_history(
        patients: u32,
        drift: DriftConfig,
        seed: u64,
        history: Box<dyn HistoryStore>,
    ) -> Result<Self, StepError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let population = Population::new(patients, drift, &mut rng)?;
        Ok(Self {
            population,
            history,
            rng,
            step_interval_minutes: 1,
        })
    }

    /// Build a driver from the monitor configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] if the population or the history backend
    /// cannot be built.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, StepError> {
        let history: Box<dyn HistoryStore> = match config.history.backend {
            HistoryBackend::Unbounded => Box::new(HistoryLog::new()),
            HistoryBackend::Ring => Box::new(RingHistory::with_capacity(config.history.capacity)?),
        };
        let driver = Self::with_history(
            config.simulation.patients,
            config.drift.clone(),
            config.simulation.seed,
            history,
        )?;
        Ok(driver.with_step_interval(config.simulation.step_interval_minutes))
    }

    /// Set the simulated minutes represented by one step.
    #[must_use]
    pub fn with_step_interval(mut self, minutes: u32) -> Self {
        self.step_interval_minutes = minutes;
        self
    }

    /// Advance the simulation by one tick.
    ///
    /// Returns one reading per patient in canonical order. The same batch
    /// has already been appended to history when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::History`] if history rejects the step. This is
    /// a driver bug and must end the run. The population has already
    /// advanced by then, so the driver and its history no longer agree on
    /// the current step; do not step this driver again.
    pub fn step(&mut self) -> Result<Vec<Reading>, StepError> {
        let readings = self.population.step(&mut self.rng)?;
        self.history.append(readings.clone())?;

        debug!(
            time_step = self.population.time_step().saturating_sub(1),
            patients = readings.len(),
            history_steps = self.history.step_count(),
            "Step recorded"
        );

        Ok(readings)
    }

    /// Run `steps` ticks whose readings are only recorded in history.
    ///
    /// Used to pre-fill trend windows before the first evaluated tick.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] from the first failing step.
    pub fn warm_up(&mut self, steps: u32) -> Result<(), StepError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Readings from the most recent `last_n_steps` steps.
    pub fn window(&self, last_n_steps: usize) -> Vec<Reading> {
        self.history.window(last_n_steps)
    }

    /// One patient's readings over the most recent `last_n_steps` steps.
    pub fn patient_series(&self, patient_id: PatientId, last_n_steps: usize) -> Vec<Reading> {
        self.history.patient_series(patient_id, last_n_steps)
    }

    /// The most recently recorded step, if any.
    pub fn latest(&self) -> Option<&[Reading]> {
        self.history.latest()
    }

    /// Step number the next tick will carry.
    pub const fn time_step(&self) -> u64 {
        self.population.time_step()
    }

    /// Simulated minutes elapsed at the given step.
    pub fn elapsed_minutes(&self, time_step: u64) -> u64 {
        time_step.saturating_mul(u64::from(self.step_interval_minutes))
    }

    /// The simulated population.
    pub const fn population(&self) -> &Population {
        &self.population
    }

    /// The history backend.
    pub fn history(&self) -> &dyn HistoryStore {
        self.history.as_ref()
    }
}
