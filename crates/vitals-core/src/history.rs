//! Step history: the record of every tick, queryable by recency.
//!
//! [`HistoryStore`] is the append/window interface the driver talks to.
//! Two backends implement it:
//!
//! - [`HistoryLog`] keeps every step for the whole run (unbounded).
//! - [`RingHistory`] keeps only the most recent `capacity` steps.
//!
//! Both enforce the same invariants on append: a step is a non-empty batch
//! of readings sharing one `time_step`, that `time_step` is exactly one
//! greater than the previous step's, and the batch holds one reading per
//! patient in canonical (ascending id) order, the same roster every step.
//! The first step fixes the roster. A violation
//! indicates a driver bug and is reported as
//! [`HistoryError::InvariantViolation`]; it is never silently dropped.

use std::collections::VecDeque;

use vitals_types::{PatientId, Reading};

/// The specific invariant an append would have broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// The step does not directly follow the previous one.
    #[error("expected time step {expected}, found {found}")]
    OutOfSequence {
        /// The only acceptable time step.
        expected: u64,
        /// The time step carried by the rejected batch.
        found: u64,
    },

    /// Readings within one batch disagree on their time step.
    #[error("step mixes time steps {expected} and {found}")]
    MixedTimeSteps {
        /// Time step of the first reading in the batch.
        expected: u64,
        /// The first time step that differs from it.
        found: u64,
    },

    /// The batch contains no readings.
    #[error("step contains no readings")]
    EmptyStep,

    /// The batch is not one reading per patient in canonical order.
    #[error("step {time_step} does not hold one reading per patient in canonical order")]
    PatientMismatch {
        /// The time step carried by the rejected batch.
        time_step: u64,
    },
}

/// Errors that can occur when recording history.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// An append would break the sequencing invariant.
    #[error("history invariant violation: {violation}")]
    InvariantViolation {
        /// What was violated.
        violation: Violation,
    },

    /// A ring buffer was requested with no room for a single step.
    #[error("ring history capacity must be at least 1")]
    ZeroCapacity,
}

impl From<Violation> for HistoryError {
    fn from(violation: Violation) -> Self {
        Self::InvariantViolation { violation }
    }
}

/// Append/window interface over the step history.
///
/// Callers only depend on this trait, so the backing store can move from
/// an in-memory sequence to a ring buffer (or an external store) without
/// changing them.
pub trait HistoryStore: Send + core::fmt::Debug {
    /// Append one step's readings.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvariantViolation`] if the batch is empty,
    /// mixes time steps, does not directly follow the last step, or does
    /// not match the patient roster.
    fn append(&mut self, step: Vec<Reading>) -> Result<(), HistoryError>;

    /// All readings from the most recent `last_n_steps` steps, flattened
    /// in step order (fewer if the store holds fewer steps).
    fn window(&self, last_n_steps: usize) -> Vec<Reading>;

    /// The most recent step, if any.
    fn latest(&self) -> Option<&[Reading]>;

    /// Number of steps currently held.
    fn step_count(&self) -> usize;

    /// Number of readings currently held.
    fn reading_count(&self) -> usize;

    /// Time step of the last appended step, including evicted history.
    fn last_time_step(&self) -> Option<u64>;

    /// Number of steps dropped to bound memory. Zero for stores that keep
    /// everything.
    fn evicted_steps(&self) -> u64 {
        0
    }

    /// One patient's readings over the most recent `last_n_steps` steps,
    /// in ascending `time_step`.
    fn patient_series(&self, patient_id: PatientId, last_n_steps: usize) -> Vec<Reading> {
        self.window(last_n_steps)
            .into_iter()
            .filter(|reading| reading.patient_id == patient_id)
            .collect()
    }
}

/// Validate a batch against the last recorded time step and the roster.
///
/// Returns the batch's time step on success. The first batch appended to
/// an empty store may carry any time step; its ids must be strictly
/// ascending and become the roster for every later batch.
fn check_step(
    last: Option<u64>,
    roster: &[PatientId],
    step: &[Reading],
) -> Result<u64, Violation> {
    let Some(first) = step.first() else {
        return Err(Violation::EmptyStep);
    };
    let time_step = first.time_step;

    if let Some(other) = step.iter().find(|reading| reading.time_step != time_step) {
        return Err(Violation::MixedTimeSteps {
            expected: time_step,
            found: other.time_step,
        });
    }

    if let Some(previous) = last {
        // A log ending at u64::MAX can never accept another step.
        let expected = previous.checked_add(1).ok_or(Violation::OutOfSequence {
            expected: previous,
            found: time_step,
        })?;
        if time_step != expected {
            return Err(Violation::OutOfSequence {
                expected,
                found: time_step,
            });
        }
    }

    let matches_roster = if roster.is_empty() {
        step.iter()
            .zip(step.iter().skip(1))
            .all(|(a, b)| a.patient_id < b.patient_id)
    } else {
        step.len() == roster.len()
            && step
                .iter()
                .zip(roster)
                .all(|(reading, id)| reading.patient_id == *id)
    };
    if !matches_roster {
        return Err(Violation::PatientMismatch { time_step });
    }

    Ok(time_step)
}

/// Patient ids of a batch, in order.
fn roster_of(step: &[Reading]) -> Vec<PatientId> {
    step.iter().map(|reading| reading.patient_id).collect()
}

// ---------------------------------------------------------------------------
// Unbounded log
// ---------------------------------------------------------------------------

/// In-memory history that keeps every step for the whole run.
///
/// Grows by one step per tick and never shrinks, rewinds, or deduplicates.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    /// Steps in append order.
    steps: Vec<Vec<Reading>>,
    /// Patient ids every step must carry, fixed by the first step.
    roster: Vec<PatientId>,
}

impl HistoryLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            steps: Vec::new(),
            roster: Vec::new(),
        }
    }
}

impl HistoryStore for HistoryLog {
    fn append(&mut self, step: Vec<Reading>) -> Result<(), HistoryError> {
        check_step(self.last_time_step(), &self.roster, &step)?;
        if self.roster.is_empty() {
            self.roster = roster_of(&step);
        }
        self.steps.push(step);
        Ok(())
    }

    fn window(&self, last_n_steps: usize) -> Vec<Reading> {
        let skip = self.steps.len().saturating_sub(last_n_steps);
        self.steps.iter().skip(skip).flatten().cloned().collect()
    }

    fn latest(&self) -> Option<&[Reading]> {
        self.steps.last().map(Vec::as_slice)
    }

    fn step_count(&self) -> usize {
        self.steps.len()
    }

    fn reading_count(&self) -> usize {
        self.steps.iter().map(Vec::len).sum()
    }

    fn last_time_step(&self) -> Option<u64> {
        self.steps
            .last()
            .and_then(|step| step.first())
            .map(|reading| reading.time_step)
    }
}

// ---------------------------------------------------------------------------
// Ring buffer
// ---------------------------------------------------------------------------

/// Fixed-capacity history keeping the most recent `capacity` steps.
///
/// Sequencing is checked against the last step ever appended, so evicting
/// old steps never relaxes the invariant.
#[derive(Debug, Clone)]
pub struct RingHistory {
    /// Retained steps, oldest first.
    steps: VecDeque<Vec<Reading>>,
    /// Maximum number of retained steps.
    capacity: usize,
    /// Time step of the last appended step.
    last_time_step: Option<u64>,
    /// Patient ids every step must carry, fixed by the first step.
    roster: Vec<PatientId>,
    /// Number of steps dropped to make room.
    evicted: u64,
}

impl RingHistory {
    /// Create an empty ring holding at most `capacity` steps.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::ZeroCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }
        Ok(Self {
            steps: VecDeque::with_capacity(capacity),
            capacity,
            last_time_step: None,
            roster: Vec::new(),
            evicted: 0,
        })
    }
}

impl HistoryStore for RingHistory {
    fn append(&mut self, step: Vec<Reading>) -> Result<(), HistoryError> {
        let time_step = check_step(self.last_time_step, &self.roster, &step)?;
        if self.roster.is_empty() {
            self.roster = roster_of(&step);
        }
        if self.steps.len() >= self.capacity {
            self.steps.pop_front();
            self.evicted = self.evicted.saturating_add(1);
        }
        self.steps.push_back(step);
        self.last_time_step = Some(time_step);
        Ok(())
    }

    fn window(&self, last_n_steps: usize) -> Vec<Reading> {
        let skip = self.steps.len().saturating_sub(last_n_steps);
        self.steps.iter().skip(skip).flatten().cloned().collect()
    }

    fn latest(&self) -> Option<&[Reading]> {
        self.steps.back().map(Vec::as_slice)
    }

    fn step_count(&self) -> usize {
        self.steps.len()
    }

    fn reading_count(&self) -> usize {
        self.steps.iter().map(Vec::len).sum()
    }

    fn last_time_step(&self) -> Option<u64> {
        self.last_time_step
    }

    fn evicted_steps(&self) -> u64 {
        self.evicted
    }
}
