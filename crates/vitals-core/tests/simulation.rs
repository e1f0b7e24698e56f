//! End-to-end tests for the driver and its history backends.
//!
//! These exercise the public API only: build a driver, tick it, and check
//! what history exposes afterwards.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use vitals_core::config::{HistoryBackend, MonitorConfig};
use vitals_core::driver::{SimulationDriver, StepError};
use vitals_core::history::{HistoryError, HistoryLog, HistoryStore, RingHistory, Violation};
use vitals_patients::DriftConfig;
use vitals_types::{PatientId, Reading};

fn group_by_patient(readings: &[Reading]) -> BTreeMap<PatientId, Vec<u64>> {
    let mut grouped: BTreeMap<PatientId, Vec<u64>> = BTreeMap::new();
    for reading in readings {
        grouped
            .entry(reading.patient_id)
            .or_default()
            .push(reading.time_step);
    }
    grouped
}

#[test]
fn two_patients_three_ticks() {
    let mut driver = SimulationDriver::new(2, DriftConfig::default(), 2024).unwrap();
    for _ in 0..3 {
        driver.step().unwrap();
    }

    let all = driver.window(usize::MAX);
    assert_eq!(all.len(), 6);

    let grouped = group_by_patient(&all);
    assert_eq!(grouped.len(), 2);
    for steps in grouped.values() {
        assert_eq!(steps, &vec![0, 1, 2]);
    }
}

#[test]
fn vitals_stay_finite_for_a_long_seeded_run() {
    let mut driver = SimulationDriver::new(10, DriftConfig::default(), 7).unwrap();
    driver.warm_up(5_000).unwrap();

    for state in driver.population().patients() {
        assert!(state.temperature().is_finite());
        assert!(state.flow_rate().is_finite());
        assert!(state.pressure().is_finite());
    }
    assert!(driver.window(5_000).iter().all(Reading::is_finite));
}

#[test]
fn every_step_has_one_reading_per_patient_in_canonical_order() {
    let mut driver = SimulationDriver::new(4, DriftConfig::default(), 3).unwrap();
    driver.warm_up(25).unwrap();

    let window = driver.window(25);
    for (index, chunk) in window.chunks(4).enumerate() {
        let ids: Vec<u32> = chunk.iter().map(|r| r.patient_id.into_inner()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let expected = u64::try_from(index).unwrap();
        assert!(chunk.iter().all(|r| r.time_step == expected));
    }
}

#[test]
fn window_is_exactly_the_last_k_steps() {
    let mut driver = SimulationDriver::new(3, DriftConfig::default(), 11).unwrap();
    driver.warm_up(4).unwrap();
    // m < k: everything.
    assert_eq!(driver.window(10).len(), 12);

    driver.warm_up(16).unwrap();
    // m >= k: exactly k steps' worth.
    let window = driver.window(10);
    assert_eq!(window.len(), 30);
    let first = window.first().map(|r| r.time_step);
    let last = window.last().map(|r| r.time_step);
    assert_eq!(first, Some(10));
    assert_eq!(last, Some(19));
}

#[test]
fn ring_backend_matches_unbounded_window() {
    let mut unbounded = SimulationDriver::new(3, DriftConfig::default(), 5).unwrap();
    let mut ring = SimulationDriver::with_history(
        3,
        DriftConfig::default(),
        5,
        Box::new(RingHistory::with_capacity(10).unwrap()),
    )
    .unwrap();

    unbounded.warm_up(40).unwrap();
    ring.warm_up(40).unwrap();

    assert_eq!(unbounded.window(10), ring.window(10));
    assert_eq!(ring.history().step_count(), 10);
    assert_eq!(unbounded.history().step_count(), 40);
}

#[test]
fn driver_surfaces_history_invariant_violations() {
    // A history that already holds step 0 makes the driver's first step a
    // repeat, which must fail loudly.
    let mut log = HistoryLog::new();
    let seeded = Reading {
        patient_id: PatientId::new(1),
        temperature: 37.0,
        flow_rate: 5.0,
        pressure: 120.0,
        bubble_present: false,
        time_step: 0,
    };
    log.append(vec![seeded]).unwrap();

    let mut driver =
        SimulationDriver::with_history(1, DriftConfig::default(), 1, Box::new(log)).unwrap();
    let err = driver.step().unwrap_err();
    assert!(matches!(
        err,
        StepError::History {
            source: HistoryError::InvariantViolation {
                violation: Violation::OutOfSequence {
                    expected: 1,
                    found: 0
                }
            }
        }
    ));
}

#[test]
fn config_driven_driver_honours_population_and_interval() {
    let yaml = "
simulation:
  patients: 6
  step_interval_minutes: 5
  seed: 9
history:
  backend: ring
  capacity: 4
";
    let config = MonitorConfig::parse(yaml).unwrap();
    assert_eq!(config.history.backend, HistoryBackend::Ring);

    let mut driver = SimulationDriver::from_config(&config).unwrap();
    driver.warm_up(6).unwrap();

    assert_eq!(driver.population().len(), 6);
    assert_eq!(driver.history().step_count(), 4);
    assert_eq!(driver.elapsed_minutes(driver.time_step()), 30);
}
