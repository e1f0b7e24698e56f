//! History, orchestration, and run loop for the vitals monitor.
//!
//! This crate owns everything that happens around a single tick: recording
//! it, exposing recent history, and driving ticks on a schedule.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `vitals-config.yaml` into
//!   strongly-typed structs.
//! - [`driver`] -- [`SimulationDriver`], which composes the population, the
//!   history store, and the run's random source.
//! - [`history`] -- [`HistoryStore`] with unbounded and ring-buffer backends.
//! - [`operator`] -- Shared stop and speed controls for a running loop.
//! - [`runner`] -- The async tick loop and the per-step callback trait.
//!
//! [`SimulationDriver`]: driver::SimulationDriver
//! [`HistoryStore`]: history::HistoryStore

pub mod config;
pub mod driver;
pub mod history;
pub mod operator;
pub mod runner;
