//! Alerting and presentation for the vitals monitor.
//!
//! This crate turns a step's [`Reading`](vitals_types::Reading)s into
//! things people and other tools consume:
//!
//! - [`alerts`]: threshold rules producing [`AlertEvent`](vitals_types::AlertEvent)s
//! - [`format`]: unit-aware text for tables, alert lines, and trends
//! - [`records`]: the append-only CSV log read by the ward dashboard
//!
//! Nothing here owns simulation state. The engine calls into it after each
//! evaluated tick.

pub mod alerts;
pub mod format;
pub mod records;

pub use alerts::{alert_message, evaluate};
pub use records::{CsvRecordSink, RecordError};
