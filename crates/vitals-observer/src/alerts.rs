//! Threshold alert evaluation.
//!
//! [`evaluate`] is a pure function from one step's readings and a
//! threshold set to a list of [`AlertEvent`]s. Per reading, rules run in
//! a fixed order and several kinds can fire for the same patient:
//!
//! 1. temperature: `> temp_max` is high, else `< temp_min` is low
//! 2. pressure: `> pressure_max` is high, else `< pressure_min` is low
//! 3. flow rate: `> flow_max` is high, else `< flow_min` is low
//! 4. bubble present
//!
//! Comparisons are strict. A value exactly on a bound does not alert.
//! Bounds are not validated; an inverted pair simply over- or under-alerts.
//!
//! [`alert_message`] renders an event for people. Wording and rounding
//! live here, at the presentation boundary, not in the event itself.

use vitals_types::{AlertEvent, AlertKind, AlertThresholds, Reading, VitalSign};

/// Ordered per-vital rules: `(vital, high kind, low kind)`.
const RANGE_RULES: [(VitalSign, AlertKind, AlertKind); 3] = [
    (
        VitalSign::Temperature,
        AlertKind::HighTemperature,
        AlertKind::LowTemperature,
    ),
    (
        VitalSign::Pressure,
        AlertKind::HighPressure,
        AlertKind::LowPressure,
    ),
    (VitalSign::FlowRate, AlertKind::HighFlow, AlertKind::LowFlow),
];

/// Evaluate one step's readings against the thresholds.
///
/// Alerts are returned reading by reading, in rule order within each
/// reading. Calling this twice with the same inputs yields the same output.
pub fn evaluate(readings: &[Reading], thresholds: &AlertThresholds) -> Vec<AlertEvent> {
    let mut alerts = Vec::new();
    for reading in readings {
        evaluate_reading(reading, thresholds, &mut alerts);
    }
    alerts
}

/// Apply every rule to a single reading, appending to `out`.
fn evaluate_reading(reading: &Reading, thresholds: &AlertThresholds, out: &mut Vec<AlertEvent>) {
    for (vital, high, low) in RANGE_RULES {
        let value = reading.value(vital);
        let (min, max) = thresholds.bounds(vital);
        let kind = if value > max {
            Some(high)
        } else if value < min {
            Some(low)
        } else {
            None
        };
        if let Some(kind) = kind {
            out.push(AlertEvent {
                patient_id: reading.patient_id,
                time_step: reading.time_step,
                kind,
                value: Some(value),
            });
        }
    }

    if reading.bubble_present {
        out.push(AlertEvent {
            patient_id: reading.patient_id,
            time_step: reading.time_step,
            kind: AlertKind::BubbleDetected,
            value: None,
        });
    }
}

/// Short human-readable label for an alert kind.
pub const fn alert_label(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::HighTemperature => "High temperature",
        AlertKind::LowTemperature => "Low temperature",
        AlertKind::HighPressure => "High pressure",
        AlertKind::LowPressure => "Low pressure",
        AlertKind::HighFlow => "High flow rate",
        AlertKind::LowFlow => "Low flow rate",
        AlertKind::BubbleDetected => "Bubble detected!",
    }
}

/// Render an alert as a warning line, e.g. `High temperature 39.0 °C`.
///
/// Temperature and flow use one decimal, pressure none.
pub fn alert_message(alert: &AlertEvent) -> String {
    let label = alert_label(alert.kind);
    match (alert.kind.vital(), alert.value) {
        (Some(vital), Some(value)) => {
            format!("{label} {}", crate::format::format_value(vital, value))
        }
        _ => label.to_owned(),
    }
}
