//! Text rendering for readings and alerts.
//!
//! Everything here produces plain strings for log lines and terminal
//! output. Units and decimal places come from [`VitalSign`].

use vitals_types::{AlertEvent, PatientId, Reading, VitalSign};

use crate::alerts::alert_message;

/// Column headings of [`render_step_table`], in order.
pub const TABLE_COLUMNS: [&str; 5] = ["Patient", "Temperature", "Flow rate", "Pressure", "Bubble"];

/// Format a value with its unit, e.g. `37.2 °C` or `118 mmHg`.
pub fn format_value(vital: VitalSign, value: f64) -> String {
    let precision = vital.precision();
    format!("{value:.precision$} {}", vital.unit())
}

/// Prefix a message with the patient it concerns: `Patient 3: ...`.
pub fn patient_line(patient_id: PatientId, message: &str) -> String {
    format!("Patient {patient_id}: {message}")
}

/// Render an alert as a full display line.
pub fn alert_line(alert: &AlertEvent) -> String {
    patient_line(alert.patient_id, &alert_message(alert))
}

/// Render one reading as a single table row.
pub fn reading_row(reading: &Reading) -> String {
    format!(
        "{:>7} | {:>11} | {:>12} | {:>8} | {}",
        reading.patient_id,
        format_value(VitalSign::Temperature, reading.temperature),
        format_value(VitalSign::FlowRate, reading.flow_rate),
        format_value(VitalSign::Pressure, reading.pressure),
        if reading.bubble_present { "yes" } else { "no" },
    )
}

/// Render a step's readings as a table with a header line.
pub fn render_step_table(readings: &[Reading]) -> String {
    let [patient, temperature, flow, pressure, bubble] = TABLE_COLUMNS;
    let mut table =
        format!("{patient:>7} | {temperature:>11} | {flow:>12} | {pressure:>8} | {bubble}\n");
    for reading in readings {
        table.push_str(&reading_row(reading));
        table.push('\n');
    }
    table
}

/// Summarise one vital over a patient's series: first, last, and range.
///
/// Returns `None` for an empty series.
pub fn trend_summary(series: &[Reading], vital: VitalSign) -> Option<String> {
    let first = series.first()?.value(vital);
    let last = series.last()?.value(vital);
    let (min, max) = series
        .iter()
        .map(|reading| reading.value(vital))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    Some(format!(
        "{} -> {} (min {}, max {})",
        format_value(vital, first),
        format_value(vital, last),
        format_value(vital, min),
        format_value(vital, max),
    ))
}

#[cfg(test)]
mod tests {
    use vitals_types::AlertKind;

    use super::*;

    fn reading(patient: u32, time_step: u64, temperature: f64) -> Reading {
        Reading {
            patient_id: PatientId::new(patient),
            temperature,
            flow_rate: 5.04,
            pressure: 119.6,
            bubble_present: false,
            time_step,
        }
    }

    #[test]
    fn values_use_unit_and_precision() {
        assert_eq!(format_value(VitalSign::Temperature, 37.24), "37.2 °C");
        assert_eq!(format_value(VitalSign::FlowRate, 4.96), "5.0 mL/min");
        assert_eq!(format_value(VitalSign::Pressure, 119.6), "120 mmHg");
    }

    #[test]
    fn alert_line_names_the_patient() {
        let alert = AlertEvent {
            patient_id: PatientId::new(3),
            time_step: 12,
            kind: AlertKind::BubbleDetected,
            value: None,
        };
        assert_eq!(alert_line(&alert), "Patient 3: Bubble detected!");
    }

    #[test]
    fn table_has_header_and_one_row_per_reading() {
        let readings = vec![reading(1, 0, 37.0), reading(2, 0, 38.4)];
        let table = render_step_table(&readings);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.first().is_some_and(|l| l.contains("Temperature")));
        assert!(lines.get(2).is_some_and(|l| l.contains("38.4 °C")));
        assert!(lines.get(1).is_some_and(|l| l.contains("5.0 mL/min")));
        assert!(lines.get(1).is_some_and(|l| l.contains("120 mmHg")));
    }

    #[test]
    fn trend_summary_reports_range() {
        let series = vec![reading(1, 0, 37.0), reading(1, 1, 37.6), reading(1, 2, 37.3)];
        assert_eq!(
            trend_summary(&series, VitalSign::Temperature).as_deref(),
            Some("37.0 °C -> 37.3 °C (min 37.0 °C, max 37.6 °C)")
        );
    }

    #[test]
    fn trend_summary_of_nothing_is_none() {
        assert_eq!(trend_summary(&[], VitalSign::Pressure), None);
    }
}
