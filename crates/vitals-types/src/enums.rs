//! Enumeration types for the vitals monitor.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vital signs
// ---------------------------------------------------------------------------

/// One of the continuously sampled vital signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalSign {
    /// Body temperature in degrees Celsius.
    Temperature,
    /// Infusion line pressure in mmHg.
    Pressure,
    /// Infusion flow rate in mL/min.
    FlowRate,
}

impl VitalSign {
    /// Display unit for this vital sign.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Pressure => "mmHg",
            Self::FlowRate => "mL/min",
        }
    }

    /// Number of decimal places used when presenting a value.
    pub const fn precision(self) -> usize {
        match self {
            Self::Temperature | Self::FlowRate => 1,
            Self::Pressure => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Alert kinds
// ---------------------------------------------------------------------------

/// The kind of threshold violation an alert reports.
///
/// Variants are declared in evaluation order: temperature, pressure, flow,
/// then bubble detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Temperature strictly above the configured maximum.
    HighTemperature,
    /// Temperature strictly below the configured minimum.
    LowTemperature,
    /// Pressure strictly above the configured maximum.
    HighPressure,
    /// Pressure strictly below the configured minimum.
    LowPressure,
    /// Flow rate strictly above the configured maximum.
    HighFlow,
    /// Flow rate strictly below the configured minimum.
    LowFlow,
    /// An air bubble was detected in the line during this step.
    BubbleDetected,
}

impl AlertKind {
    /// The vital sign this alert is about, or `None` for bubble detection.
    pub const fn vital(self) -> Option<VitalSign> {
        match self {
            Self::HighTemperature | Self::LowTemperature => Some(VitalSign::Temperature),
            Self::HighPressure | Self::LowPressure => Some(VitalSign::Pressure),
            Self::HighFlow | Self::LowFlow => Some(VitalSign::FlowRate),
            Self::BubbleDetected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_kinds_map_to_their_vital() {
        assert_eq!(AlertKind::HighTemperature.vital(), Some(VitalSign::Temperature));
        assert_eq!(AlertKind::LowPressure.vital(), Some(VitalSign::Pressure));
        assert_eq!(AlertKind::LowFlow.vital(), Some(VitalSign::FlowRate));
        assert_eq!(AlertKind::BubbleDetected.vital(), None);
    }

    #[test]
    fn alert_kind_serializes_snake_case() {
        let json = serde_json::to_string(&AlertKind::HighFlow).unwrap_or_default();
        assert_eq!(json, "\"high_flow\"");
    }

    #[test]
    fn pressure_is_presented_without_decimals() {
        assert_eq!(VitalSign::Pressure.precision(), 0);
        assert_eq!(VitalSign::Temperature.precision(), 1);
    }
}
