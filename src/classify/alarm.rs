//! Alarm categories with their display names and box colors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display color as normalized RGB
pub type Rgb = [f64; 3];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatAlarmType {
    Explosive,
    Liquid,
    Weapon,
    Contraband,
    Anomaly,
    Bulk,
    Shield,
    LiquidAerosolGas,
    Laptop,
    Sharp,
    Gun,
    Blunt,
    #[default]
    Undefined,
}

/// Who produced a threat box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatGenerationType {
    /// Found by the scanner's automated threat recognition
    #[serde(alias = "atr")]
    AtrGen,
    /// Marked by hand on the workstation
    #[serde(alias = "operator")]
    OperatorGen,
    #[default]
    Unknown,
}

// Name and color per alarm type. Read-only for the life of the process.
static ALARM_TABLE: [(ThreatAlarmType, &str, Rgb); 13] = [
    (ThreatAlarmType::Explosive, "Explosive", [1.0, 0.0, 0.0]),
    (ThreatAlarmType::Liquid, "Liquid", [0.0, 0.5, 1.0]),
    (ThreatAlarmType::Weapon, "Weapon", [1.0, 0.5, 0.0]),
    (ThreatAlarmType::Contraband, "Contraband", [1.0, 0.0, 1.0]),
    (ThreatAlarmType::Anomaly, "Anomaly", [1.0, 1.0, 0.0]),
    (ThreatAlarmType::Bulk, "Bulk", [0.8, 0.2, 0.2]),
    (ThreatAlarmType::Shield, "Shield", [0.6, 0.6, 0.6]),
    (ThreatAlarmType::LiquidAerosolGas, "LAG", [0.0, 1.0, 1.0]),
    (ThreatAlarmType::Laptop, "Laptop", [0.0, 1.0, 0.0]),
    (ThreatAlarmType::Sharp, "Sharp", [1.0, 0.75, 0.0]),
    (ThreatAlarmType::Gun, "Gun", [0.75, 0.0, 0.25]),
    (ThreatAlarmType::Blunt, "Blunt", [0.5, 0.25, 0.0]),
    (ThreatAlarmType::Undefined, "Undefined", [1.0, 1.0, 1.0]),
];

impl ThreatAlarmType {
    /// All alarm types in table order
    pub fn all() -> impl Iterator<Item = ThreatAlarmType> {
        ALARM_TABLE.iter().map(|(ty, _, _)| *ty)
    }

    fn entry(self) -> &'static (ThreatAlarmType, &'static str, Rgb) {
        // Every variant has a row; Undefined is the last one.
        ALARM_TABLE
            .iter()
            .find(|(ty, _, _)| *ty == self)
            .unwrap_or(&ALARM_TABLE[ALARM_TABLE.len() - 1])
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn color(self) -> Rgb {
        self.entry().2
    }
}

impl fmt::Display for ThreatAlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name of an alarm type
pub fn threat_type_name(ty: ThreatAlarmType) -> &'static str {
    ty.name()
}

/// Box color of an alarm type
pub fn threat_color(ty: ThreatAlarmType) -> Rgb {
    ty.color()
}

/// Look up an alarm type by exact, case-sensitive display name.
/// Unknown names map to [`ThreatAlarmType::Undefined`].
pub fn threat_alarm_type_from_name(name: &str) -> ThreatAlarmType {
    ALARM_TABLE
        .iter()
        .find(|(_, n, _)| *n == name)
        .map(|(ty, _, _)| *ty)
        .unwrap_or_default()
}
