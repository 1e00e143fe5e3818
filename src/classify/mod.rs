//! Threat classification: alarm categories and detection-report inference

mod alarm;
mod tdr;

pub use alarm::{
    Rgb, ThreatAlarmType, ThreatGenerationType, threat_alarm_type_from_name, threat_color,
    threat_type_name,
};
pub use tdr::{
    AbilityAssessment, TdrAssessment, TdrThreatItem, ThreatCategory, alarm_type_from_tdr_item,
};
