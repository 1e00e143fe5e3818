//! Alarm type inference from threat detection report (TDR) assessments

use serde::{Deserialize, Serialize};

use super::alarm::ThreatAlarmType;

/// Whether the scanner could assess the region at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityAssessment {
    #[default]
    NoInterference,
    /// The region is too dense to see through
    Shield,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
    Explosive,
    ProhibitedItem,
    Contraband,
    Anomaly,
    #[default]
    #[serde(other)]
    Other,
}

/// One assessment entry of a reported threat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TdrAssessment {
    #[serde(default)]
    pub ability: AbilityAssessment,
    #[serde(default)]
    pub category: ThreatCategory,
    /// Free-form category description, e.g. "LAPTOP" or "LIQUID"
    #[serde(default)]
    pub description: String,
}

/// A reported threat with its assessment list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TdrThreatItem {
    #[serde(default)]
    pub assessments: Vec<TdrAssessment>,
}

/// Derive the alarm type of a reported threat from its first assessment.
///
/// Precedence: a shield assessment wins, then a "LAPTOP" description, then
/// the category. Prohibited items are told apart by their description.
pub fn alarm_type_from_tdr_item(item: &TdrThreatItem) -> ThreatAlarmType {
    let Some(assessment) = item.assessments.first() else {
        return ThreatAlarmType::Undefined;
    };

    if assessment.ability == AbilityAssessment::Shield {
        return ThreatAlarmType::Shield;
    }

    if assessment.description == "LAPTOP" {
        return ThreatAlarmType::Laptop;
    }

    match assessment.category {
        ThreatCategory::Explosive => ThreatAlarmType::Explosive,
        ThreatCategory::ProhibitedItem => match assessment.description.as_str() {
            "LIQUID" => ThreatAlarmType::Liquid,
            "WEAPON" => ThreatAlarmType::Weapon,
            "SHARP" => ThreatAlarmType::Sharp,
            "GUN" => ThreatAlarmType::Gun,
            "BLUNT" => ThreatAlarmType::Blunt,
            _ => ThreatAlarmType::Undefined,
        },
        ThreatCategory::Contraband => ThreatAlarmType::Contraband,
        ThreatCategory::Anomaly => ThreatAlarmType::Anomaly,
        ThreatCategory::Other => ThreatAlarmType::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ability: AbilityAssessment, category: ThreatCategory, desc: &str) -> TdrThreatItem {
        TdrThreatItem {
            assessments: vec![TdrAssessment {
                ability,
                category,
                description: desc.to_string(),
            }],
        }
    }

    #[test]
    fn test_empty_assessments_is_undefined() {
        assert_eq!(
            alarm_type_from_tdr_item(&TdrThreatItem::default()),
            ThreatAlarmType::Undefined
        );
    }

    #[test]
    fn test_shield_wins_over_everything() {
        let it = item(AbilityAssessment::Shield, ThreatCategory::Explosive, "LAPTOP");
        assert_eq!(alarm_type_from_tdr_item(&it), ThreatAlarmType::Shield);
    }

    #[test]
    fn test_laptop_description_wins_over_category() {
        let it = item(AbilityAssessment::NoInterference, ThreatCategory::Explosive, "LAPTOP");
        assert_eq!(alarm_type_from_tdr_item(&it), ThreatAlarmType::Laptop);
    }

    #[test]
    fn test_categories() {
        let cases = [
            (ThreatCategory::Explosive, "", ThreatAlarmType::Explosive),
            (ThreatCategory::Contraband, "", ThreatAlarmType::Contraband),
            (ThreatCategory::Anomaly, "x", ThreatAlarmType::Anomaly),
            (ThreatCategory::Other, "GUN", ThreatAlarmType::Undefined),
            (ThreatCategory::ProhibitedItem, "LIQUID", ThreatAlarmType::Liquid),
            (ThreatCategory::ProhibitedItem, "WEAPON", ThreatAlarmType::Weapon),
            (ThreatCategory::ProhibitedItem, "SHARP", ThreatAlarmType::Sharp),
            (ThreatCategory::ProhibitedItem, "GUN", ThreatAlarmType::Gun),
            (ThreatCategory::ProhibitedItem, "BLUNT", ThreatAlarmType::Blunt),
            (ThreatCategory::ProhibitedItem, "gun", ThreatAlarmType::Undefined),
            (ThreatCategory::ProhibitedItem, "", ThreatAlarmType::Undefined),
        ];
        for (category, desc, expected) in cases {
            let it = item(AbilityAssessment::NoInterference, category, desc);
            assert_eq!(alarm_type_from_tdr_item(&it), expected, "{category:?} {desc}");
        }
    }

    #[test]
    fn test_only_first_assessment_counts() {
        let mut it = item(AbilityAssessment::NoInterference, ThreatCategory::Anomaly, "");
        it.assessments.push(TdrAssessment {
            ability: AbilityAssessment::Shield,
            ..Default::default()
        });
        assert_eq!(alarm_type_from_tdr_item(&it), ThreatAlarmType::Anomaly);
    }

    #[test]
    fn test_unknown_category_deserializes_as_other() {
        let it: TdrThreatItem = serde_json::from_str(
            r#"{ "assessments": [ { "category": "biological", "description": "GUN" } ] }"#,
        )
        .unwrap();
        assert_eq!(it.assessments[0].category, ThreatCategory::Other);
        assert_eq!(alarm_type_from_tdr_item(&it), ThreatAlarmType::Undefined);
    }
}
