//! JSON model of a screening scenario

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::error::{Result, ScenarioError};
use crate::classify::{TdrAssessment, ThreatAlarmType, ThreatGenerationType};
use crate::geometry::{Slab, Volume};
use crate::threat::{DEFAULT_OFFSET, ThreatState, ViewFlags};

/// A bag with its threats and a sequence of operator/view steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Physical scan bounds; threat boxes are clipped to them
    pub bounds: Volume,
    #[serde(default)]
    pub threats: Vec<ThreatSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatSpec {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub volume: Volume,
    /// Explicit type; inferred from `assessments` when absent
    #[serde(default)]
    pub alarm_type: Option<ThreatAlarmType>,
    #[serde(default)]
    pub assessments: Vec<TdrAssessment>,
    #[serde(default)]
    pub generation: ThreatGenerationType,
    #[serde(default)]
    pub is_laptop: bool,
    #[serde(default)]
    pub mass: f64,
    #[serde(default = "default_offset")]
    pub offset: u16,
    /// Whether the renderer created an actor for this threat
    #[serde(default = "default_true")]
    pub actor: bool,
}

fn default_offset() -> u16 {
    DEFAULT_OFFSET
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum Step {
    SetState {
        threat: String,
        state: ThreatState,
        #[serde(default)]
        flags: ViewFlags,
    },
    Refresh {
        #[serde(default)]
        flags: ViewFlags,
    },
    Activate {
        threat: String,
        #[serde(default)]
        flags: ViewFlags,
    },
    Clear {
        threat: String,
    },
    ClearAll,
    Suspect {
        threat: String,
    },
    SuspectAll,
    NullActor {
        threat: String,
    },
    /// The renderer destroys the actor behind the threat's back
    DestroyActor {
        threat: String,
    },
    Expect {
        threat: String,
        #[serde(default)]
        state: Option<ThreatState>,
        /// Last opacity the actor received
        #[serde(default)]
        opacity: Option<f64>,
    },
    ExpectPending {
        count: usize,
    },
    /// Pending threats reaching into the slab, in declaration order
    ExpectSlab {
        slab: Slab,
        threats: Vec<String>,
    },
}

impl Step {
    /// Threat id the step targets, if any
    pub fn threat(&self) -> Option<&str> {
        match self {
            Step::SetState { threat, .. }
            | Step::Activate { threat, .. }
            | Step::Clear { threat }
            | Step::Suspect { threat }
            | Step::NullActor { threat }
            | Step::DestroyActor { threat }
            | Step::Expect { threat, .. } => Some(threat.as_str()),
            Step::Refresh { .. }
            | Step::ClearAll
            | Step::SuspectAll
            | Step::ExpectPending { .. }
            | Step::ExpectSlab { .. } => None,
        }
    }

    pub fn is_expectation(&self) -> bool {
        matches!(
            self,
            Step::Expect { .. } | Step::ExpectPending { .. } | Step::ExpectSlab { .. }
        )
    }
}

impl ScenarioSpec {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: ScenarioSpec =
            serde_json::from_str(&text).map_err(|source| ScenarioError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check threat ids are unique and every step refers to a declared threat
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for threat in &self.threats {
            if !ids.insert(threat.id.as_str()) {
                return Err(ScenarioError::DuplicateThreat {
                    scenario: self.name.clone(),
                    id: threat.id.clone(),
                });
            }
        }

        for (step, entry) in self.steps.iter().enumerate() {
            if let Some(id) = entry.threat()
                && !ids.contains(id)
            {
                return Err(ScenarioError::UnknownThreat {
                    scenario: self.name.clone(),
                    step,
                    id: id.to_string(),
                });
            }
            if let Step::Expect {
                opacity: Some(opacity),
                ..
            } = entry
                && !(0.0..=1.0).contains(opacity)
            {
                return Err(ScenarioError::InvalidOpacity {
                    scenario: self.name.clone(),
                    step,
                    opacity: *opacity,
                });
            }
        }
        Ok(())
    }

    /// Number of expectation steps
    pub fn expectation_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_expectation()).count()
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "sample",
        "tags": ["tip"],
        "bounds": { "p0": [0, 0, 0], "p1": [100, 100, 100] },
        "threats": [
            { "id": "T1", "volume": { "p0": [1, 1, 1], "p1": [2, 2, 2] }, "generation": "atr" },
            { "id": "L", "volume": { "p0": [5, 5, 5], "p1": [9, 9, 9] },
              "assessments": [ { "category": "other", "description": "LAPTOP" } ] }
        ],
        "steps": [
            { "do": "set_state", "threat": "T1", "state": "active",
              "flags": { "machine_threats_enabled": true } },
            { "do": "clear_all" },
            { "do": "expect", "threat": "T1", "state": "cleared", "opacity": 0.0 },
            { "do": "expect_pending", "count": 0 }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let spec: ScenarioSpec = serde_json::from_str(SAMPLE).unwrap();
        assert!(spec.validate().is_ok());
        assert_eq!(spec.threats.len(), 2);
        assert_eq!(spec.threats[0].offset, DEFAULT_OFFSET);
        assert!(spec.threats[0].actor);
        assert_eq!(spec.threats[0].generation, ThreatGenerationType::AtrGen);
        assert_eq!(spec.threats[1].alarm_type, None);
        assert_eq!(spec.expectation_count(), 2);
        assert!(spec.has_any_tag(&["tip".to_string()]));
        assert!(!spec.has_any_tag(&["laptop".to_string()]));
        match &spec.steps[0] {
            Step::SetState { flags, state, .. } => {
                assert!(flags.machine_threats_enabled);
                assert!(!flags.tip_bag);
                assert_eq!(*state, ThreatState::Active);
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_unknown_threat_rejected() {
        let mut spec: ScenarioSpec = serde_json::from_str(SAMPLE).unwrap();
        spec.steps.push(Step::Clear {
            threat: "nope".to_string(),
        });
        assert!(matches!(
            spec.validate(),
            Err(ScenarioError::UnknownThreat { step: 4, .. })
        ));
    }

    #[test]
    fn test_duplicate_threat_rejected() {
        let mut spec: ScenarioSpec = serde_json::from_str(SAMPLE).unwrap();
        let dup = spec.threats[0].clone();
        spec.threats.push(dup);
        assert!(matches!(
            spec.validate(),
            Err(ScenarioError::DuplicateThreat { .. })
        ));
    }

    #[test]
    fn test_invalid_opacity_rejected() {
        let mut spec: ScenarioSpec = serde_json::from_str(SAMPLE).unwrap();
        spec.steps.push(Step::Expect {
            threat: "T1".to_string(),
            state: None,
            opacity: Some(1.5),
        });
        assert!(matches!(
            spec.validate(),
            Err(ScenarioError::InvalidOpacity { .. })
        ));
    }
}
