//! Runs a scenario against a fresh [`ThreatVolume`]

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::spec::{ScenarioSpec, Step, ThreatSpec};
use crate::classify::{TdrThreatItem, alarm_type_from_tdr_item};
use crate::threat::{RecordingActor, SharedActor, ThreatVolume};

/// A failed expectation
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub step: usize,
    pub threat: Option<String>,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_run: usize,
    pub failures: Vec<StepFailure>,
    pub execution_time_ms: u64,
}

/// Plays scenario steps, standing in for the view controller and renderer
#[derive(Debug, Default)]
pub struct ScenarioRunner {
    stop_on_failure: bool,
}

/// Renderer side of a run: the actors it owns, by threat id
type ActorTable = HashMap<String, Arc<RwLock<RecordingActor>>>;

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop a scenario at its first failed expectation
    pub fn set_stop_on_failure(&mut self, stop: bool) {
        self.stop_on_failure = stop;
    }

    pub fn run(&self, spec: &ScenarioSpec) -> ScenarioResult {
        let start = Instant::now();
        let (mut bag, mut actors) = build_bag(spec);
        let mut failures = Vec::new();
        let mut steps_run = 0;

        for (index, step) in spec.steps.iter().enumerate() {
            steps_run += 1;
            tracing::debug!(scenario = %spec.name, step = index, ?step, "step");
            if let Some(failure) = apply_step(&mut bag, &mut actors, index, step) {
                tracing::debug!(
                    scenario = %spec.name,
                    step = index,
                    expected = %failure.expected,
                    actual = %failure.actual,
                    "expectation failed"
                );
                failures.push(failure);
                if self.stop_on_failure {
                    break;
                }
            }
        }

        ScenarioResult {
            name: spec.name.clone(),
            success: failures.is_empty(),
            steps_run,
            failures,
            execution_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn build_bag(spec: &ScenarioSpec) -> (ThreatVolume, ActorTable) {
    let mut bag = ThreatVolume::new(spec.bounds);
    let mut actors = ActorTable::new();

    for threat_spec in &spec.threats {
        let position = bag.add_threat(&threat_spec.volume, &threat_spec.id, &threat_spec.text, None);
        let Some(threat) = bag.get_mut(position) else {
            continue;
        };
        threat.set_alarm_type(alarm_type_of(threat_spec));
        threat.set_gen_type(threat_spec.generation);
        threat.set_laptop(threat_spec.is_laptop);
        threat.set_mass(threat_spec.mass);
        threat.set_offset(threat_spec.offset);

        if threat_spec.actor {
            let owned = RecordingActor::shared();
            let shared: SharedActor = owned.clone();
            threat.set_actor(&shared);
            actors.insert(threat_spec.id.clone(), owned);
        }
    }
    (bag, actors)
}

fn alarm_type_of(spec: &ThreatSpec) -> crate::classify::ThreatAlarmType {
    spec.alarm_type.unwrap_or_else(|| {
        alarm_type_from_tdr_item(&TdrThreatItem {
            assessments: spec.assessments.clone(),
        })
    })
}

fn format_opacity(opacity: Option<f64>) -> String {
    match opacity {
        Some(o) => format!("{o:.2}"),
        None => "none".to_string(),
    }
}

fn missing(step: usize, id: &str) -> StepFailure {
    StepFailure {
        step,
        threat: Some(id.to_string()),
        expected: "threat present".to_string(),
        actual: "missing".to_string(),
    }
}

/// Apply one step; expectations return a failure when they do not hold
fn apply_step(
    bag: &mut ThreatVolume,
    actors: &mut ActorTable,
    index: usize,
    step: &Step,
) -> Option<StepFailure> {
    match step {
        Step::SetState {
            threat,
            state,
            flags,
        } => match bag.find_mut(threat) {
            Some(t) => {
                t.set_threat_state(*state, flags);
                None
            }
            None => Some(missing(index, threat)),
        },
        Step::Refresh { flags } => {
            bag.refresh(flags);
            None
        }
        Step::Activate { threat, flags } => match bag.position(threat) {
            Some(position) => {
                bag.activate(position, flags);
                None
            }
            None => Some(missing(index, threat)),
        },
        Step::Clear { threat } => match bag.position(threat) {
            Some(position) => {
                bag.clear(position);
                None
            }
            None => Some(missing(index, threat)),
        },
        Step::ClearAll => {
            bag.clear_all();
            None
        }
        Step::Suspect { threat } => match bag.find_mut(threat) {
            Some(t) => {
                t.suspect_threat();
                None
            }
            None => Some(missing(index, threat)),
        },
        Step::SuspectAll => {
            bag.suspect_all();
            None
        }
        Step::NullActor { threat } => match bag.find_mut(threat) {
            Some(t) => {
                t.null_actor();
                None
            }
            None => Some(missing(index, threat)),
        },
        Step::DestroyActor { threat } => {
            actors.remove(threat);
            None
        }
        Step::Expect {
            threat,
            state,
            opacity,
        } => {
            let Some(t) = bag.find(threat) else {
                return Some(missing(index, threat));
            };
            let actual_opacity = actors.get(threat).and_then(|a| a.read().opacity());

            let state_ok = state.is_none_or(|s| s == t.state());
            let opacity_ok = opacity.is_none_or(|o| Some(o) == actual_opacity);
            if state_ok && opacity_ok {
                return None;
            }

            let mut expected = Vec::new();
            let mut actual = Vec::new();
            if let Some(s) = state {
                expected.push(format!("state {s}"));
                actual.push(format!("state {}", t.state()));
            }
            if opacity.is_some() {
                expected.push(format!("opacity {}", format_opacity(*opacity)));
                actual.push(format!("opacity {}", format_opacity(actual_opacity)));
            }
            Some(StepFailure {
                step: index,
                threat: Some(threat.clone()),
                expected: expected.join(", "),
                actual: actual.join(", "),
            })
        }
        Step::ExpectPending { count } => {
            let pending = bag.pending_count();
            (pending != *count).then(|| StepFailure {
                step: index,
                threat: None,
                expected: format!("{count} pending"),
                actual: format!("{pending} pending"),
            })
        }
        Step::ExpectSlab { slab, threats } => {
            let inside = bag.threats_in_slab(slab);
            (inside != *threats).then(|| StepFailure {
                step: index,
                threat: None,
                expected: format!("in slab [{}]", threats.join(", ")),
                actual: format!("in slab [{}]", inside.join(", ")),
            })
        }
    }
}
