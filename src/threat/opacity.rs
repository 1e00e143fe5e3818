//! Opacity decision table for threat boxes.
//!
//! Given a threat's state, whether it is the laptop, who generated it and the
//! current view flags, [`decide_opacity`] names the row that applies and the
//! opacity to write, if any. Rows are checked in this order:
//!
//! | view         | threat     | condition                               | opacity                     |
//! |--------------|------------|-----------------------------------------|-----------------------------|
//! | laptop       | laptop     | inactive / active                       | INACTIVE / ACTIVE           |
//! | laptop       | other      | state not cleared                       | HIDE                        |
//! | normal       | any        | machine threats off and not operator    | unchanged                   |
//! | normal       | other      | TIP bag, not suspected, not operator    | unchanged                   |
//! | normal       | other      | TIP bag otherwise                       | INACTIVE / ACTIVE           |
//! | normal       | other      | inactive while slabbing the laptop      | unchanged                   |
//! | normal       | other      | inactive / active                       | INACTIVE / ACTIVE           |
//! | normal       | laptop     | state not cleared, not slabbing         | HIDE                        |
//! | normal       | laptop     | inactive in surface view                | unchanged                   |
//! | normal       | laptop     | inactive / active                       | INACTIVE / ACTIVE           |
//!
//! Any state not named in a row (suspected, or a requested cleared) leaves the
//! opacity unchanged.

use serde::{Deserialize, Serialize};

use super::state::ThreatState;
use crate::classify::ThreatGenerationType;

pub const CLEAR_OPACITY: f64 = 0.0;
pub const HIDE_OPACITY: f64 = 0.01;
pub const ACTIVE_OPACITY: f64 = 0.95;
pub const INACTIVE_OPACITY: f64 = 0.30;

/// View-mode flags that drive a threat's opacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewFlags {
    /// The viewer is focused on the laptop in the bag
    pub laptop_view: bool,
    pub machine_threats_enabled: bool,
    pub bag_suspected: bool,
    /// The bag carries a projected test threat
    pub tip_bag: bool,
    pub slabbing_laptop: bool,
    pub surface_view: bool,
}

/// Which row of the decision table applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpacityRule {
    LaptopFocus,
    HiddenByLaptopFocus,
    MachineThreatsDisabled,
    TipBagGated,
    TipBag,
    SlabbingLaptop,
    Ordinary,
    LaptopHidden,
    SurfaceView,
    LaptopSlab,
    /// No row sets an opacity for this state
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityDecision {
    pub rule: OpacityRule,
    /// Opacity to write, `None` to leave the current value
    pub opacity: Option<f64>,
}

impl OpacityDecision {
    fn keep(rule: OpacityRule) -> Self {
        Self {
            rule,
            opacity: None,
        }
    }

    fn set(rule: OpacityRule, opacity: f64) -> Self {
        Self {
            rule,
            opacity: Some(opacity),
        }
    }

    /// INACTIVE or ACTIVE for those states, unchanged for the rest
    fn by_state(rule: OpacityRule, state: ThreatState) -> Self {
        match state {
            ThreatState::Inactive => Self::set(rule, INACTIVE_OPACITY),
            ThreatState::Active => Self::set(rule, ACTIVE_OPACITY),
            _ => Self::keep(OpacityRule::Unchanged),
        }
    }
}

/// Pick the opacity for a threat that has just taken `state`
pub fn decide_opacity(
    state: ThreatState,
    is_laptop: bool,
    generation: ThreatGenerationType,
    flags: &ViewFlags,
) -> OpacityDecision {
    let operator = generation == ThreatGenerationType::OperatorGen;

    if flags.laptop_view {
        return if is_laptop {
            OpacityDecision::by_state(OpacityRule::LaptopFocus, state)
        } else if !state.is_cleared() {
            OpacityDecision::set(OpacityRule::HiddenByLaptopFocus, HIDE_OPACITY)
        } else {
            OpacityDecision::keep(OpacityRule::Unchanged)
        };
    }

    if !(flags.machine_threats_enabled || operator) {
        return OpacityDecision::keep(OpacityRule::MachineThreatsDisabled);
    }

    if !is_laptop {
        return match state {
            ThreatState::Inactive | ThreatState::Active if flags.tip_bag => {
                if flags.bag_suspected || operator {
                    OpacityDecision::by_state(OpacityRule::TipBag, state)
                } else {
                    OpacityDecision::keep(OpacityRule::TipBagGated)
                }
            }
            ThreatState::Inactive if flags.slabbing_laptop => {
                OpacityDecision::keep(OpacityRule::SlabbingLaptop)
            }
            _ => OpacityDecision::by_state(OpacityRule::Ordinary, state),
        };
    }

    if !state.is_cleared() && !flags.slabbing_laptop {
        return OpacityDecision::set(OpacityRule::LaptopHidden, HIDE_OPACITY);
    }

    match state {
        ThreatState::Inactive if flags.surface_view => {
            OpacityDecision::keep(OpacityRule::SurfaceView)
        }
        _ => OpacityDecision::by_state(OpacityRule::LaptopSlab, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ThreatGenerationType::{AtrGen, OperatorGen};
    use crate::threat::ThreatState::{Active, Cleared, Inactive, Suspected};

    fn flags(bits: u8) -> ViewFlags {
        ViewFlags {
            laptop_view: bits & 1 != 0,
            machine_threats_enabled: bits & 2 != 0,
            bag_suspected: bits & 4 != 0,
            tip_bag: bits & 8 != 0,
            slabbing_laptop: bits & 16 != 0,
            surface_view: bits & 32 != 0,
        }
    }

    fn normal() -> ViewFlags {
        ViewFlags {
            machine_threats_enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_laptop_focus_on_laptop() {
        let f = ViewFlags {
            laptop_view: true,
            ..Default::default()
        };
        assert_eq!(decide_opacity(Active, true, AtrGen, &f).opacity, Some(ACTIVE_OPACITY));
        assert_eq!(decide_opacity(Inactive, true, AtrGen, &f).opacity, Some(INACTIVE_OPACITY));
        assert_eq!(decide_opacity(Suspected, true, AtrGen, &f).opacity, None);
    }

    #[test]
    fn test_laptop_focus_hides_other_threats() {
        let f = ViewFlags {
            laptop_view: true,
            ..Default::default()
        };
        let d = decide_opacity(Active, false, OperatorGen, &f);
        assert_eq!(d.rule, OpacityRule::HiddenByLaptopFocus);
        assert_eq!(d.opacity, Some(HIDE_OPACITY));
        assert_eq!(decide_opacity(Suspected, false, AtrGen, &f).opacity, Some(HIDE_OPACITY));
        assert_eq!(decide_opacity(Cleared, false, AtrGen, &f).opacity, None);
    }

    #[test]
    fn test_machine_threats_disabled_leaves_atr_untouched() {
        for state in [Inactive, Active, Suspected] {
            for is_laptop in [false, true] {
                let d = decide_opacity(state, is_laptop, AtrGen, &ViewFlags::default());
                assert_eq!(d.rule, OpacityRule::MachineThreatsDisabled);
                assert_eq!(d.opacity, None);
            }
        }
        let d = decide_opacity(Active, false, OperatorGen, &ViewFlags::default());
        assert_eq!(d.opacity, Some(ACTIVE_OPACITY));
    }

    #[test]
    fn test_tip_bag_gate() {
        let mut f = normal();
        f.tip_bag = true;
        assert_eq!(decide_opacity(Inactive, false, AtrGen, &f).rule, OpacityRule::TipBagGated);
        assert_eq!(decide_opacity(Active, false, AtrGen, &f).opacity, None);
        assert_eq!(decide_opacity(Inactive, false, OperatorGen, &f).opacity, Some(INACTIVE_OPACITY));
        f.bag_suspected = true;
        assert_eq!(decide_opacity(Active, false, AtrGen, &f).opacity, Some(ACTIVE_OPACITY));
        // The slabbing flag does not matter for TIP bags.
        f.slabbing_laptop = true;
        assert_eq!(decide_opacity(Inactive, false, AtrGen, &f).opacity, Some(INACTIVE_OPACITY));
    }

    #[test]
    fn test_ordinary_threat_while_slabbing() {
        let mut f = normal();
        f.slabbing_laptop = true;
        assert_eq!(decide_opacity(Inactive, false, AtrGen, &f).opacity, None);
        assert_eq!(decide_opacity(Active, false, AtrGen, &f).opacity, Some(ACTIVE_OPACITY));
        f.slabbing_laptop = false;
        assert_eq!(decide_opacity(Inactive, false, AtrGen, &f).opacity, Some(INACTIVE_OPACITY));
    }

    #[test]
    fn test_laptop_in_normal_view() {
        let mut f = normal();
        assert_eq!(decide_opacity(Active, true, AtrGen, &f).opacity, Some(HIDE_OPACITY));
        assert_eq!(decide_opacity(Suspected, true, AtrGen, &f).opacity, Some(HIDE_OPACITY));
        assert_eq!(decide_opacity(Cleared, true, AtrGen, &f).opacity, None);

        f.slabbing_laptop = true;
        assert_eq!(decide_opacity(Active, true, AtrGen, &f).opacity, Some(ACTIVE_OPACITY));
        assert_eq!(decide_opacity(Inactive, true, AtrGen, &f).opacity, Some(INACTIVE_OPACITY));

        f.surface_view = true;
        assert_eq!(decide_opacity(Inactive, true, AtrGen, &f).rule, OpacityRule::SurfaceView);
        assert_eq!(decide_opacity(Active, true, AtrGen, &f).opacity, Some(ACTIVE_OPACITY));
    }

    #[test]
    fn test_every_decision_is_a_known_opacity() {
        let known = [HIDE_OPACITY, ACTIVE_OPACITY, INACTIVE_OPACITY];
        for bits in 0..64 {
            let f = flags(bits);
            for state in [Inactive, Active, Cleared, Suspected] {
                for is_laptop in [false, true] {
                    for generation in [AtrGen, OperatorGen, ThreatGenerationType::Unknown] {
                        let a = decide_opacity(state, is_laptop, generation, &f);
                        let b = decide_opacity(state, is_laptop, generation, &f);
                        assert_eq!(a, b);
                        if let Some(o) = a.opacity {
                            assert!(known.contains(&o));
                        } else {
                            assert_ne!(a.rule, OpacityRule::LaptopFocus);
                        }
                        if state == Cleared {
                            assert_eq!(a.opacity, None);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_opacity_constants() {
        assert_eq!(CLEAR_OPACITY, 0.0);
        assert_eq!(HIDE_OPACITY, 0.01);
        assert_eq!(ACTIVE_OPACITY, 0.95);
        assert_eq!(INACTIVE_OPACITY, 0.30);
    }
}
