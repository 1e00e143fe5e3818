//! Visibility states of a threat box

use serde::{Deserialize, Serialize};
use std::fmt;

/// `Cleared` is terminal: once entered, a threat never leaves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatState {
    #[default]
    Inactive,
    Active,
    Cleared,
    Suspected,
}

impl ThreatState {
    pub fn is_cleared(self) -> bool {
        self == ThreatState::Cleared
    }
}

impl fmt::Display for ThreatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThreatState::Inactive => "inactive",
            ThreatState::Active => "active",
            ThreatState::Cleared => "cleared",
            ThreatState::Suspected => "suspected",
        };
        f.write_str(s)
    }
}
