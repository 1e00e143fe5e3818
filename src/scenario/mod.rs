//! Screening scenarios: JSON-described bags driven through the threat model

mod error;
mod loader;
mod runner;
mod spec;

pub use error::{Result, ScenarioError};
pub use loader::ScenarioLoader;
pub use runner::{ScenarioResult, ScenarioRunner, StepFailure};
pub use spec::{ScenarioSpec, Step, ThreatSpec};
