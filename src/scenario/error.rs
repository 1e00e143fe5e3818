use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("scenario '{scenario}' declares threat '{id}' more than once")]
    DuplicateThreat { scenario: String, id: String },

    #[error("scenario '{scenario}' step {step} refers to unknown threat '{id}'")]
    UnknownThreat {
        scenario: String,
        step: usize,
        id: String,
    },

    #[error("scenario '{scenario}' step {step} expects opacity {opacity}, outside [0, 1]")]
    InvalidOpacity {
        scenario: String,
        step: usize,
        opacity: f64,
    },
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
