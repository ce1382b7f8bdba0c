use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario has no {0}")]
    Empty(&'static str),
    #[error("obstacle {index} has a non-positive size")]
    InvalidObstacle { index: usize },
}
