use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("cannot draw {requested} unique employee ids from a space of {available}")]
    Exhausted { requested: u64, available: u64 },
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot write '{}': {source}", .path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    pub(crate) fn destination(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| GenerationError::Destination { path, source }
    }
}
