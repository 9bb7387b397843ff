//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong loading fixtures, writing artifacts, or
/// parsing command-line arguments.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fixture case '{case}': {message}")]
    Fixture { case: String, message: String },
    #[error("bad argument '{0}': expected <kind>:<value> with kind int|uint|char|ptr|str")]
    CliArg(String),
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(PathBuf),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
