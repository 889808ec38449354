use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The dataset could not be obtained as a JSON document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read dataset {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dataset {} is not valid JSON", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Structural validation failure; `location` names the offending index and field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid dataset at {location}: {problem}")]
pub struct SchemaError {
    pub location: String,
    pub problem: String,
}

impl SchemaError {
    pub(super) fn new(location: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            problem: problem.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
