use crate::path::Path;
use thiserror::Error;

pub type PathResult<T> = Result<T, PathError>;

/// Errors raised while reading or writing the model along a path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("The path cannot be empty")]
    EmptyPath,

    /// `container` is the compact JSON of the value that lacks `key`.
    #[error("The key \"{key}\" does not exist on item {container}.")]
    PathNotFound {
        path: Path,
        key: String,
        container: String,
    },

    #[error("Cannot use \"{key}\" as an array index at {path}")]
    InvalidIndex { path: Path, key: String },
}

impl PathError {
    pub fn path_not_found(path: &Path, key: impl Into<String>, container: impl ToString) -> Self {
        Self::PathNotFound {
            path: path.clone(),
            key: key.into(),
            container: container.to_string(),
        }
    }

    pub fn invalid_index(path: &Path, key: impl Into<String>) -> Self {
        Self::InvalidIndex {
            path: path.clone(),
            key: key.into(),
        }
    }

    /// Key that failed to resolve, if the error is about a missing key
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            Self::PathNotFound { key, .. } => Some(key),
            _ => None,
        }
    }
}
