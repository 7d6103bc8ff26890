//! Error types for the form runtime

use formwire_model::{FieldId, PathError};
use thiserror::Error;

pub type FormResult<T> = Result<T, FormError>;

/// Misconfiguration surfaced to the host.
///
/// Validation failures are not errors; they live in the error map.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// A field's path does not resolve against the model in strict mode
    #[error("The key \"{key}\" does not exist on item {container}.")]
    StrictPathMismatch {
        id: FieldId,
        key: String,
        container: String,
    },

    /// A field or array piece was rendered without its enclosing scope
    #[error("Missing context: {0}")]
    MissingContext(String),

    #[error("Unknown field: {0}")]
    UnknownField(FieldId),

    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

impl FormError {
    /// Turn a failed strict lookup for `id` into a `StrictPathMismatch`
    pub(crate) fn strict_mismatch(id: &FieldId, error: PathError) -> Self {
        match error {
            PathError::PathNotFound { key, container, .. } => Self::StrictPathMismatch {
                id: id.clone(),
                key,
                container,
            },
            other => Self::Path(other),
        }
    }

    pub fn missing_context(message: impl Into<String>) -> Self {
        Self::MissingContext(message.into())
    }
}
