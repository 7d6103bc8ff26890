use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Display identifier of a field: its path segments joined with `.`.
///
/// Keys the status and error maps. Cloning shares the string, so the same
/// identifier can be handed to every render without reallocating.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Arc<str>);

impl FieldId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of the form root (empty string)
    pub fn root() -> Self {
        Self::new("")
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&Path> for FieldId {
    fn from(path: &Path) -> Self {
        FieldId::new(path.to_string())
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        FieldId::new(id)
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        FieldId(Arc::from(id))
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for FieldId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
