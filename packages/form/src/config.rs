use formwire_model::Strictness;
use serde::{Deserialize, Serialize};

/// Serializable form options.
///
/// Validation and callbacks are code, so they are passed to
/// [`Form`](crate::Form) directly rather than living here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    /// Fail when a field's path is missing from the model
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Show a field's error once it is dirty, not only once it is touched.
    /// Fields may override this individually.
    #[serde(default)]
    pub show_error_if_dirty: bool,
}

fn default_strict() -> bool {
    true
}

impl FormConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    pub fn strictness(&self) -> Strictness {
        if self.strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            show_error_if_dirty: false,
        }
    }
}
