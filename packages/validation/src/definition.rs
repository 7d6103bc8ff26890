use formwire_model::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Checks one value; `Some(message)` means invalid
pub type ValidatorFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Validation definition, shaped like the model it checks
#[derive(Clone)]
pub enum Validation {
    /// Validator applied to the value at this position
    Field(ValidatorFn),

    /// Definitions for the members of an object
    Object(BTreeMap<String, Validation>),

    /// Definitions for an array and its items
    Array(ArrayValidation),
}

impl Validation {
    pub fn field<F>(validator: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Validation::Field(Arc::new(validator))
    }

    pub fn object<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Validation)>,
    {
        Validation::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array(array: ArrayValidation) -> Self {
        Validation::Array(array)
    }

    /// Definition for a member of an object definition
    pub fn member(&self, key: &str) -> Option<&Validation> {
        match self {
            Validation::Object(members) => members.get(key),
            _ => None,
        }
    }
}

impl From<ArrayValidation> for Validation {
    fn from(array: ArrayValidation) -> Self {
        Validation::Array(array)
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Field(_) => f.write_str("Field(<fn>)"),
            Validation::Object(members) => f.debug_map().entries(members.iter()).finish(),
            Validation::Array(array) => fmt::Debug::fmt(array, f),
        }
    }
}

/// Validation for an array: every item, and the array as a whole
#[derive(Clone, Default)]
pub struct ArrayValidation {
    /// Applied to each element, keyed by the element's index
    pub items: Option<Box<Validation>>,

    /// Applied to the array itself, keyed at the array's own path
    pub array: Option<ValidatorFn>,
}

impl ArrayValidation {
    pub fn new(items: Validation) -> Self {
        Self {
            items: Some(Box::new(items)),
            array: None,
        }
    }

    /// Only a whole-array check, no per-item definition
    pub fn whole<F>(validator: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            items: None,
            array: Some(Arc::new(validator)),
        }
    }

    pub fn with_array<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.array = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for ArrayValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayValidation")
            .field("items", &self.items)
            .field("array", &self.array.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
