use formwire_model::FieldId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Validation messages by field identifier.
///
/// Only invalid fields have an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<FieldId, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, id: FieldId, message: impl Into<String>) {
        self.0.insert(id, message.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &str)> {
        self.0.iter().map(|(id, message)| (id, message.as_str()))
    }
}

impl FromIterator<(FieldId, String)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (FieldId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
