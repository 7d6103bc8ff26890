//! # Field Status
//!
//! Per-field interaction metadata: touched (blurred at least once) and dirty
//! (value differs from the one captured at mount).
//!
//! Status updates return `Cow::Borrowed` when nothing changed, so callers can
//! skip notifications without comparing.

use formwire_model::{FieldId, Value};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldStatus {
    pub touched: bool,
    pub dirty: bool,
}

impl FieldStatus {
    pub const DEFAULT: FieldStatus = FieldStatus {
        touched: false,
        dirty: false,
    };

    pub fn new(touched: bool, dirty: bool) -> Self {
        Self { touched, dirty }
    }

    pub fn touched() -> Self {
        Self::new(true, false)
    }

    pub fn pristine(&self) -> bool {
        !self.dirty
    }

    pub fn untouched(&self) -> bool {
        !self.touched
    }
}

pub fn mark_touched(status: &FieldStatus) -> Cow<'_, FieldStatus> {
    if status.touched {
        Cow::Borrowed(status)
    } else {
        Cow::Owned(FieldStatus {
            touched: true,
            ..*status
        })
    }
}

/// Dirty means the current value is not the mount-time value by identity
pub fn recompute_dirty<'a>(
    status: &'a FieldStatus,
    current: &Value,
    initial: &Value,
) -> Cow<'a, FieldStatus> {
    let dirty = !current.same(initial);
    if status.dirty == dirty {
        Cow::Borrowed(status)
    } else {
        Cow::Owned(FieldStatus { dirty, ..*status })
    }
}

/// Status by field identifier
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap(BTreeMap<FieldId, FieldStatus>);

impl StatusMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, id: &str) -> Option<FieldStatus> {
        self.0.get(id).copied()
    }

    pub fn insert(&mut self, id: FieldId, status: FieldStatus) -> Option<FieldStatus> {
        self.0.insert(id, status)
    }

    pub fn remove(&mut self, id: &str) -> Option<FieldStatus> {
        self.0.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldStatus)> {
        self.0.iter()
    }

    /// Entries of `controlled` take precedence over `self`
    pub fn merged_with(&self, controlled: Option<&StatusMap>) -> StatusMap {
        let mut merged = self.clone();
        if let Some(controlled) = controlled {
            for (id, status) in controlled.iter() {
                merged.insert(id.clone(), *status);
            }
        }
        merged
    }
}

impl FromIterator<(FieldId, FieldStatus)> for StatusMap {
    fn from_iter<I: IntoIterator<Item = (FieldId, FieldStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, FieldStatus); N]> for StatusMap {
    fn from(entries: [(&str, FieldStatus); N]) -> Self {
        entries
            .into_iter()
            .map(|(id, status)| (FieldId::from(id), status))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_flags() {
        let status = FieldStatus::DEFAULT;
        assert!(status.pristine());
        assert!(status.untouched());
        assert_eq!(FieldStatus::default(), FieldStatus::DEFAULT);
    }

    #[test]
    fn test_mark_touched_is_noop_when_touched() {
        let fresh = FieldStatus::DEFAULT;
        let touched = mark_touched(&fresh);
        assert!(matches!(touched, Cow::Owned(_)));
        assert!(touched.touched);

        let again = mark_touched(&touched);
        assert!(matches!(again, Cow::Borrowed(_)));
    }

    #[test]
    fn test_recompute_dirty_uses_identity() {
        let initial = Value::from(serde_json::json!({ "a": 1 }));
        let equal_copy = Value::from(serde_json::json!({ "a": 1 }));
        let status = FieldStatus::DEFAULT;

        assert!(matches!(recompute_dirty(&status, &initial, &initial), Cow::Borrowed(_)));
        let dirty = recompute_dirty(&status, &equal_copy, &initial);
        assert!(dirty.dirty);
        assert!(!dirty.touched);
    }

    #[test]
    fn test_recompute_dirty_resets_when_value_returns() {
        let dirty = FieldStatus::new(true, true);
        let clean = recompute_dirty(&dirty, &Value::from(""), &Value::from(""));
        assert_eq!(*clean, FieldStatus::new(true, false));
    }

    #[test]
    fn test_controlled_entries_win() {
        let internal = StatusMap::from([
            ("name", FieldStatus::touched()),
            ("country", FieldStatus::touched()),
        ]);
        let controlled = StatusMap::from([("name", FieldStatus::DEFAULT)]);

        let merged = internal.merged_with(Some(&controlled));
        assert_eq!(merged.get("name"), Some(FieldStatus::DEFAULT));
        assert_eq!(merged.get("country"), Some(FieldStatus::touched()));
    }
}
