//! # Array Item Keys
//!
//! Render identity of array items. A caller-supplied key function wins;
//! otherwise the [`KeyLedger`] assigns keys and carries them across renders.
//!
//! ```text
//! previous:  [x:~1, y:~2, z:~3]
//! next:      [y,    x',   z,   w]
//!
//! pass 1  same element          z -> ~3 in place, then y -> ~2
//! pass 2  unclaimed slot key    x' at index 1: ~2 already claimed
//! pass 3  fresh                 x' -> ~4, w -> ~5
//! ```
//!
//! Matching by identity first keeps keys through removals, appends and
//! reorders. Items still in their slot are matched before any item may take
//! a key from another slot, so an item edited to equal a sibling's scalar
//! does not steal the sibling's key. Falling back to the slot's own key keeps
//! an item's key when it is edited in place.

use formwire_model::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Extracts a user key from an item and its index
pub type KeyFn = Arc<dyn Fn(&Value, usize) -> String + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKey {
    User(String),
    /// The `n`th occurrence of a user key already used by an earlier item
    Duplicate(String, usize),
    Assigned(u64),
}

impl ItemKey {
    /// Unambiguous text form for render identities. User text is quoted
    /// and escaped, so no user key can spell another key's encoding.
    pub fn encode(&self) -> String {
        match self {
            ItemKey::User(key) => format!("{:?}", key),
            ItemKey::Duplicate(key, n) => format!("{:?}#{}", key, n),
            ItemKey::Assigned(key) => format!("~{}", key),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::User(key) => write!(f, "{}", key),
            ItemKey::Duplicate(key, n) => write!(f, "{} ({})", key, n),
            ItemKey::Assigned(key) => write!(f, "~{}", key),
        }
    }
}

/// Library-assigned keys for one array, reconciled on every render
#[derive(Debug, Clone, Default)]
pub struct KeyLedger {
    previous: Vec<(Value, u64)>,
    next_key: u64,
}

impl KeyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(&mut self, items: &[Value]) -> Vec<ItemKey> {
        let mut claimed = vec![false; self.previous.len()];
        let mut keys: Vec<Option<u64>> = vec![None; items.len()];

        // Same element in the same slot
        for (index, item) in items.iter().enumerate() {
            if let Some((prev, key)) = self.previous.get(index) {
                if prev.same(item) {
                    claimed[index] = true;
                    keys[index] = Some(*key);
                }
            }
        }

        // Same element elsewhere
        for (index, item) in items.iter().enumerate() {
            if keys[index].is_some() {
                continue;
            }
            let found = self
                .previous
                .iter()
                .enumerate()
                .position(|(j, (prev, _))| !claimed[j] && prev.same(item));
            if let Some(j) = found {
                claimed[j] = true;
                keys[index] = Some(self.previous[j].1);
            }
        }

        // Edited in place
        for (index, key) in keys.iter_mut().enumerate() {
            if key.is_none() && index < claimed.len() && !claimed[index] {
                claimed[index] = true;
                *key = Some(self.previous[index].1);
            }
        }

        let keys: Vec<u64> = keys
            .into_iter()
            .map(|key| {
                key.unwrap_or_else(|| {
                    self.next_key += 1;
                    self.next_key
                })
            })
            .collect();

        self.previous = items.iter().cloned().zip(keys.iter().copied()).collect();
        keys.into_iter().map(ItemKey::Assigned).collect()
    }
}

/// Keys for every item of an array, from `key_fn` when given.
///
/// Duplicate user keys are reported and become [`ItemKey::Duplicate`] so
/// that render identities never collide.
pub fn item_keys(items: &[Value], key_fn: Option<&KeyFn>, ledger: &mut KeyLedger) -> Vec<ItemKey> {
    let Some(key_fn) = key_fn else {
        return ledger.reconcile(items);
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let key = key_fn(item, index);
            let count = seen.entry(key.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                warn!(key = %key, index, "Duplicate array item key. Each item should have a unique key.");
                ItemKey::Duplicate(key, *count)
            } else {
                ItemKey::User(key)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(json: serde_json::Value) -> Vec<Value> {
        match Value::from(json) {
            Value::Array(items) => Vec::clone(&items),
            other => vec![other],
        }
    }

    #[test]
    fn test_keys_survive_append() {
        let mut ledger = KeyLedger::new();
        let first = items(json!([{ "a": "x" }, { "a": "y" }]));
        let before = ledger.reconcile(&first);

        let mut second = first.clone();
        second.push(Value::from(json!({ "a": "z" })));
        let after = ledger.reconcile(&second);

        assert_eq!(after[..2], before[..]);
        assert!(!before.contains(&after[2]));
    }

    #[test]
    fn test_keys_follow_items_on_removal() {
        let mut ledger = KeyLedger::new();
        let first = items(json!([{ "n": 1 }, { "n": 2 }, { "n": 3 }]));
        let before = ledger.reconcile(&first);

        let second = vec![first[0].clone(), first[2].clone()];
        let after = ledger.reconcile(&second);

        assert_eq!(after, vec![before[0].clone(), before[2].clone()]);
    }

    #[test]
    fn test_keys_follow_items_on_reorder() {
        let mut ledger = KeyLedger::new();
        let first = items(json!([{ "n": 1 }, { "n": 2 }]));
        let before = ledger.reconcile(&first);

        let after = ledger.reconcile(&[first[1].clone(), first[0].clone()]);
        assert_eq!(after, vec![before[1].clone(), before[0].clone()]);
    }

    #[test]
    fn test_edited_item_keeps_its_slot_key() {
        let mut ledger = KeyLedger::new();
        let first = items(json!([{ "n": 1 }, { "n": 2 }]));
        let before = ledger.reconcile(&first);

        let edited = vec![first[0].clone(), Value::from(json!({ "n": 20 }))];
        let after = ledger.reconcile(&edited);
        assert_eq!(after, before);
    }

    #[test]
    fn test_user_keys() {
        let key_fn: KeyFn = Arc::new(|item: &Value, _: usize| item.get("a").and_then(Value::as_str).unwrap_or("").to_string());
        let mut ledger = KeyLedger::new();
        let keys = item_keys(&items(json!([{ "a": "x" }, { "a": "y" }])), Some(&key_fn), &mut ledger);
        assert_eq!(keys, vec![ItemKey::User("x".into()), ItemKey::User("y".into())]);
    }

    #[test]
    fn test_duplicate_user_keys_are_made_unique() {
        let key_fn: KeyFn = Arc::new(|_: &Value, _: usize| "same".to_string());
        let mut ledger = KeyLedger::new();
        let keys = item_keys(&items(json!([1, 2, 3])), Some(&key_fn), &mut ledger);
        assert_eq!(
            keys,
            vec![
                ItemKey::User("same".into()),
                ItemKey::Duplicate("same".into(), 2),
                ItemKey::Duplicate("same".into(), 3),
            ]
        );
    }

    #[test]
    fn test_duplicate_keys_do_not_collide_with_user_keys() {
        let key_fn: KeyFn = Arc::new(|item: &Value, _: usize| item.as_str().unwrap_or("").to_string());
        let mut ledger = KeyLedger::new();
        let keys = item_keys(&items(json!(["a", "a", "a#2"])), Some(&key_fn), &mut ledger);
        assert_eq!(keys[1], ItemKey::Duplicate("a".into(), 2));
        assert_eq!(keys[2], ItemKey::User("a#2".into()));

        let encoded: std::collections::HashSet<String> = keys.iter().map(ItemKey::encode).collect();
        assert_eq!(encoded.len(), 3);
    }

    #[test]
    fn test_scalar_edited_to_match_sibling_keeps_its_key() {
        let mut ledger = KeyLedger::new();
        let before = ledger.reconcile(&items(json!(["a", "b"])));

        let after = ledger.reconcile(&items(json!(["b", "b"])));
        assert_eq!(after, before);
    }

    #[test]
    fn test_scalar_keys_follow_reorder() {
        let mut ledger = KeyLedger::new();
        let before = ledger.reconcile(&items(json!(["a", "b", "c"])));

        let after = ledger.reconcile(&items(json!(["c", "a", "b"])));
        assert_eq!(after, vec![before[2].clone(), before[0].clone(), before[1].clone()]);
    }
}
