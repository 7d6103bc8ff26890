//! Deep reads and copy-on-write writes.

use crate::error::{PathError, PathResult};
use crate::path::{Path, Seg};
use crate::value::{Map, Value};
use std::sync::Arc;

/// What to do with the value at the end of a path
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    Set(Value),
    /// Remove the key. Array elements after a removed index shift down.
    Delete,
}

impl Update {
    pub fn set(value: impl Into<Value>) -> Self {
        Update::Set(value.into())
    }
}

impl From<Value> for Update {
    fn from(value: Value) -> Self {
        Update::Set(value)
    }
}

/// How to treat keys that are missing from the model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Missing keys are errors
    #[default]
    Strict,
    /// Missing containers are created as empty objects
    Lenient,
}

fn child<'a>(node: &'a Value, seg: &Seg) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(seg.as_key().as_ref()),
        Value::Array(items) => seg.as_index().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Read the value at `path`, failing on the first missing key
pub fn select_deep<'a>(model: &'a Value, path: &Path) -> PathResult<&'a Value> {
    let mut current = model;
    for seg in path.segments() {
        current = match child(current, seg) {
            Some(next) => next,
            None => return Err(PathError::path_not_found(path, seg.as_key(), current)),
        };
    }
    Ok(current)
}

/// Read the value at `path`, `None` if any key is missing
pub fn try_select_deep<'a>(model: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(model, |current, seg| child(current, seg))
}

/// Produce a new model with `update` applied at `path`.
///
/// Only the containers between the root and the target are cloned, and each
/// clone is shallow. All other branches are shared with `model`.
pub fn update_deep(
    model: &Value,
    path: &Path,
    update: Update,
    strictness: Strictness,
) -> PathResult<Value> {
    let (target, spine) = path.segments().split_last().ok_or(PathError::EmptyPath)?;
    rebuild(model, spine, target, update, strictness, path)
}

fn rebuild(
    node: &Value,
    spine: &[Seg],
    target: &Seg,
    update: Update,
    strictness: Strictness,
    path: &Path,
) -> PathResult<Value> {
    let Some((seg, rest)) = spine.split_first() else {
        return write(node, target, update, strictness, path);
    };

    let next = match child(node, seg) {
        Some(existing) => rebuild(existing, rest, target, update, strictness, path)?,
        None if strictness == Strictness::Lenient => {
            rebuild(&Value::empty_object(), rest, target, update, strictness, path)?
        }
        None => return Err(PathError::path_not_found(path, seg.as_key(), node)),
    };

    write(node, seg, Update::Set(next), strictness, path)
}

fn write(
    node: &Value,
    seg: &Seg,
    update: Update,
    strictness: Strictness,
    path: &Path,
) -> PathResult<Value> {
    let lenient = strictness == Strictness::Lenient;

    match node {
        Value::Object(map) => {
            let key = seg.as_key();
            if !lenient && !map.contains_key(key.as_ref()) {
                return Err(PathError::path_not_found(path, key, node));
            }

            let mut copy = Map::clone(map);
            match update {
                Update::Set(value) => {
                    copy.insert(key.into_owned(), value);
                }
                Update::Delete => {
                    copy.remove(key.as_ref());
                }
            }
            Ok(Value::Object(Arc::new(copy)))
        }
        Value::Array(items) => {
            let Some(index) = seg.as_index() else {
                return Err(PathError::invalid_index(path, seg.as_key()));
            };
            let len = items.len();

            let mut copy = Vec::clone(items);
            match update {
                Update::Set(value) if index < len => copy[index] = value,
                Update::Set(value) if index == len => copy.push(value),
                Update::Set(value) if lenient => {
                    copy.resize(index, Value::Null);
                    copy.push(value);
                }
                Update::Delete if index < len => {
                    copy.remove(index);
                }
                Update::Delete if lenient => {}
                _ => return Err(PathError::path_not_found(path, seg.as_key(), node)),
            }
            Ok(Value::Array(Arc::new(copy)))
        }
        _ if lenient => write(&Value::empty_object(), seg, update, strictness, path),
        _ => Err(PathError::path_not_found(path, seg.as_key(), node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> Value {
        Value::from(json!({
            "name": "",
            "address": { "street": "Main" },
            "children": [
                { "name": "a" },
                { "name": "b" },
                { "name": "c" }
            ]
        }))
    }

    #[test]
    fn test_select_deep_resolves_nested_values() {
        let model = model();
        let value = select_deep(&model, &Path::parse("children.1.name")).unwrap();
        assert_eq!(value.as_str(), Some("b"));
    }

    #[test]
    fn test_select_deep_reports_missing_key_and_container() {
        let model = Value::from(json!({ "a": 0 }));
        let err = select_deep(&model, &Path::parse("b")).unwrap_err();
        assert_eq!(err.to_string(), r#"The key "b" does not exist on item {"a":0}."#);
    }

    #[test]
    fn test_try_select_deep_is_lenient() {
        let model = model();
        assert!(try_select_deep(&model, &Path::parse("address.zip")).is_none());
        assert!(try_select_deep(&model, &Path::root()).is_some());
    }

    #[test]
    fn test_update_deep_shares_untouched_branches() {
        let model = model();
        let path = Path::parse("address.street");
        let next = update_deep(&model, &path, Update::set("Elm"), Strictness::Strict).unwrap();

        assert!(!next.same(&model));
        assert!(next.get("children").unwrap().same(model.get("children").unwrap()));
        assert!(!next.get("address").unwrap().same(model.get("address").unwrap()));
        assert_eq!(select_deep(&model, &path).unwrap().as_str(), Some("Main"));
        assert_eq!(select_deep(&next, &path).unwrap().as_str(), Some("Elm"));
    }

    #[test]
    fn test_update_deep_shares_array_siblings() {
        let model = model();
        let next = update_deep(
            &model,
            &Path::parse("children.1.name"),
            Update::set("z"),
            Strictness::Strict,
        )
        .unwrap();

        let old_children = model.get("children").unwrap().as_array().unwrap();
        let new_children = next.get("children").unwrap().as_array().unwrap();
        assert!(old_children[0].same(&new_children[0]));
        assert!(!old_children[1].same(&new_children[1]));
        assert!(old_children[2].same(&new_children[2]));
    }

    #[test]
    fn test_update_deep_round_trip() {
        let model = model();
        let value = Value::array([1_i64, 2]);
        for name in ["name", "address.street", "children.2", "children.0.name"] {
            let path = Path::parse(name);
            let next = update_deep(&model, &path, Update::Set(value.clone()), Strictness::Strict)
                .unwrap();
            assert!(select_deep(&next, &path).unwrap().same(&value), "{}", name);
        }
    }

    #[test]
    fn test_delete_reindexes_array() {
        let model = model();
        let next = update_deep(
            &model,
            &Path::parse("children.0"),
            Update::Delete,
            Strictness::Strict,
        )
        .unwrap();

        let old_children = model.get("children").unwrap().as_array().unwrap();
        let children = next.get("children").unwrap().as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert!(children[0].same(&old_children[1]));
        assert!(children[1].same(&old_children[2]));
    }

    #[test]
    fn test_delete_removes_object_key() {
        let model = model();
        let next = update_deep(&model, &Path::parse("address"), Update::Delete, Strictness::Strict)
            .unwrap();
        assert!(next.get("address").is_none());
        assert!(model.get("address").is_some());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = update_deep(&model(), &Path::root(), Update::set(1_i64), Strictness::Lenient)
            .unwrap_err();
        assert_eq!(err, PathError::EmptyPath);
    }

    #[test]
    fn test_strict_update_rejects_missing_keys() {
        let model = model();
        let err = update_deep(&model, &Path::parse("address.zip"), Update::set("1"), Strictness::Strict)
            .unwrap_err();
        assert_eq!(err.missing_key(), Some("zip"));

        let err = update_deep(&model, &Path::parse("meta.tag"), Update::set("1"), Strictness::Strict)
            .unwrap_err();
        assert_eq!(err.missing_key(), Some("meta"));
    }

    #[test]
    fn test_lenient_update_synthesizes_containers() {
        let model = Value::from(json!({ "a": 0 }));
        let next = update_deep(&model, &Path::parse("b.c.d"), Update::set("x"), Strictness::Lenient)
            .unwrap();
        assert_eq!(next.to_json(), json!({ "a": 0, "b": { "c": { "d": "x" } } }));
    }

    #[test]
    fn test_lenient_update_replaces_scalar_parents() {
        let model = Value::from(json!({ "a": null }));
        let next = update_deep(&model, &Path::parse("a.b"), Update::set(true), Strictness::Lenient)
            .unwrap();
        assert_eq!(next.to_json(), json!({ "a": { "b": true } }));
    }

    #[test]
    fn test_append_at_array_end() {
        let model = Value::from(json!({ "items": [1] }));
        let next = update_deep(&model, &Path::parse("items.1"), Update::set(2_i64), Strictness::Strict)
            .unwrap();
        assert_eq!(next.to_json(), json!({ "items": [1, 2] }));

        let err = update_deep(&model, &Path::parse("items.3"), Update::set(2_i64), Strictness::Strict);
        assert!(err.is_err());

        let padded = update_deep(&model, &Path::parse("items.3"), Update::set(2_i64), Strictness::Lenient)
            .unwrap();
        assert_eq!(padded.to_json(), json!({ "items": [1, null, null, 2] }));
    }

    #[test]
    fn test_non_numeric_key_on_array() {
        let model = Value::from(json!({ "items": [] }));
        let err = update_deep(&model, &Path::parse("items.first"), Update::set(1_i64), Strictness::Lenient)
            .unwrap_err();
        assert!(matches!(err, PathError::InvalidIndex { .. }));
    }
}
