use crate::definition::Validation;
use crate::error_map::ErrorMap;
use formwire_model::{try_select_deep, FieldId, Path, Value};
use tracing::{instrument, trace};

/// Evaluate `definition` against the part of `model` found at `display_path`.
///
/// Missing model values are passed to validators as `Value::Null`. Array
/// items are keyed by index, the same way array item fields are identified.
/// Each call builds a fresh map, so fixed errors never linger.
#[instrument(skip_all, fields(path = %display_path))]
pub fn validate(model: &Value, definition: &Validation, display_path: &Path) -> ErrorMap {
    let null = Value::Null;
    let value = try_select_deep(model, display_path).unwrap_or(&null);

    let mut errors = ErrorMap::new();
    walk(value, definition, display_path, &mut errors);

    trace!(count = errors.len(), "validated");
    errors
}

fn walk(value: &Value, definition: &Validation, path: &Path, errors: &mut ErrorMap) {
    match definition {
        Validation::Field(validator) => {
            if let Some(message) = validator(value) {
                errors.insert(FieldId::from(path), message);
            }
        }
        Validation::Object(members) => {
            let null = Value::Null;
            for (key, member) in members {
                let child = value.get(key).unwrap_or(&null);
                walk(child, member, &path.clone().key(key.clone()), errors);
            }
        }
        Validation::Array(array) => {
            if let Some(validator) = &array.array {
                if let Some(message) = validator(value) {
                    errors.insert(FieldId::from(path), message);
                }
            }
            if let (Some(items), Some(elements)) = (&array.items, value.as_array()) {
                for (index, element) in elements.iter().enumerate() {
                    walk(element, items, &path.clone().index(index), errors);
                }
            }
        }
    }
}
