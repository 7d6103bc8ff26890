//! Common validator functions.
//!
//! Messages are supplied by the caller; nothing here is localized.

use crate::definition::ValidatorFn;
use formwire_model::Value;
use std::sync::Arc;

/// Fails on null, empty strings and empty arrays
pub fn required(message: impl Into<String>) -> ValidatorFn {
    let message = message.into();
    Arc::new(move |value: &Value| {
        let missing = value.is_null() || value.len() == Some(0);
        missing.then(|| message.clone())
    })
}

/// Fails when a string or array is shorter than `min`.
///
/// Values without a length count as empty.
pub fn min_length(min: usize, message: impl Into<String>) -> ValidatorFn {
    let message = message.into();
    Arc::new(move |value: &Value| (value.len().unwrap_or(0) < min).then(|| message.clone()))
}

/// Fails when a string or array is longer than `max`
pub fn max_length(max: usize, message: impl Into<String>) -> ValidatorFn {
    let message = message.into();
    Arc::new(move |value: &Value| {
        value
            .len()
            .filter(|len| *len > max)
            .map(|_| message.clone())
    })
}

/// Runs validators in order and reports the first failure
pub fn all(validators: impl IntoIterator<Item = ValidatorFn>) -> ValidatorFn {
    let validators: Vec<ValidatorFn> = validators.into_iter().collect();
    Arc::new(move |value: &Value| validators.iter().find_map(|validator| validator(value)))
}
