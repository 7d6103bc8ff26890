//! # Formwire Validation
//!
//! Declarative validation definitions evaluated against a model.
//!
//! A [`Validation`] tree mirrors the shape of the model. Leaves are
//! validator functions returning an optional message; arrays carry a
//! per-item definition and an optional whole-array check. [`validate`]
//! walks both trees together and collects the messages into an
//! [`ErrorMap`] keyed by field identifier.
//!
//! Failing validators are data, not errors: nothing in this crate returns a
//! `Result`.

pub mod definition;
pub mod error_map;
pub mod rules;
pub mod validate;

pub use definition::{ArrayValidation, Validation, ValidatorFn};
pub use error_map::ErrorMap;
pub use validate::validate;
