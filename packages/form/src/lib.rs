//! # Formwire
//!
//! Form state for component trees: binds rendered fields to paths in an
//! immutable model, tracks touched/dirty status, and runs validation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Value, Path, update_deep             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ validation: definition tree → ErrorMap      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ form: field registry + orchestrator         │
//! │  - Scopes resolve field addresses           │
//! │  - Form applies changes, derives status     │
//! │  - Host renders a node tree headlessly      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The consumer owns the model**: changes are proposed through
//!    `on_change` and become current through `set_value`
//! 2. **Derived, not patched**: status and errors are recomputed from the
//!    model, so repeated notifications settle
//! 3. **Identity over equality**: unchanged branches keep their `Arc`s, which
//!    is what dirty tracking and view memoization compare
//!
//! ## Usage
//!
//! ```rust
//! use formwire::{Form, Host, Node, Value};
//! use serde_json::json;
//!
//! let form = Form::new(json!({ "name": "", "children": [] }), |_: &Value| {});
//! let mut host = Host::new(form, vec![Node::field("name")]);
//! host.render().unwrap();
//!
//! let next = host.change("name", "Paul").unwrap();
//! assert_eq!(next, Value::from(json!({ "name": "Paul", "children": [] })));
//! assert!(host.frame().field("name").unwrap().dirty);
//! ```

pub mod array;
pub mod array_keys;
pub mod config;
pub mod errors;
pub mod field;
pub mod form;
pub mod handler;
pub mod host;
pub mod memo;
pub mod node;
pub mod scope;
pub mod status;

pub use array::{ArrayBinding, ArrayItemBinding, ArrayItemView, ArrayView};
pub use array_keys::{item_keys, ItemKey, KeyFn, KeyLedger};
pub use config::FormConfig;
pub use errors::{FormError, FormResult};
pub use field::{FieldBinding, FieldInputs, FieldView};
pub use form::{FieldMove, Form};
pub use handler::FormHandler;
pub use host::{Frame, Host};
pub use memo::Memo;
pub use node::{FieldNode, ItemTemplate, Node, ValueHook};
pub use scope::{ArrayContext, FieldAddress, FormId, Scope};
pub use status::{mark_touched, recompute_dirty, FieldStatus, StatusMap};

pub use formwire_model::{FieldId, Path, Update, Value};
pub use formwire_validation::{ErrorMap, Validation};
