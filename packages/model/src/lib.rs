//! # Formwire Model
//!
//! Immutable form data and the path utilities used to read and write it.
//!
//! ```text
//!   Path ["children", 0, "name"]
//!          │
//!   Value::Object ──► Value::Array ──► Value::Object ──► "Paul"
//!      (cloned)          (cloned)         (cloned)       (assigned)
//! ```
//!
//! Every write clones only the containers on the path from the root to the
//! target. Everything else is shared with the previous model, so callers can
//! detect unchanged branches with [`Value::same`].

pub mod error;
pub mod field_id;
pub mod path;
pub mod update;
pub mod value;

pub use error::{PathError, PathResult};
pub use field_id::FieldId;
pub use path::{create_path, Path, Seg};
pub use update::{select_deep, try_select_deep, update_deep, Strictness, Update};
pub use value::{Map, Value};
