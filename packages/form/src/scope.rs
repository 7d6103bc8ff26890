//! # Scope
//!
//! Namespace information threaded down the render walk. Every scope is
//! derived from its parent by a pure function, so a field's address depends
//! only on its ancestor chain.
//!
//! ```text
//! Scope::root(form)                      id: ""           path: []
//!   .group("address")                    id: "address"    path: [address]
//!   .field("street")   -> FieldAddress   id: "address.street"
//!
//! Scope::root(form)
//!   .array("children")                   id: "children"   path: [children]
//!   .array_item(0)                       id: "children.0" path: [children, 0]
//!   .field("name")     -> FieldAddress   id: "children.0.name"
//! ```
//!
//! Display and structural paths are kept separately: the display path keys
//! the status and error maps, the structural path addresses the model.

use crate::errors::{FormError, FormResult};
use formwire_model::{create_path, FieldId, Path};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FORM_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a form instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(u64);

impl FormId {
    pub fn next() -> Self {
        Self(NEXT_FORM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "form#{}", self.0)
    }
}

/// Where a field or array lives
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldAddress {
    pub id: FieldId,
    pub path: Path,
}

impl FieldAddress {
    pub fn new(display: &Path, path: Path) -> Self {
        Self {
            id: FieldId::from(display),
            path,
        }
    }
}

/// The array enclosing the current scope
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayContext {
    pub address: FieldAddress,
    display: Path,
}

impl ArrayContext {
    pub fn id(&self) -> &FieldId {
        &self.address.id
    }

    pub fn path(&self) -> &Path {
        &self.address.path
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    display: Path,
    path: Path,
    form: Option<FormId>,
    array: Option<ArrayContext>,
}

impl Scope {
    pub fn root(form: FormId) -> Self {
        Self {
            display: Path::root(),
            path: Path::root(),
            form: Some(form),
            array: None,
        }
    }

    /// A scope with no owning form; fields resolved here fail
    pub fn detached() -> Self {
        Self {
            display: Path::root(),
            path: Path::root(),
            form: None,
            array: None,
        }
    }

    pub fn form(&self) -> Option<FormId> {
        self.form
    }

    pub fn display_path(&self) -> &Path {
        &self.display
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn array_context(&self) -> Option<&ArrayContext> {
        self.array.as_ref()
    }

    /// Resolve a field declared as `name` in this scope
    pub fn field(&self, name: &Path) -> FormResult<FieldAddress> {
        if self.form.is_none() {
            return Err(FormError::missing_context(format!(
                "field \"{}\" rendered outside a form",
                name
            )));
        }
        Ok(self.address(name))
    }

    pub fn address(&self, name: &Path) -> FieldAddress {
        let display = create_path(Some(&self.display), name);
        FieldAddress::new(&display, create_path(Some(&self.path), name))
    }

    /// Nested namespace; an empty name introduces no namespace
    pub fn group(&self, name: &Path) -> Scope {
        Scope {
            display: create_path(Some(&self.display), name),
            path: create_path(Some(&self.path), name),
            form: self.form,
            array: None,
        }
    }

    /// Namespace of an array whose items are rendered below it
    pub fn array(&self, name: &Path) -> Scope {
        let display = create_path(Some(&self.display), name);
        let path = create_path(Some(&self.path), name);
        Scope {
            array: Some(ArrayContext {
                address: FieldAddress::new(&display, path.clone()),
                display: display.clone(),
            }),
            display,
            path,
            form: self.form,
        }
    }

    /// Namespace of the item at `index` of the enclosing array
    pub fn array_item(&self, index: usize) -> FormResult<Scope> {
        let array = self.array.as_ref().ok_or_else(|| {
            FormError::missing_context(format!(
                "array item {} rendered outside an array (scope \"{}\")",
                index, self.display
            ))
        })?;
        Ok(Scope {
            display: array.display.clone().index(index),
            path: array.path().clone().index(index),
            form: self.form,
            array: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_and_field() {
        let scope = Scope::root(FormId::next()).group(&Path::parse("address"));
        let address = scope.field(&Path::parse("street")).unwrap();
        assert_eq!(address.id.as_str(), "address.street");
        assert_eq!(address.path, Path::root().key("address").key("street"));
    }

    #[test]
    fn test_empty_group_name_adds_no_namespace() {
        let scope = Scope::root(FormId::next()).group(&Path::parse(""));
        let address = scope.field(&Path::parse("name")).unwrap();
        assert_eq!(address.id.as_str(), "name");
    }

    #[test]
    fn test_array_item_addresses() {
        let item = Scope::root(FormId::next())
            .array(&Path::parse("children"))
            .array_item(1)
            .unwrap();
        let address = item.field(&Path::parse("name")).unwrap();
        assert_eq!(address.id.as_str(), "children.1.name");
        assert_eq!(address.path, Path::root().key("children").index(1).key("name"));
        assert!(item.array_context().is_none());
    }

    #[test]
    fn test_recursive_array_items() {
        let form = FormId::next();
        let grandchild = Scope::root(form)
            .array(&Path::parse("children"))
            .array_item(0)
            .unwrap()
            .array(&Path::parse("children"))
            .array_item(2)
            .unwrap();
        let address = grandchild.field(&Path::parse("name")).unwrap();
        assert_eq!(address.id.as_str(), "children.0.children.2.name");
    }

    #[test]
    fn test_missing_contexts() {
        let field = Scope::detached().field(&Path::parse("name"));
        assert!(matches!(field, Err(FormError::MissingContext(_))));

        let item = Scope::root(FormId::next()).group(&Path::parse("a")).array_item(0);
        assert!(matches!(item, Err(FormError::MissingContext(_))));
    }

    #[test]
    fn test_form_ids_are_unique() {
        assert_ne!(FormId::next(), FormId::next());
    }
}
