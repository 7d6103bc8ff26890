//! # Array Fields
//!
//! Bindings for repeatable sections. Every mutation replaces or deletes
//! through [`Form::on_field_change`], so arrays follow the same
//! copy-on-write and notification path as plain fields.

use crate::array_keys::ItemKey;
use crate::errors::FormResult;
use crate::form::Form;
use crate::handler::FormHandler;
use crate::scope::FieldAddress;
use crate::status::FieldStatus;
use formwire_model::{FieldId, Path, Update, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayBinding {
    pub id: FieldId,
    pub path: Path,
}

impl ArrayBinding {
    pub fn new(address: FieldAddress) -> Self {
        Self {
            id: address.id,
            path: address.path,
        }
    }

    /// Append `item` to the array currently in the model
    pub fn add_item<H: FormHandler>(&self, form: &mut Form<H>, item: impl Into<Value>) -> FormResult<Value> {
        let current = form.select(&self.path);
        let mut items = current.as_array().map(<[Value]>::to_vec).unwrap_or_default();
        items.push(item.into());
        self.set_array(form, items)
    }

    pub fn set_array<H: FormHandler>(&self, form: &mut Form<H>, items: Vec<Value>) -> FormResult<Value> {
        form.on_field_change(&self.id, &self.path, Update::Set(Value::from(items)))
    }

    pub fn item(&self, index: usize) -> ArrayItemBinding {
        ArrayItemBinding {
            array: self.clone(),
            index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayItemBinding {
    pub array: ArrayBinding,
    pub index: usize,
}

impl ArrayItemBinding {
    pub fn path(&self) -> Path {
        self.array.path.clone().index(self.index)
    }

    /// Remove this item; later items shift down by one
    pub fn remove<H: FormHandler>(&self, form: &mut Form<H>) -> FormResult<Value> {
        form.on_field_change(&self.array.id, &self.path(), Update::Delete)
    }

    pub fn set_array<H: FormHandler>(&self, form: &mut Form<H>, items: Vec<Value>) -> FormResult<Value> {
        self.array.set_array(form, items)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayView {
    pub items: Vec<Value>,
    pub keys: Vec<ItemKey>,
    pub binding: ArrayBinding,
    /// Status of the array as a whole
    pub status: FieldStatus,
    /// Error of a whole-array validator
    pub error: Option<String>,
}

impl ArrayView {
    pub fn new(items: Vec<Value>, keys: Vec<ItemKey>, binding: ArrayBinding) -> Self {
        Self {
            items,
            keys,
            binding,
            status: FieldStatus::DEFAULT,
            error: None,
        }
    }

    /// Whether the whole-array error should be displayed
    pub fn show_error(&self) -> bool {
        self.error.is_some() && self.status.touched
    }

    pub fn item_views(&self) -> Vec<ArrayItemView> {
        self.items
            .iter()
            .zip(&self.keys)
            .enumerate()
            .map(|(index, (item, key))| ArrayItemView {
                item: item.clone(),
                index,
                key: key.clone(),
                binding: self.binding.item(index),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItemView {
    pub item: Value,
    pub index: usize,
    pub key: ItemKey,
    pub binding: ArrayItemBinding,
}
