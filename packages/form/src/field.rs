use crate::errors::FormResult;
use crate::form::Form;
use crate::handler::FormHandler;
use crate::scope::FieldAddress;
use crate::status::FieldStatus;
use formwire_model::{FieldId, Path, Update, Value};

/// Callbacks a rendered field hands to its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub id: FieldId,
    pub path: Path,
}

impl FieldBinding {
    pub fn new(address: FieldAddress) -> Self {
        Self {
            id: address.id,
            path: address.path,
        }
    }

    pub fn change<H: FormHandler>(&self, form: &mut Form<H>, value: impl Into<Value>) -> FormResult<Value> {
        form.on_field_change(&self.id, &self.path, Update::Set(value.into()))
    }

    /// Delete the field's key from the model
    pub fn remove<H: FormHandler>(&self, form: &mut Form<H>) -> FormResult<Value> {
        form.on_field_change(&self.id, &self.path, Update::Delete)
    }

    pub fn blur<H: FormHandler>(&self, form: &mut Form<H>) -> FormResult<()> {
        form.on_field_blur(&self.id)
    }
}

/// Everything a field view is derived from
#[derive(Debug, Clone)]
pub struct FieldInputs {
    pub binding: FieldBinding,
    pub value: Value,
    pub status: FieldStatus,
    pub error: Option<String>,
    pub show_error_if_dirty: bool,
}

impl PartialEq for FieldInputs {
    fn eq(&self, other: &Self) -> bool {
        self.binding == other.binding
            && self.value.same(&other.value)
            && self.status == other.status
            && self.error == other.error
            && self.show_error_if_dirty == other.show_error_if_dirty
    }
}

impl FieldInputs {
    pub fn gather<H: FormHandler>(form: &Form<H>, binding: FieldBinding, show_error_if_dirty: bool) -> Self {
        Self {
            value: form.select(&binding.path),
            status: form.status(&binding.id),
            error: form.error(&binding.id).map(str::to_string),
            show_error_if_dirty,
            binding,
        }
    }
}

/// What an input needs to render
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: FieldId,
    pub value: Value,
    pub error: Option<String>,
    pub valid: bool,
    pub invalid: bool,
    pub touched: bool,
    pub untouched: bool,
    pub pristine: bool,
    pub dirty: bool,
    /// Whether the error should be visible under the display policy
    pub show_error: bool,
    pub binding: FieldBinding,
}

impl From<&FieldInputs> for FieldView {
    fn from(inputs: &FieldInputs) -> Self {
        let status = inputs.status;
        let invalid = inputs.error.is_some();
        Self {
            name: inputs.binding.id.clone(),
            value: inputs.value.clone(),
            error: inputs.error.clone(),
            valid: !invalid,
            invalid,
            touched: status.touched,
            untouched: status.untouched(),
            pristine: status.pristine(),
            dirty: status.dirty,
            show_error: invalid && (status.touched || (inputs.show_error_if_dirty && status.dirty)),
            binding: inputs.binding.clone(),
        }
    }
}
