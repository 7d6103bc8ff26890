use crate::status::StatusMap;
use formwire_model::Value;
use formwire_validation::ErrorMap;

/// Receives form notifications.
///
/// Only `on_change` is required; a bare closure over the new model is a
/// handler too. Notifications fire only when the emitted data changed.
pub trait FormHandler {
    /// A field change produced a new model
    fn on_change(&mut self, model: &Value);

    fn on_status_change(&mut self, _status: &StatusMap) {}

    fn on_errors_change(&mut self, _errors: &ErrorMap) {}

    /// Every submit, before the valid or invalid outcome
    fn on_submit(&mut self, _model: &Value) {}

    fn on_valid_submit(&mut self, _model: &Value) {}

    fn on_invalid_submit(&mut self, _model: &Value, _errors: &ErrorMap) {}
}

impl<F> FormHandler for F
where
    F: FnMut(&Value),
{
    fn on_change(&mut self, model: &Value) {
        self(model)
    }
}
