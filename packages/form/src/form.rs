//! # Form Orchestrator
//!
//! Owns the registered field set and everything derived from the model:
//! status, errors and the record of what was last emitted to the handler.
//!
//! ```text
//!  host lifecycle            Form                         handler
//!  ──────────────            ────                         ───────
//!  on_field_mount   ──►  register, capture initial
//!  on_field_change  ──►  update_deep ─► recompute dirty ─► on_change(next)
//!                        validate(next) ─────────────────► on_errors_change
//!  on_field_blur    ──►  mark touched ───────────────────► on_status_change
//!  set_value        ◄──  consumer echoes the accepted model
//! ```
//!
//! The model is owned by the consumer: a change proposes a new model and
//! reports it through `on_change`; it becomes current once the consumer
//! passes it back with [`Form::set_value`].
//!
//! Status and error notifications are compared with the last emitted map and
//! suppressed when equal. Between [`Form::begin_batch`] and
//! [`Form::end_batch`] they are held back and flushed once at the end.

use crate::config::FormConfig;
use crate::errors::{FormError, FormResult};
use crate::handler::FormHandler;
use crate::scope::{FormId, Scope};
use crate::status::{mark_touched, recompute_dirty, FieldStatus, StatusMap};
use formwire_model::{
    select_deep, try_select_deep, update_deep, FieldId, Path, Update, Value,
};
use formwire_validation::{validate, ErrorMap, Validation};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone)]
struct Registration {
    path: Path,
    initial: Value,
}

/// A field that keeps its status under a new identifier, used when a keyed
/// array item shifts position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMove {
    pub from: FieldId,
    pub to: FieldId,
    pub path: Path,
}

pub struct Form<H> {
    id: FormId,
    config: FormConfig,
    handler: H,
    model: Value,
    validation: Option<Validation>,
    fields: BTreeMap<FieldId, Registration>,
    internal_status: StatusMap,
    /// Status supplied by the consumer
    controlled_status: Option<StatusMap>,
    /// Transitions of controlled fields not yet echoed back
    pending_status: StatusMap,
    errors: ErrorMap,
    last_model: Value,
    last_status: StatusMap,
    last_errors: ErrorMap,
    batch_depth: usize,
}

impl<H: FormHandler> Form<H> {
    pub fn new(model: impl Into<Value>, handler: H) -> Self {
        let model = model.into();
        Self {
            id: FormId::next(),
            config: FormConfig::default(),
            handler,
            last_model: model.clone(),
            model,
            validation: None,
            fields: BTreeMap::new(),
            internal_status: StatusMap::new(),
            controlled_status: None,
            pending_status: StatusMap::new(),
            errors: ErrorMap::new(),
            last_status: StatusMap::new(),
            last_errors: ErrorMap::new(),
            batch_depth: 0,
        }
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self.errors = self.compute_errors(&self.model);
        self
    }

    pub fn with_status(mut self, status: StatusMap) -> Self {
        self.controlled_status = Some(status);
        self
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    /// Scope for the top of this form's field tree
    pub fn scope(&self) -> Scope {
        Scope::root(self.id)
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn value(&self) -> &Value {
        &self.model
    }

    /// Value at `path` in the current model, `Null` when absent
    pub fn select(&self, path: &Path) -> Value {
        try_select_deep(&self.model, path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn status(&self, id: &str) -> FieldStatus {
        self.pending_status
            .get(id)
            .or_else(|| self.controlled_status.as_ref().and_then(|s| s.get(id)))
            .or_else(|| self.internal_status.get(id))
            .unwrap_or(FieldStatus::DEFAULT)
    }

    /// Status of every known field, controlled entries taking precedence
    pub fn status_map(&self) -> StatusMap {
        self.internal_status
            .merged_with(self.controlled_status.as_ref())
            .merged_with(Some(&self.pending_status))
    }

    pub fn error(&self, id: &str) -> Option<&str> {
        self.errors.get(id)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    pub fn registered(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.keys()
    }

    pub fn field_path(&self, id: &str) -> Option<&Path> {
        self.fields.get(id).map(|registration| &registration.path)
    }

    /// Register a field. Mounting an already registered field is a no-op.
    pub fn on_field_mount(&mut self, id: FieldId, path: Path) -> FormResult<()> {
        if self.fields.contains_key(&id) {
            trace!(field = %id, "Field already mounted");
            return Ok(());
        }

        let initial = match select_deep(&self.model, &path) {
            Ok(value) => value.clone(),
            Err(error) if self.config.strict => {
                return Err(FormError::strict_mismatch(&id, error));
            }
            Err(error) => {
                warn!(field = %id, error = %error, "Field path missing from model");
                Value::Null
            }
        };

        debug!(field = %id, path = %path, "Mounting field");
        if self.internal_status.get(&id).is_none() {
            self.internal_status.insert(id.clone(), FieldStatus::DEFAULT);
        }
        self.fields.insert(id, Registration { path, initial });
        self.errors = self.compute_errors(&self.model);
        self.flush();
        Ok(())
    }

    /// Apply `update` at `path` and return the proposed model.
    ///
    /// The handler receives the new model through `on_change`. Setting a
    /// value identical to the current one proposes the current model again
    /// without notifying.
    pub fn on_field_change(&mut self, id: &FieldId, path: &Path, update: Update) -> FormResult<Value> {
        let current = try_select_deep(&self.model, path);
        let unchanged = match (&update, current) {
            (Update::Set(value), Some(current)) => value.same(current),
            (Update::Delete, None) => true,
            _ => false,
        };
        if unchanged {
            trace!(field = %id, path = %path, "Change leaves model as is");
            return Ok(self.model.clone());
        }

        let next = update_deep(&self.model, path, update, self.config.strictness())
            .map_err(|error| FormError::strict_mismatch(id, error))?;

        self.recompute_dirty(&next, |field| field.starts_with(path) || path.starts_with(field));

        if next.same(&self.last_model) {
            trace!(field = %id, "Model unchanged since last emit");
        } else {
            self.last_model = next.clone();
            self.handler.on_change(&next);
        }

        self.errors = self.compute_errors(&next);
        self.flush();
        Ok(next)
    }

    pub fn on_field_blur(&mut self, id: &FieldId) -> FormResult<()> {
        if !self.fields.contains_key(id) {
            return Err(FormError::UnknownField(id.clone()));
        }
        let status = self.status(id);
        if let Cow::Owned(touched) = mark_touched(&status) {
            self.write_status(id, touched);
        }
        self.flush();
        Ok(())
    }

    pub fn on_field_unmount(&mut self, id: &FieldId) {
        if self.fields.remove(id).is_none() {
            return;
        }
        debug!(field = %id, "Unmounting field");
        if self.controlled_status.is_none() {
            self.internal_status.remove(id);
        }
        self.flush();
    }

    pub fn on_field_move(&mut self, from: FieldId, to: FieldId, path: Path) {
        self.on_fields_moved(vec![FieldMove { from, to, path }]);
    }

    /// Re-key registrations at once, so moves that swap identifiers do not
    /// clobber each other.
    ///
    /// Internal, pending and controlled entries all travel with the field;
    /// whatever sat under the target id belonged to the previous occupant
    /// and is dropped. The consumer sees the re-keyed controlled entries in
    /// the next status notification.
    pub fn on_fields_moved(&mut self, moves: Vec<FieldMove>) {
        let mut carried = Vec::with_capacity(moves.len());
        for field_move in moves {
            let Some(registration) = self.fields.remove(&field_move.from) else {
                continue;
            };
            let internal = self.internal_status.remove(&field_move.from);
            let pending = self.pending_status.remove(&field_move.from);
            let controlled = self
                .controlled_status
                .as_mut()
                .and_then(|controlled| controlled.remove(&field_move.from));
            carried.push((field_move, registration, internal, pending, controlled));
        }

        for (field_move, registration, internal, pending, controlled) in carried {
            debug!(from = %field_move.from, to = %field_move.to, "Moving field");
            let to = field_move.to;
            self.internal_status
                .insert(to.clone(), internal.unwrap_or(FieldStatus::DEFAULT));
            replace_entry(&mut self.pending_status, &to, pending);
            if let Some(map) = self.controlled_status.as_mut() {
                replace_entry(map, &to, controlled);
            }
            self.fields.insert(
                to,
                Registration {
                    path: field_move.path,
                    initial: registration.initial,
                },
            );
        }

        let model = self.model.clone();
        self.recompute_dirty(&model, |_| true);
        self.errors = self.compute_errors(&model);
        self.flush();
    }

    /// Touch every registered field, validate and report the outcome.
    /// Returns whether the model is valid.
    pub fn submit(&mut self) -> bool {
        self.begin_batch();
        let ids: Vec<FieldId> = self.fields.keys().cloned().collect();
        for id in ids {
            let status = self.status(&id);
            if let Cow::Owned(touched) = mark_touched(&status) {
                self.write_status(&id, touched);
            }
        }
        self.errors = self.compute_errors(&self.model);
        self.end_batch();

        debug!(errors = self.errors.len(), "Submitting form");
        self.handler.on_submit(&self.model);
        if self.errors.is_empty() {
            self.handler.on_valid_submit(&self.model);
            true
        } else {
            self.handler.on_invalid_submit(&self.model, &self.errors);
            false
        }
    }

    /// Make `model` the current model.
    ///
    /// Fields the new model no longer covers are usually about to unmount,
    /// so their paths are checked by [`Form::verify_paths`] once the field
    /// tree has been reconciled, not here.
    pub fn set_value(&mut self, model: impl Into<Value>) {
        let model = model.into();
        if model.same(&self.model) {
            return;
        }
        self.recompute_dirty(&model, |_| true);
        self.errors = self.compute_errors(&model);
        self.model = model;
        self.flush();
    }

    /// In strict mode, fail with `StrictPathMismatch` for the first
    /// registered field whose path no longer resolves in the model
    pub fn verify_paths(&self) -> FormResult<()> {
        if !self.config.strict {
            return Ok(());
        }
        for (id, registration) in &self.fields {
            if let Err(error) = select_deep(&self.model, &registration.path) {
                warn!(field = %id, error = %error, "Mounted field lost its path");
                return Err(FormError::strict_mismatch(id, error));
            }
        }
        Ok(())
    }

    /// Control status from outside, or return to internal tracking with `None`
    pub fn set_status(&mut self, status: Option<StatusMap>) {
        self.controlled_status = status;
        self.pending_status = StatusMap::new();
        self.flush();
    }

    pub fn set_validation(&mut self, validation: Option<Validation>) {
        self.validation = validation;
        self.errors = self.compute_errors(&self.model);
        self.flush();
    }

    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    pub fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        self.flush();
    }

    fn compute_errors(&self, model: &Value) -> ErrorMap {
        match &self.validation {
            Some(validation) => validate(model, validation, &Path::root()),
            None => ErrorMap::new(),
        }
    }

    fn write_status(&mut self, id: &FieldId, status: FieldStatus) {
        let controlled = self
            .controlled_status
            .as_ref()
            .is_some_and(|controlled| controlled.contains(id));
        if controlled {
            self.pending_status.insert(id.clone(), status);
        }
        self.internal_status.insert(id.clone(), status);
    }

    /// Recompute dirty flags against `model` for fields whose path passes `affected`
    fn recompute_dirty(&mut self, model: &Value, affected: impl Fn(&Path) -> bool) {
        let null = Value::Null;
        let updates: Vec<(FieldId, FieldStatus)> = self
            .fields
            .iter()
            .filter(|(_, registration)| affected(&registration.path))
            .filter_map(|(id, registration)| {
                let current = try_select_deep(model, &registration.path).unwrap_or(&null);
                let status = self.status(id);
                let update = match recompute_dirty(&status, current, &registration.initial) {
                    Cow::Owned(next) => Some((id.clone(), next)),
                    Cow::Borrowed(_) => None,
                };
                update
            })
            .collect();

        for (id, status) in updates {
            self.write_status(&id, status);
        }
    }

    fn flush(&mut self) {
        if self.batch_depth > 0 {
            return;
        }

        let status = self.status_map();
        if status == self.last_status {
            trace!("Status unchanged, not notifying");
        } else {
            self.handler.on_status_change(&status);
            self.last_status = status;
        }

        if self.errors == self.last_errors {
            trace!("Errors unchanged, not notifying");
        } else {
            self.last_errors = self.errors.clone();
            self.handler.on_errors_change(&self.errors);
        }
    }
}

fn replace_entry(map: &mut StatusMap, id: &FieldId, status: Option<FieldStatus>) {
    match status {
        Some(status) => {
            map.insert(id.clone(), status);
        }
        None => {
            map.remove(id);
        }
    }
}
