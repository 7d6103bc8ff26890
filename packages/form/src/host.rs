//! # Headless Host
//!
//! Renders a [`Node`] tree against a [`Form`] the way a UI framework would:
//! walk the tree with scopes, then tell the form which fields appeared,
//! moved or vanished.
//!
//! ```text
//! render()
//!   walk      nodes + scopes ──► visits (render key, binding) + array views
//!   reconcile previous render keys vs visits
//!               vanished       ──► on_field_unmount
//!               same key, new id ──► on_fields_moved   (keyed item shifted)
//!               new key        ──► on_field_mount
//!   verify    strict paths of everything still mounted
//!   views     FieldInputs ──► Memo ──► FieldView
//! ```
//!
//! Arrays are registered with the form like fields, so whole-array errors
//! have a status and are touched on submit.
//!
//! Render keys are position chains in which array items contribute their
//! item key instead of their index, so a keyed item that shifts position
//! keeps its render key and moves instead of remounting.
//!
//! Every interaction echoes the proposed model back with
//! [`Form::set_value`] before re-rendering, as a consumer that accepts every
//! change would.

use crate::array::{ArrayBinding, ArrayItemView, ArrayView};
use crate::array_keys::{item_keys, KeyLedger};
use crate::errors::{FormError, FormResult};
use crate::field::{FieldBinding, FieldInputs, FieldView};
use crate::form::{FieldMove, Form};
use crate::handler::FormHandler;
use crate::memo::Memo;
use crate::node::{Node, ValueHook};
use crate::scope::Scope;
use formwire_model::{FieldId, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

/// Output of one render
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub fields: Vec<FieldView>,
    pub arrays: Vec<ArrayView>,
}

impl Frame {
    pub fn field(&self, id: &str) -> Option<&FieldView> {
        self.fields.iter().find(|view| view.name.as_str() == id)
    }

    pub fn array(&self, id: &str) -> Option<&ArrayView> {
        self.arrays.iter().find(|view| view.binding.id.as_str() == id)
    }
}

struct Visit {
    key: String,
    binding: FieldBinding,
    kind: VisitKind,
}

enum VisitKind {
    Field {
        show_error_if_dirty: bool,
        hook: Option<ValueHook>,
    },
    Array,
}

pub struct Host<H> {
    form: Form<H>,
    nodes: Vec<Node>,
    mounted: BTreeMap<String, FieldBinding>,
    ledgers: HashMap<String, KeyLedger>,
    views: HashMap<String, Memo<FieldInputs, FieldView>>,
    hooks: HashMap<FieldId, ValueHook>,
    frame: Frame,
    mounts: usize,
    unmounts: usize,
}

impl<H: FormHandler> Host<H> {
    pub fn new(form: Form<H>, nodes: Vec<Node>) -> Self {
        Self {
            form,
            nodes,
            mounted: BTreeMap::new(),
            ledgers: HashMap::new(),
            views: HashMap::new(),
            hooks: HashMap::new(),
            frame: Frame::default(),
            mounts: 0,
            unmounts: 0,
        }
    }

    pub fn form(&self) -> &Form<H> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form<H> {
        &mut self.form
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Fields mounted over the host's lifetime
    pub fn mount_count(&self) -> usize {
        self.mounts
    }

    pub fn unmount_count(&self) -> usize {
        self.unmounts
    }

    /// How many times the view of field `id` was derived
    pub fn view_computes(&self, id: &str) -> usize {
        self.mounted
            .iter()
            .filter(|(_, binding)| binding.id.as_str() == id)
            .filter_map(|(key, _)| self.views.get(key))
            .map(Memo::computes)
            .sum()
    }

    pub fn set_nodes(&mut self, nodes: Vec<Node>) -> FormResult<&Frame> {
        self.nodes = nodes;
        self.render()
    }

    #[instrument(skip_all)]
    pub fn render(&mut self) -> FormResult<&Frame> {
        self.form.begin_batch();
        let result = self
            .reconcile()
            .and_then(|visits| self.form.verify_paths().map(|()| visits));
        self.form.end_batch();
        let visits = result?;

        let mut fields = Vec::with_capacity(visits.len());
        for visit in &visits {
            let VisitKind::Field { show_error_if_dirty, .. } = visit.kind else {
                continue;
            };
            let inputs = FieldInputs::gather(&self.form, visit.binding.clone(), show_error_if_dirty);
            let memo = self.views.entry(visit.key.clone()).or_default();
            fields.push(memo.get_or_compute(inputs, |inputs| FieldView::from(inputs)).clone());
        }
        self.views.retain(|key, _| self.mounted.contains_key(key));
        self.hooks = visits
            .into_iter()
            .filter_map(|visit| match visit.kind {
                VisitKind::Field { hook: Some(hook), .. } => Some((visit.binding.id, hook)),
                _ => None,
            })
            .collect();

        for view in &mut self.frame.arrays {
            view.status = self.form.status(&view.binding.id);
            view.error = self.form.error(&view.binding.id).map(str::to_string);
        }
        self.frame.fields = fields;
        Ok(&self.frame)
    }

    fn reconcile(&mut self) -> FormResult<Vec<Visit>> {
        let nodes = self.nodes.clone();
        let scope = self.form.scope();
        let mut visits = Vec::new();
        let mut arrays = Vec::new();
        self.walk(&nodes, &scope, "", None, &mut visits, &mut arrays)?;
        self.frame.arrays = arrays;

        // Only bindings the form holds go into `mounted`, so a failed mount
        // is retried on the next render
        let previous = std::mem::take(&mut self.mounted);
        let visited: HashSet<&str> = visits.iter().map(|visit| visit.key.as_str()).collect();
        let mut staying = HashSet::new();
        let mut moves = Vec::new();
        let mut mounts = Vec::new();
        for visit in &visits {
            match previous.get(&visit.key) {
                Some(old) if old.id == visit.binding.id => {
                    staying.insert(old.id.clone());
                    self.mounted.insert(visit.key.clone(), visit.binding.clone());
                }
                Some(old) => {
                    moves.push(FieldMove {
                        from: old.id.clone(),
                        to: visit.binding.id.clone(),
                        path: visit.binding.path.clone(),
                    });
                    self.mounted.insert(visit.key.clone(), visit.binding.clone());
                }
                None => mounts.push((visit.key.clone(), visit.binding.clone())),
            }
        }

        for (key, old) in &previous {
            if !visited.contains(key.as_str()) && !staying.contains(&old.id) {
                self.form.on_field_unmount(&old.id);
                self.unmounts += 1;
            }
        }
        if !moves.is_empty() {
            debug!(count = moves.len(), "Fields moved with their items");
            self.form.on_fields_moved(moves);
        }
        for (key, binding) in mounts {
            self.form.on_field_mount(binding.id.clone(), binding.path.clone())?;
            self.mounts += 1;
            self.mounted.insert(key, binding);
        }
        Ok(visits)
    }

    fn walk(
        &mut self,
        nodes: &[Node],
        scope: &Scope,
        parent_key: &str,
        array: Option<&ArrayView>,
        visits: &mut Vec<Visit>,
        arrays: &mut Vec<ArrayView>,
    ) -> FormResult<()> {
        for (position, node) in nodes.iter().enumerate() {
            let key = format!("{}/{}", parent_key, position);
            match node {
                Node::Field(field) => {
                    let address = scope.field(&field.name)?;
                    visits.push(Visit {
                        key,
                        binding: FieldBinding::new(address),
                        kind: VisitKind::Field {
                            show_error_if_dirty: field
                                .show_error_if_dirty
                                .unwrap_or(self.form.config().show_error_if_dirty),
                            hook: field.on_value_change.clone(),
                        },
                    });
                }
                Node::Group { name, children } => {
                    self.walk(children, &scope.group(name), &key, None, visits, arrays)?;
                }
                Node::Array { name, key_fn, children } => {
                    let address = scope.field(name)?;
                    visits.push(Visit {
                        key: key.clone(),
                        binding: FieldBinding::new(address.clone()),
                        kind: VisitKind::Array,
                    });
                    let binding = ArrayBinding::new(address);
                    let items = self
                        .form
                        .select(&binding.path)
                        .as_array()
                        .map(<[Value]>::to_vec)
                        .unwrap_or_default();
                    let ledger = self.ledgers.entry(key.clone()).or_default();
                    let keys = item_keys(&items, key_fn.as_ref(), ledger);
                    let view = ArrayView::new(items, keys, binding);
                    arrays.push(view.clone());
                    self.walk(children, &scope.array(name), &key, Some(&view), visits, arrays)?;
                }
                Node::Items(template) => {
                    let view = match (scope.array_context(), array) {
                        (Some(_), Some(view)) => view,
                        _ => {
                            return Err(FormError::missing_context(format!(
                                "array items rendered outside an array (scope \"{}\")",
                                scope.display_path()
                            )))
                        }
                    };
                    for item in view.item_views() {
                        let item_scope = scope.array_item(item.index)?;
                        let children = template(&item);
                        let item_key = format!("{}#{}", key, item.key.encode());
                        self.walk(&children, &item_scope, &item_key, None, visits, arrays)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn binding(&self, id: &str) -> FormResult<FieldBinding> {
        self.mounted
            .values()
            .find(|binding| binding.id.as_str() == id)
            .cloned()
            .ok_or_else(|| FormError::UnknownField(FieldId::from(id)))
    }

    fn array_view(&self, id: &str) -> FormResult<&ArrayView> {
        self.frame
            .array(id)
            .ok_or_else(|| FormError::UnknownField(FieldId::from(id)))
    }

    fn accept(&mut self, next: Value) -> FormResult<Value> {
        self.form.set_value(next.clone());
        self.render()?;
        Ok(next)
    }

    /// Type `value` into field `id`
    pub fn change(&mut self, id: &str, value: impl Into<Value>) -> FormResult<Value> {
        let binding = self.binding(id)?;
        let value = value.into();
        let next = binding.change(&mut self.form, value.clone())?;
        if let Some(hook) = self.hooks.get(&binding.id) {
            hook(&value);
        }
        self.accept(next)
    }

    pub fn blur(&mut self, id: &str) -> FormResult<()> {
        let binding = self.binding(id)?;
        binding.blur(&mut self.form)?;
        self.render()?;
        Ok(())
    }

    pub fn add_item(&mut self, array_id: &str, item: impl Into<Value>) -> FormResult<Value> {
        let binding = self.array_view(array_id)?.binding.clone();
        let next = binding.add_item(&mut self.form, item)?;
        self.accept(next)
    }

    pub fn remove_item(&mut self, array_id: &str, index: usize) -> FormResult<Value> {
        let binding = self.array_view(array_id)?.binding.item(index);
        let next = binding.remove(&mut self.form)?;
        self.accept(next)
    }

    pub fn set_value(&mut self, model: impl Into<Value>) -> FormResult<&Frame> {
        self.form.set_value(model);
        self.render()
    }

    pub fn submit(&mut self) -> FormResult<bool> {
        let valid = self.form.submit();
        self.render()?;
        Ok(valid)
    }

    /// View an array item the way its template saw it
    pub fn item_view(&self, array_id: &str, index: usize) -> Option<ArrayItemView> {
        self.frame.array(array_id)?.item_views().into_iter().nth(index)
    }
}
