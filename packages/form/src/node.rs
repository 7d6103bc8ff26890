//! Declarative field tree rendered by the [`Host`](crate::Host)

use crate::array::ArrayItemView;
use crate::array_keys::KeyFn;
use formwire_model::{Path, Value};
use std::fmt;
use std::sync::Arc;

/// Called with a field's new value after the change is dispatched
pub type ValueHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// Produces the nodes of one array item
pub type ItemTemplate = Arc<dyn Fn(&ArrayItemView) -> Vec<Node> + Send + Sync>;

#[derive(Clone)]
pub struct FieldNode {
    pub name: Path,
    /// Overrides the form-wide display policy
    pub show_error_if_dirty: Option<bool>,
    pub on_value_change: Option<ValueHook>,
}

impl FieldNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: Path::parse(name),
            show_error_if_dirty: None,
            on_value_change: None,
        }
    }

    pub fn show_error_if_dirty(mut self, show: bool) -> Self {
        self.show_error_if_dirty = Some(show);
        self
    }

    pub fn on_value_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on_value_change = Some(Arc::new(hook));
        self
    }
}

impl From<FieldNode> for Node {
    fn from(field: FieldNode) -> Self {
        Node::Field(field)
    }
}

#[derive(Clone)]
pub enum Node {
    Field(FieldNode),
    Group {
        name: Path,
        children: Vec<Node>,
    },
    Array {
        name: Path,
        key_fn: Option<KeyFn>,
        children: Vec<Node>,
    },
    /// Renders every item of the enclosing array with a template
    Items(ItemTemplate),
}

impl Node {
    pub fn field(name: &str) -> Self {
        Node::Field(FieldNode::new(name))
    }

    pub fn group(name: &str, children: Vec<Node>) -> Self {
        Node::Group {
            name: Path::parse(name),
            children,
        }
    }

    /// Array whose items are rendered by `template`, keyed by the ledger
    pub fn array<F>(name: &str, template: F) -> Self
    where
        F: Fn(&ArrayItemView) -> Vec<Node> + Send + Sync + 'static,
    {
        Node::Array {
            name: Path::parse(name),
            key_fn: None,
            children: vec![Node::items(template)],
        }
    }

    /// Array whose item keys come from `key_fn`
    pub fn keyed_array<K, F>(name: &str, key_fn: K, template: F) -> Self
    where
        K: Fn(&Value, usize) -> String + Send + Sync + 'static,
        F: Fn(&ArrayItemView) -> Vec<Node> + Send + Sync + 'static,
    {
        Node::Array {
            name: Path::parse(name),
            key_fn: Some(Arc::new(key_fn)),
            children: vec![Node::items(template)],
        }
    }

    pub fn items<F>(template: F) -> Self
    where
        F: Fn(&ArrayItemView) -> Vec<Node> + Send + Sync + 'static,
    {
        Node::Items(Arc::new(template))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Field(field) => f
                .debug_struct("Field")
                .field("name", &field.name)
                .field("show_error_if_dirty", &field.show_error_if_dirty)
                .finish_non_exhaustive(),
            Node::Group { name, children } => f
                .debug_struct("Group")
                .field("name", name)
                .field("children", children)
                .finish(),
            Node::Array { name, key_fn, children } => f
                .debug_struct("Array")
                .field("name", name)
                .field("keyed", &key_fn.is_some())
                .field("children", children)
                .finish(),
            Node::Items(_) => f.write_str("Items(<template>)"),
        }
    }
}
