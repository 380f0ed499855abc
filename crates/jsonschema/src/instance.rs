//! Instance document model.
//!
//! `InstanceModel` is a tagged-union document tree, immutable after construction, with
//! each node's source byte range recorded for diagnostic anchoring. It is arena-backed
//! (a flat `Vec<Node>` with parent-by-index backpointers) rather than a tree of owned
//! boxes, since `$ref`-style sharing isn't needed here and an arena avoids the borrow-
//! checker friction of a doubly-linked owned tree.
//!
//! [`InstanceModel::from_value`] adapts an already-parsed [`serde_json::Value`]; the
//! source tokenizer (JSON or YAML) is an external collaborator per spec's own scoping, so
//! spans are left empty here rather than re-deriving them with a second, crate-local JSON
//! reader duplicating what `serde_json` already did once.
use serde_json::{Number, Value};
use std::fmt;
use std::ops::Range;

use crate::primitive_type::PrimitiveType;

#[derive(Debug)]
enum NodeKind {
    Null,
    Bool(bool),
    Number(f64, bool),
    String(String),
    Array(Vec<usize>),
    Object(Vec<(String, usize)>),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    span: Option<Range<usize>>,
    #[allow(dead_code)]
    parent: Option<usize>,
}

/// A parsed instance document.
#[derive(Debug)]
pub struct InstanceModel {
    arena: Vec<Node>,
    root: usize,
}

/// A cheap handle to one node of an [`InstanceModel`].
#[derive(Clone, Copy)]
pub struct InstanceRef<'a> {
    model: &'a InstanceModel,
    index: usize,
}

impl fmt::Debug for InstanceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceRef({})", self.index)
    }
}

impl InstanceModel {
    #[must_use]
    pub fn from_value(value: &Value) -> InstanceModel {
        let mut arena = Vec::new();
        let root = push_value(&mut arena, value, None);
        InstanceModel { arena, root }
    }

    #[must_use]
    pub fn root(&self) -> InstanceRef<'_> {
        InstanceRef {
            model: self,
            index: self.root,
        }
    }
}

fn push_value(arena: &mut Vec<Node>, value: &Value, parent: Option<usize>) -> usize {
    let kind = match value {
        Value::Null => NodeKind::Null,
        Value::Bool(b) => NodeKind::Bool(*b),
        Value::Number(n) => NodeKind::Number(n.as_f64().unwrap_or(f64::NAN), is_integer(n)),
        Value::String(s) => NodeKind::String(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            // Placeholder; replaced below once the index is known, so children can record `parent`.
            NodeKind::Null
        }
    };
    let index = arena.len();
    arena.push(Node {
        kind,
        span: None,
        parent,
    });
    match value {
        Value::Array(items) => {
            let children = items
                .iter()
                .map(|item| push_value(arena, item, Some(index)))
                .collect();
            arena[index].kind = NodeKind::Array(children);
        }
        Value::Object(map) => {
            let children = map
                .iter()
                .map(|(k, v)| (k.clone(), push_value(arena, v, Some(index))))
                .collect();
            arena[index].kind = NodeKind::Object(children);
        }
        _ => {}
    }
    index
}

fn is_integer(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

impl<'a> InstanceRef<'a> {
    #[must_use]
    pub fn span(&self) -> Option<Range<usize>> {
        self.model.arena[self.index].span.clone()
    }

    #[must_use]
    pub fn primitive_type(&self) -> PrimitiveType {
        match &self.model.arena[self.index].kind {
            NodeKind::Null => PrimitiveType::Null,
            NodeKind::Bool(_) => PrimitiveType::Boolean,
            NodeKind::Number(_, is_integer) => {
                if *is_integer {
                    PrimitiveType::Integer
                } else {
                    PrimitiveType::Number
                }
            }
            NodeKind::String(_) => PrimitiveType::String,
            NodeKind::Array(_) => PrimitiveType::Array,
            NodeKind::Object(_) => PrimitiveType::Object,
        }
    }

    /// True if this node's runtime type matches `expected`, treating `integer` as a
    /// constraint on numbers whose fractional part is zero (spec's numeric sub-type rule).
    #[must_use]
    pub fn matches_type(&self, expected: PrimitiveType) -> bool {
        match (&self.model.arena[self.index].kind, expected) {
            (NodeKind::Number(_, _), PrimitiveType::Number) => true,
            (NodeKind::Number(_, is_integer), PrimitiveType::Integer) => *is_integer,
            _ => self.primitive_type() == expected,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.model.arena[self.index].kind {
            NodeKind::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.model.arena[self.index].kind {
            NodeKind::Number(n, _) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match &self.model.arena[self.index].kind {
            NodeKind::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn array_items(&self) -> Option<impl Iterator<Item = InstanceRef<'a>> + 'a> {
        match &self.model.arena[self.index].kind {
            NodeKind::Array(items) => {
                let model = self.model;
                Some(items.iter().map(move |&index| InstanceRef { model, index }))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn array_len(&self) -> Option<usize> {
        match &self.model.arena[self.index].kind {
            NodeKind::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    #[must_use]
    pub fn object_properties(&self) -> Option<impl Iterator<Item = (&'a str, InstanceRef<'a>)> + 'a> {
        match &self.model.arena[self.index].kind {
            NodeKind::Object(props) => {
                let model = self.model;
                Some(
                    props
                        .iter()
                        .map(move |(k, &index)| (k.as_str(), InstanceRef { model, index })),
                )
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<InstanceRef<'a>> {
        match &self.model.arena[self.index].kind {
            NodeKind::Object(props) => props.iter().find(|(k, _)| k == name).map(|&(_, index)| {
                InstanceRef {
                    model: self.model,
                    index,
                }
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn object_len(&self) -> Option<usize> {
        match &self.model.arena[self.index].kind {
            NodeKind::Object(props) => Some(props.len()),
            _ => None,
        }
    }

    /// Materialize this subtree as a [`serde_json::Value`], for keywords that need full
    /// structural equality (`const`, `enum`, `uniqueItems`).
    #[must_use]
    pub fn to_value(&self) -> Value {
        match &self.model.arena[self.index].kind {
            NodeKind::Null => Value::Null,
            NodeKind::Bool(b) => Value::Bool(*b),
            NodeKind::Number(n, is_integer) => {
                let number = if *is_integer {
                    Some(Number::from(*n as i64))
                } else {
                    Number::from_f64(*n)
                };
                number.map_or(Value::Null, Value::Number)
            }
            NodeKind::String(s) => Value::String(s.clone()),
            NodeKind::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|&index| {
                        InstanceRef {
                            model: self.model,
                            index,
                        }
                        .to_value()
                    })
                    .collect(),
            ),
            NodeKind::Object(props) => Value::Object(
                props
                    .iter()
                    .map(|(k, &index)| {
                        (
                            k.clone(),
                            InstanceRef {
                                model: self.model,
                                index,
                            }
                            .to_value(),
                        )
                    })
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for InstanceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

