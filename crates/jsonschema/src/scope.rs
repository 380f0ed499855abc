//! Evaluation scope: the current dynamic-resolution context plus the accumulated
//! instance/schema paths used to anchor diagnostics.
use std::collections::HashSet;

use referencing::{Draft, Registry, Resolver};

use crate::paths::{JSONPointer, PathChunk};

/// A stack frame carrying the current base URI, the dynamic-scope chain (both owned by
/// the wrapped [`referencing::Resolver`]), and the instance/schema paths accumulated so
/// far. Cloning a `Scope` is cheap; each recursive step into a subschema clones, extends,
/// and passes the clone down (the dynamic scope chain only grows, matching spec's "never
/// popped until evaluation leaves them").
#[derive(Clone)]
pub(crate) struct Scope<'r> {
    pub(crate) resolver: Resolver<'r>,
    pub(crate) dialect: Draft,
    pub(crate) instance_path: JSONPointer,
    pub(crate) schema_path: JSONPointer,
}

impl<'r> Scope<'r> {
    pub(crate) fn root(registry: &'r Registry, resolver: Resolver<'r>, dialect: Draft) -> Scope<'r> {
        let _ = registry;
        Scope {
            resolver,
            dialect,
            instance_path: JSONPointer::default(),
            schema_path: JSONPointer::default(),
        }
    }

    pub(crate) fn push_instance(&self, chunk: impl Into<PathChunk>) -> Scope<'r> {
        let mut next = self.clone();
        next.instance_path = self.instance_path.clone_with(chunk);
        next
    }

    pub(crate) fn push_schema(&self, chunk: impl Into<PathChunk>) -> Scope<'r> {
        let mut next = self.clone();
        next.schema_path = self.schema_path.clone_with(chunk);
        next
    }
}

/// Breaks cycles in self-referential schemas: a seen (schema-location, instance-location)
/// pair short-circuits re-descent, per spec's `$ref`/`$recursiveRef` cycle-protection note.
#[derive(Default)]
pub(crate) struct SeenSet {
    seen: HashSet<(String, String)>,
}

impl SeenSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this is a new (schema, instance) pair (and records it), `false`
    /// if it has already been visited on this path.
    pub(crate) fn enter(&mut self, schema_location: &str, instance_location: &str) -> bool {
        self.seen
            .insert((schema_location.to_owned(), instance_location.to_owned()))
    }
}
