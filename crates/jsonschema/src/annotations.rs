//! Per-location annotation bookkeeping for `unevaluatedProperties`/`unevaluatedItems`.
//!
//! A fresh [`AnnotationLedger`] is threaded through the evaluation of a single schema
//! object at a single instance location: every keyword that "evaluates" a property name
//! or array index merges its contribution in here, and `unevaluatedProperties`/
//! `unevaluatedItems` consult it once every other keyword at that same location has run.
//! Cousin isolation (allOf\[i\] never sees allOf\[j\]'s annotations) falls out of this
//! naturally: each recursive `allOf`/`anyOf`/... branch gets its own ledger and only its
//! caller decides whether to merge it into the parent's.
use std::collections::HashSet;

/// Which array indices have been "evaluated" so far.
///
/// `contains` can mark an arbitrary, non-contiguous index (e.g. only the last item of an
/// array), so this has to be a real set rather than a prefix length — a schema matching
/// only index 2 of a 3-element array must leave indices 0 and 1 unevaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluatedItems {
    Some(HashSet<usize>),
    /// Every index is evaluated (e.g. a schema-form `items` that matched).
    All,
}

impl Default for EvaluatedItems {
    fn default() -> Self {
        EvaluatedItems::Some(HashSet::new())
    }
}

impl EvaluatedItems {
    fn merge(self, other: EvaluatedItems) -> EvaluatedItems {
        match (self, other) {
            (EvaluatedItems::All, _) | (_, EvaluatedItems::All) => EvaluatedItems::All,
            (EvaluatedItems::Some(mut a), EvaluatedItems::Some(b)) => {
                a.extend(b);
                EvaluatedItems::Some(a)
            }
        }
    }
}

/// Annotations accumulated while evaluating one schema object against one instance location.
#[derive(Debug, Clone, Default)]
pub struct AnnotationLedger {
    properties: HashSet<String>,
    items: EvaluatedItems,
}

impl AnnotationLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mark_property(&mut self, name: &str) {
        self.properties.insert(name.to_owned());
    }

    /// Marks indices `0..n` evaluated, e.g. `prefixItems`/positional `items` matching the
    /// first `n` elements.
    pub(crate) fn mark_items_up_to(&mut self, n: usize) {
        self.items = std::mem::take(&mut self.items).merge(EvaluatedItems::Some((0..n).collect()));
    }

    pub(crate) fn mark_all_items(&mut self) {
        self.items = EvaluatedItems::All;
    }

    /// Marks a single index evaluated, e.g. a `contains` match at that position.
    pub(crate) fn mark_index(&mut self, index: usize) {
        self.items = std::mem::take(&mut self.items).merge(EvaluatedItems::Some(HashSet::from([index])));
    }

    /// Merge another location's contribution into this one (e.g. a successful `allOf` branch
    /// into the schema object that contains it).
    pub(crate) fn merge(&mut self, other: &AnnotationLedger) {
        self.properties.extend(other.properties.iter().cloned());
        self.items = std::mem::take(&mut self.items).merge(other.items.clone());
    }

    #[must_use]
    pub fn is_property_evaluated(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    #[must_use]
    pub fn is_index_evaluated(&self, index: usize) -> bool {
        match &self.items {
            EvaluatedItems::Some(indices) => indices.contains(&index),
            EvaluatedItems::All => true,
        }
    }

    /// The smallest index not covered by any annotation, used for `unevaluatedItems`'s
    /// "Expected K or fewer" message (K = this value). Only meaningful when the evaluated
    /// indices form a prefix; callers that need exact per-index coverage should use
    /// [`Self::is_index_evaluated`] instead.
    #[must_use]
    pub fn first_unevaluated_index(&self) -> usize {
        match &self.items {
            EvaluatedItems::Some(indices) => {
                let mut n = 0;
                while indices.contains(&n) {
                    n += 1;
                }
                n
            }
            EvaluatedItems::All => usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_index_does_not_evaluate_lower_indices() {
        let mut ledger = AnnotationLedger::new();
        ledger.mark_index(2);

        assert!(!ledger.is_index_evaluated(0));
        assert!(!ledger.is_index_evaluated(1));
        assert!(ledger.is_index_evaluated(2));
        // No contiguous prefix exists, so the first gap is at index 0.
        assert_eq!(ledger.first_unevaluated_index(), 0);
    }

    #[test]
    fn mark_items_up_to_covers_a_prefix() {
        let mut ledger = AnnotationLedger::new();
        ledger.mark_items_up_to(2);

        assert!(ledger.is_index_evaluated(0));
        assert!(ledger.is_index_evaluated(1));
        assert!(!ledger.is_index_evaluated(2));
        assert_eq!(ledger.first_unevaluated_index(), 2);
    }

    #[test]
    fn merge_unions_non_contiguous_indices() {
        let mut a = AnnotationLedger::new();
        a.mark_items_up_to(1);
        let mut b = AnnotationLedger::new();
        b.mark_index(2);
        a.merge(&b);

        assert!(a.is_index_evaluated(0));
        assert!(!a.is_index_evaluated(1));
        assert!(a.is_index_evaluated(2));
        assert_eq!(a.first_unevaluated_index(), 1);
    }
}
