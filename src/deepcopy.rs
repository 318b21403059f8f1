//! Structural duplication of parsed configuration.
//!
//! A parsed command is a template: the execution engine hands out copies per
//! loop iteration and per reuse, and each copy may be mutated independently.
//! [`DeepCopy`] makes that contract explicit. A copy shares no owned storage
//! with its source; only immutable entities held behind [`Arc`] (platforms)
//! stay shared.

use std::sync::Arc;

use indexmap::IndexMap;

/// Produces an independent copy whose owned storage does not alias `self`.
pub trait DeepCopy {
    /// Returns the copy.
    #[must_use]
    fn deep_copy(&self) -> Self;
}

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy(&self) -> Self {
        self.as_ref().map(DeepCopy::deep_copy)
    }
}

/// Copies a slice into fresh storage.
///
/// Elements are cloned; for `Arc` elements that means the list is new while
/// the pointees are shared.
#[must_use]
pub fn slice<T: Clone>(items: &[T]) -> Vec<T> {
    items.to_vec()
}

/// Copies an ordered map into fresh storage, preserving order.
#[must_use]
pub fn map<K: Clone + std::hash::Hash + Eq, V: Clone>(entries: &IndexMap<K, V>) -> IndexMap<K, V> {
    entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

/// Returns `true` when two shared entities are the same allocation.
#[must_use]
pub fn shares<T>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::ptr_eq(a, b)
}
