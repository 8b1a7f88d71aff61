//! Thread-safe key-value store with atomic conditional primitives.
//!
//! Every mutation goes through one of three primitives, each of which runs
//! under a single shard lock of the underlying [`DashMap`]. Callers never
//! compose a read with a later write.

use std::borrow::Borrow;
use std::hash::Hash;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Concurrent map with atomic test-and-insert, swap, and compare-and-remove.
#[derive(Debug)]
pub struct ConcurrentStore<K, V>
where
    K: Eq + Hash,
{
    inner: DashMap<K, V>,
}

impl<K, V> ConcurrentStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Inserts `value` under `key` only if the key is absent.
    ///
    /// Returns `true` when this call performed the insert, `false` when the
    /// key was already present (the stored value is left untouched).
    pub fn test_and_insert(&self, key: K, value: V) -> bool {
        match self.inner.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Stores `value` under `key`, returning whatever was there before.
    pub fn swap(&self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    /// Removes the entry for `key` only if `predicate` accepts the stored value.
    ///
    /// The predicate runs while the shard is locked, so no concurrent `swap`
    /// can slip between the check and the removal.
    pub fn compare_and_remove<Q>(&self, key: &Q, predicate: impl FnOnce(&V) -> bool) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner
            .remove_if(key, |_, current| predicate(current))
            .is_some()
    }

    /// Returns `true` if `key` is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> ConcurrentStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Returns a clone of the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    /// Snapshot of all stored values.
    pub fn values(&self) -> Vec<V> {
        self.inner
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl<K, V> Default for ConcurrentStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
