//! Insertion-ordered hash table backing sets and maps.

use core::hash::{BuildHasher, Hash};
use hashbrown::{DefaultHashBuilder, HashTable};

/// Entries live in a vector in insertion order; the hash table only stores
/// indices into it.
#[derive(Clone)]
pub(crate) struct OrderedTable<K, V> {
    entries: Vec<(K, V)>,
    index: HashTable<usize>,
    hasher: DefaultHashBuilder,
}

impl<K: Hash + Eq, V> OrderedTable<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashTable::new(),
            hasher: DefaultHashBuilder::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &K) -> Option<usize> {
        let hash = self.hasher.hash_one(key);
        let entries = &self.entries;
        self.index.find(hash, |&i| entries[i].0 == *key).copied()
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Inserts or replaces. A replaced entry keeps its original position and
    /// the old value is returned.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(i) = self.position(&key) {
            return Some(core::mem::replace(&mut self.entries[i].1, value));
        }
        let hash = self.hasher.hash_one(&key);
        let position = self.entries.len();
        self.entries.push((key, value));
        let entries = &self.entries;
        let hasher = &self.hasher;
        self.index
            .insert_unique(hash, position, |&i| hasher.hash_one(&entries[i].0));
        None
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }
}
