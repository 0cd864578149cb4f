//! Associative id → record storage.
//!
//! [`IdMap`] is a thin wrapper around `im::HashMap`: cloning is O(1) and
//! clones share structure, so a whole registry can be snapshotted cheaply
//! and compared for equality.

use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Keyed record storage consumed by the forest and the registry.
///
/// No ordering guarantees are made.
pub trait Store<K, V> {
    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns `false` (leaving the store unchanged) if the key was present.
    fn insert_if_absent(&mut self, key: K, value: V) -> bool;

    /// Returns true if the store holds `key`.
    fn contains(&self, key: &K) -> bool;

    /// Returns a shared handle to the record under `key`.
    fn get(&self, key: &K) -> Option<&V>;

    /// Returns a mutable handle to the record under `key`.
    fn get_mut(&mut self, key: &K) -> Option<&mut V>;
}

/// Persistent hash map keyed by id, with structural sharing.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: Serialize + Hash + Eq + Clone, V: Serialize + Clone",
        deserialize = "K: Deserialize<'de> + Hash + Eq + Clone, V: Deserialize<'de> + Clone"
    ))
)]
pub struct IdMap<K, V>(im::HashMap<K, V>)
where
    K: Clone + Eq + Hash,
    V: Clone;

impl<K: Clone + Eq + Hash, V: Clone> Default for IdMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> IdMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(im::HashMap::new())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over key-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter()
    }

    /// Returns an iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.keys()
    }

    /// Returns an iterator over values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.values()
    }
}

impl<K: Clone + Eq + Hash, V: Clone> Store<K, V> for IdMap<K, V> {
    fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    fn contains(&self, key: &K) -> bool {
        self.0.contains_key(key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.0.get(key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.0.get_mut(key)
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug, V: Clone + fmt::Debug> fmt::Debug for IdMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone + Eq + Hash, V: Clone + PartialEq> PartialEq for IdMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K: Clone + Eq + Hash, V: Clone + Eq> Eq for IdMap<K, V> {}

impl<K: Clone + Eq + Hash, V: Clone> FromIterator<(K, V)> for IdMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(im::HashMap::from_iter(iter))
    }
}
