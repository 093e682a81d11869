//! Least Recently Used (LRU) cache.
//!
//! Evicts the entry that has gone the longest without being accessed. Get and
//! put are O(1): a [`crate::list::IndexList`] keeps entries ordered by
//! recency (most-recently-used at the front, least-recently-used at the
//! back) and a `HashMap` maps each key to its list handle.
//!
//! ```text
//! MRU  [ c ] <-> [ b ] <-> [ a ]  LRU   (evict from this end)
//! ```
//!
//! All mutable state lives behind a single `parking_lot::Mutex`, so every
//! method takes `&self` and the type is `Send + Sync` without an external
//! wrapper.

use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::config::LruCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Handle, IndexList};
use crate::policy::{CachePolicy, InternalCachePolicy};
use crate::HashMap;

struct LruState<K, V, S> {
    map: HashMap<K, Handle, S>,
    list: IndexList<CacheEntry<K, V>>,
}

/// A thread-safe, fixed-capacity LRU cache.
pub struct LruCache<K, V, S = std::collections::hash_map::RandomState> {
    capacity: NonZeroUsize,
    state: Mutex<LruState<K, V, S>>,
}

impl<K, V> LruCache<K, V, std::collections::hash_map::RandomState>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache that holds at most `config.capacity()` entries.
    pub fn from_config(config: LruCacheConfig) -> Self {
        Self::with_hasher(config, std::collections::hash_map::RandomState::default())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates a cache using an explicit hasher builder, for callers that
    /// want a non-default `S` (as the sharded wrapper's factory does).
    pub fn with_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        LruCache {
            capacity: config.capacity(),
            state: Mutex::new(LruState {
                map: HashMap::with_hasher(hash_builder),
                list: IndexList::new(),
            }),
        }
    }

    /// The maximum number of entries this cache will hold.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl<K, V, S> CachePolicy<K, V> for LruCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn put(&self, key: K, value: V) {
        let mut state = self.state.lock();
        if let Some(&handle) = state.map.get(&key) {
            state.list.get_mut(handle).value = value;
            state.list.move_to_front(handle);
            return;
        }

        if state.map.len() >= self.capacity.get() {
            if let Some((_, evicted)) = state.list.pop_back() {
                state.map.remove(&evicted.key);
            }
        }

        let handle = state.list.push_front(CacheEntry::new(key.clone(), value, ()));
        state.map.insert(key, handle);
    }

    fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let handle = *state.map.get(key)?;
        state.list.move_to_front(handle);
        Some(state.list.get(handle).value.clone())
    }

    fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let handle = state.map.remove(key)?;
        Some(state.list.remove(handle).value)
    }

    fn len(&self) -> usize {
        self.state.lock().map.len()
    }

    fn purge(&self) {
        let mut state = self.state.lock();
        state.map.clear();
        state.list.clear();
    }
}

impl<K, V, S> InternalCachePolicy<K, V> for LruCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn evict_one(&self) -> Option<(K, V)> {
        let mut state = self.state.lock();
        let (_, entry) = state.list.pop_back()?;
        state.map.remove(&entry.key);
        Some((entry.key, entry.value))
    }
}

impl<K, V, S> std::fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .finish()
    }
}
