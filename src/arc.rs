//! ARC: the Adaptive Replacement Cache.
//!
//! ARC keeps four lists instead of LRU's one:
//!
//! - **T1** — entries seen exactly once recently (recency).
//! - **T2** — entries seen two or more times recently (frequency).
//! - **B1** — ghost entries: keys recently evicted from T1 (no values).
//! - **B2** — ghost entries: keys recently evicted from T2 (no values).
//!
//! `p` is the target size of T1 and adapts on every ghost hit: a hit in B1
//! means recency pressure is under-served, so `p` grows; a hit in B2 means
//! frequency pressure is under-served, so `p` shrinks. `REPLACE` then evicts
//! from T1 or T2 depending on which side of `p` the real lists currently
//! sit on.
//!
//! Because this is a cache rather than a page-replacement layer in front of
//! a backing store, a ghost hit cannot itself produce a value: both [`get`]
//! and [`put`] run the `p`-adaptation and `REPLACE` machinery on a B1/B2
//! hit and erase the ghost, but only `put` has a fresh value to insert into
//! T2 afterward — a ghost hit observed through `get` still reports a miss.
//!
//! [`get`]: ArcCache::get
//! [`put`]: ArcCache::put
//!
//! A capacity of zero is tolerated per this crate's fault-handling
//! convention: every `put` is then a silent no-op and every `get` a miss.

use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::config::ArcCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Handle, IndexList};
use crate::policy::CachePolicy;
use crate::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum RealList {
    T1,
    T2,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum GhostList {
    B1,
    B2,
}

struct ArcState<K, V, S> {
    t1: IndexList<CacheEntry<K, V>>,
    t2: IndexList<CacheEntry<K, V>>,
    b1: IndexList<K>,
    b2: IndexList<K>,
    real_index: HashMap<K, (RealList, Handle), S>,
    ghost_index: HashMap<K, (GhostList, Handle), S>,
    p: usize,
}

impl<K, V, S> ArcState<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Evicts the LRU entry of T1 into B1 if T1 is oversized relative to
    /// `p` (or tied with it on a B2 hit); otherwise evicts T2's LRU entry
    /// into B2.
    fn replace(&mut self, hit_was_in_b2: bool) {
        let t1_len = self.t1.len();
        let evict_from_t1 = t1_len >= 1 && (t1_len > self.p || (hit_was_in_b2 && t1_len == self.p));
        if evict_from_t1 {
            if let Some((_, entry)) = self.t1.pop_back() {
                self.real_index.remove(&entry.key);
                let handle = self.b1.push_front(entry.key.clone());
                self.ghost_index.insert(entry.key, (GhostList::B1, handle));
            }
        } else if let Some((_, entry)) = self.t2.pop_back() {
            self.real_index.remove(&entry.key);
            let handle = self.b2.push_front(entry.key.clone());
            self.ghost_index.insert(entry.key, (GhostList::B2, handle));
        }
    }

    fn insert_into_t2_mru(&mut self, key: K, value: V) {
        let handle = self.t2.push_front(CacheEntry::new(key.clone(), value, ()));
        self.real_index.insert(key, (RealList::T2, handle));
    }

    /// Case IV of the ARC algorithm: `key` is in none of the four lists.
    fn admit_new(&mut self, key: K, value: V, capacity: usize) {
        let t1_len = self.t1.len();
        let b1_len = self.b1.len();
        if t1_len + b1_len == capacity {
            if t1_len < capacity {
                if let Some((_, ghost_key)) = self.b1.pop_back() {
                    self.ghost_index.remove(&ghost_key);
                }
                self.replace(false);
            } else if let Some((_, entry)) = self.t1.pop_back() {
                self.real_index.remove(&entry.key);
            }
        } else if t1_len + b1_len < capacity {
            let total = t1_len + self.t2.len() + b1_len + self.b2.len();
            if total >= capacity {
                if total == 2 * capacity {
                    if let Some((_, ghost_key)) = self.b2.pop_back() {
                        self.ghost_index.remove(&ghost_key);
                    }
                }
                self.replace(false);
            }
        }
        let handle = self.t1.push_front(CacheEntry::new(key.clone(), value, ()));
        self.real_index.insert(key, (RealList::T1, handle));
    }
}

/// A thread-safe Adaptive Replacement Cache.
pub struct ArcCache<K, V, S = std::collections::hash_map::RandomState> {
    capacity: usize,
    state: Mutex<ArcState<K, V, S>>,
}

impl<K, V> ArcCache<K, V, std::collections::hash_map::RandomState>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache from an [`ArcCacheConfig`].
    pub fn from_config(config: ArcCacheConfig) -> Self {
        ArcCache {
            capacity: config.capacity(),
            state: Mutex::new(ArcState {
                t1: IndexList::new(),
                t2: IndexList::new(),
                b1: IndexList::new(),
                b2: IndexList::new(),
                real_index: HashMap::with_hasher(std::collections::hash_map::RandomState::default()),
                ghost_index: HashMap::with_hasher(std::collections::hash_map::RandomState::default()),
                p: 0,
            }),
        }
    }

    /// The cache's target capacity for real (non-ghost) entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V, S> CachePolicy<K, V> for ArcCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn put(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let mut state = self.state.lock();

        if let Some(&(list, handle)) = state.real_index.get(&key) {
            match list {
                RealList::T1 => {
                    let mut entry = state.t1.remove(handle);
                    entry.value = value;
                    let new_handle = state.t2.push_front(entry);
                    state.real_index.insert(key, (RealList::T2, new_handle));
                }
                RealList::T2 => {
                    state.t2.get_mut(handle).value = value;
                    state.t2.move_to_front(handle);
                }
            }
            return;
        }

        if let Some(&(GhostList::B1, handle)) = state.ghost_index.get(&key) {
            let delta = (state.b2.len() / state.b1.len().max(1)).max(1);
            state.p = (state.p + delta).min(self.capacity);
            state.b1.remove(handle);
            state.ghost_index.remove(&key);
            state.replace(false);
            state.insert_into_t2_mru(key, value);
            return;
        }

        if let Some(&(GhostList::B2, handle)) = state.ghost_index.get(&key) {
            let delta = (state.b1.len() / state.b2.len().max(1)).max(1);
            state.p = state.p.saturating_sub(delta);
            state.b2.remove(handle);
            state.ghost_index.remove(&key);
            state.replace(true);
            state.insert_into_t2_mru(key, value);
            return;
        }

        state.admit_new(key, value, self.capacity);
    }

    fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();

        if let Some(&(list, handle)) = state.real_index.get(key) {
            let value = match list {
                RealList::T1 => state.t1.get(handle).value.clone(),
                RealList::T2 => state.t2.get(handle).value.clone(),
            };
            match list {
                RealList::T1 => {
                    let entry = state.t1.remove(handle);
                    let new_handle = state.t2.push_front(entry);
                    state.real_index.insert(key.clone(), (RealList::T2, new_handle));
                }
                RealList::T2 => state.t2.move_to_front(handle),
            }
            return Some(value);
        }

        if let Some(&(GhostList::B1, handle)) = state.ghost_index.get(key) {
            let delta = (state.b2.len() / state.b1.len().max(1)).max(1);
            state.p = (state.p + delta).min(self.capacity);
            state.b1.remove(handle);
            state.ghost_index.remove(key);
            state.replace(false);
            return None;
        }

        if let Some(&(GhostList::B2, handle)) = state.ghost_index.get(key) {
            let delta = (state.b1.len() / state.b2.len().max(1)).max(1);
            state.p = state.p.saturating_sub(delta);
            state.b2.remove(handle);
            state.ghost_index.remove(key);
            state.replace(true);
            return None;
        }

        None
    }

    fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        if let Some((list, handle)) = state.real_index.remove(key) {
            let value = match list {
                RealList::T1 => state.t1.remove(handle).value,
                RealList::T2 => state.t2.remove(handle).value,
            };
            return Some(value);
        }
        if let Some((list, handle)) = state.ghost_index.remove(key) {
            match list {
                GhostList::B1 => {
                    state.b1.remove(handle);
                }
                GhostList::B2 => {
                    state.b2.remove(handle);
                }
            }
        }
        None
    }

    fn len(&self) -> usize {
        let state = self.state.lock();
        state.t1.len() + state.t2.len()
    }

    fn purge(&self) {
        let mut state = self.state.lock();
        state.t1.clear();
        state.t2.clear();
        state.b1.clear();
        state.b2.clear();
        state.real_index.clear();
        state.ghost_index.clear();
        state.p = 0;
    }
}

impl<K, V, S> std::fmt::Debug for ArcCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcCache")
            .field("capacity", &self.capacity)
            .finish()
    }
}
