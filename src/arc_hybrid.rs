//! ARC-hybrid: an Adaptive Replacement Cache whose two real lists are full
//! engines in their own right rather than plain recency/frequency chains.
//!
//! Direct ARC's T1 is a recency list and T2 is a frequency-ordered list
//! implemented from scratch (see [`crate::arc`]). This variant delegates
//! T1 to an [`LruCache`] and T2 to an [`LfuCache`], reusing their existing
//! eviction and promotion logic instead of reimplementing it, while keeping
//! the ARC-specific machinery — the two ghost lists B1/B2 and the adaptive
//! target size `p` — as this type's own responsibility.
//!
//! The outer mutex here guards only the ARC bookkeeping that the delegate
//! engines don't already own: the ghost lists, the `key -> {T1, T2}`
//! location index, and `p`. The delegate [`LruCache`]/[`LfuCache`] each hold
//! their own inner mutex and are only ever called while the outer lock is
//! already held, never the reverse, so there is no lock-ordering cycle.
//!
//! As with [`ArcCache`](crate::ArcCache), a capacity of zero makes every
//! `put` a no-op and every `get` a miss.

use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::config::{ArcHybridCacheConfig, LfuCacheConfig, LruCacheConfig};
use crate::lfu::LfuCache;
use crate::list::{Handle, IndexList};
use crate::lru::LruCache;
use crate::policy::{CachePolicy, InternalCachePolicy};
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

struct HybridState<K, S> {
    b1: IndexList<K>,
    b2: IndexList<K>,
    location: HashMap<K, RealList, S>,
    ghost_index: HashMap<K, (GhostList, Handle), S>,
    p: usize,
}

/// A thread-safe Adaptive Replacement Cache whose T1/T2 real lists are an
/// [`LruCache`] and an [`LfuCache`] respectively.
pub struct ArcHybridCache<K, V, S = std::collections::hash_map::RandomState> {
    capacity: usize,
    t1: LruCache<K, V, S>,
    t2: LfuCache<K, V, S>,
    state: Mutex<HybridState<K, S>>,
}

impl<K, V> ArcHybridCache<K, V, std::collections::hash_map::RandomState>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache from an [`ArcHybridCacheConfig`].
    pub fn from_config(config: ArcHybridCacheConfig) -> Self {
        let capacity = config.capacity();
        let segment_capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity.max(1) >= 1");
        ArcHybridCache {
            capacity,
            t1: LruCache::from_config(LruCacheConfig::new(segment_capacity)),
            t2: LfuCache::from_config(LfuCacheConfig::new(segment_capacity)),
            state: Mutex::new(HybridState {
                b1: IndexList::new(),
                b2: IndexList::new(),
                location: HashMap::with_hasher(std::collections::hash_map::RandomState::default()),
                ghost_index: HashMap::with_hasher(std::collections::hash_map::RandomState::default()),
                p: 0,
            }),
        }
    }
}

impl<K, S> HybridState<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn evict_t1_into_ghost(&mut self, evicted_key: K) {
        self.location.remove(&evicted_key);
        let handle = self.b1.push_front(evicted_key.clone());
        self.ghost_index.insert(evicted_key, (GhostList::B1, handle));
    }

    fn evict_t2_into_ghost(&mut self, evicted_key: K) {
        self.location.remove(&evicted_key);
        let handle = self.b2.push_front(evicted_key.clone());
        self.ghost_index.insert(evicted_key, (GhostList::B2, handle));
    }
}

impl<K, V, S> ArcHybridCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn replace(&self, state: &mut HybridState<K, S>, hit_was_in_b2: bool) {
        let t1_len = self.t1.len();
        let evict_from_t1 = t1_len >= 1 && (t1_len > state.p || (hit_was_in_b2 && t1_len == state.p));
        if evict_from_t1 {
            if let Some((key, _)) = self.t1.evict_one() {
                state.evict_t1_into_ghost(key);
            }
        } else if let Some((key, _)) = self.t2.evict_one() {
            state.evict_t2_into_ghost(key);
        }
    }

    fn admit_new(&self, state: &mut HybridState<K, S>, key: K, value: V) {
        let t1_len = self.t1.len();
        let b1_len = state.b1.len();
        if t1_len + b1_len == self.capacity {
            if t1_len < self.capacity {
                if let Some((_, ghost_key)) = state.b1.pop_back() {
                    state.ghost_index.remove(&ghost_key);
                }
                self.replace(state, false);
            } else if let Some((key, _)) = self.t1.evict_one() {
                state.location.remove(&key);
            }
        } else if t1_len + b1_len < self.capacity {
            let total = t1_len + self.t2.len() + b1_len + state.b2.len();
            if total >= self.capacity {
                if total == 2 * self.capacity {
                    if let Some((_, ghost_key)) = state.b2.pop_back() {
                        state.ghost_index.remove(&ghost_key);
                    }
                }
                self.replace(state, false);
            }
        }
        self.t1.put(key.clone(), value);
        state.location.insert(key, RealList::T1);
    }
}

impl<K, V, S> CachePolicy<K, V> for ArcHybridCache<K, V, S>
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

        if let Some(&loc) = state.location.get(&key) {
            match loc {
                RealList::T1 => {
                    self.t1.remove(&key);
                    self.t2.put(key.clone(), value);
                    state.location.insert(key, RealList::T2);
                }
                RealList::T2 => self.t2.put(key, value),
            }
            return;
        }

        if let Some(&(GhostList::B1, handle)) = state.ghost_index.get(&key) {
            let delta = (state.b2.len() / state.b1.len().max(1)).max(1);
            state.p = (state.p + delta).min(self.capacity);
            state.b1.remove(handle);
            state.ghost_index.remove(&key);
            self.replace(&mut state, false);
            self.t2.put(key.clone(), value);
            state.location.insert(key, RealList::T2);
            return;
        }

        if let Some(&(GhostList::B2, handle)) = state.ghost_index.get(&key) {
            let delta = (state.b1.len() / state.b2.len().max(1)).max(1);
            state.p = state.p.saturating_sub(delta);
            state.b2.remove(handle);
            state.ghost_index.remove(&key);
            self.replace(&mut state, true);
            self.t2.put(key.clone(), value);
            state.location.insert(key, RealList::T2);
            return;
        }

        self.admit_new(&mut state, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();

        if let Some(loc) = state.location.get(key).copied() {
            return match loc {
                RealList::T1 => {
                    let value = self.t1.remove(key)?;
                    self.t2.put(key.clone(), value.clone());
                    state.location.insert(key.clone(), RealList::T2);
                    Some(value)
                }
                RealList::T2 => self.t2.get(key),
            };
        }

        if let Some(&(GhostList::B1, handle)) = state.ghost_index.get(key) {
            let delta = (state.b2.len() / state.b1.len().max(1)).max(1);
            state.p = (state.p + delta).min(self.capacity);
            state.b1.remove(handle);
            state.ghost_index.remove(key);
            self.replace(&mut state, false);
            return None;
        }

        if let Some(&(GhostList::B2, handle)) = state.ghost_index.get(key) {
            let delta = (state.b1.len() / state.b2.len().max(1)).max(1);
            state.p = state.p.saturating_sub(delta);
            state.b2.remove(handle);
            state.ghost_index.remove(key);
            self.replace(&mut state, true);
            return None;
        }

        None
    }

    fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        match state.location.remove(key) {
            Some(RealList::T1) => self.t1.remove(key),
            Some(RealList::T2) => self.t2.remove(key),
            None => {
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
        }
    }

    fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    fn purge(&self) {
        self.t1.purge();
        self.t2.purge();
        let mut state = self.state.lock();
        state.b1.clear();
        state.b2.clear();
        state.location.clear();
        state.ghost_index.clear();
        state.p = 0;
    }
}

impl<K, V, S> std::fmt::Debug for ArcHybridCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcHybridCache")
            .field("capacity", &self.capacity)
            .finish()
    }
}
