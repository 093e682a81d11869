//! Least Frequently Used (LFU) cache.
//!
//! Evicts the entry with the smallest access count, breaking ties by
//! recency within that count. Entries are grouped into one
//! [`crate::list::IndexList`] per distinct frequency, keyed in a `BTreeMap`;
//! `min_frequency` tracks the smallest non-empty bucket so eviction never
//! has to scan. Accessing an entry moves it from its current bucket to
//! `frequency + 1`, creating that bucket if needed and retiring the old one
//! if it becomes empty.
//!
//! ```text
//! freq 1: [ d ]
//! freq 2: [ c ] <-> [ b ]
//! freq 5: [ a ]
//! min_frequency = 1   (evict from bucket 1's tail first)
//! ```
//!
//! All mutable state lives behind a single `parking_lot::Mutex`.

use std::collections::BTreeMap;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::config::LfuCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Handle, IndexList};
use crate::policy::{CachePolicy, InternalCachePolicy};
use crate::HashMap;

struct LfuState<K, V, S> {
    map: HashMap<K, (usize, Handle), S>,
    buckets: BTreeMap<usize, IndexList<CacheEntry<K, V>>>,
    min_frequency: usize,
}

impl<K, V, S> LfuState<K, V, S>
where
    K: Eq + Hash + Clone,
{
    /// Removes the entry at `(freq, handle)` from its bucket, retiring the
    /// bucket if it is now empty and fixing up `min_frequency` when that
    /// bucket was the minimum.
    fn detach(&mut self, freq: usize, handle: Handle) -> CacheEntry<K, V> {
        let bucket = self.buckets.get_mut(&freq).expect("bucket must exist");
        let entry = bucket.remove(handle);
        if bucket.is_empty() {
            self.buckets.remove(&freq);
            if self.min_frequency == freq {
                self.min_frequency = self.buckets.keys().next().copied().unwrap_or(0);
            }
        }
        entry
    }

    fn attach(&mut self, freq: usize, entry: CacheEntry<K, V>) -> Handle {
        let handle = self.buckets.entry(freq).or_default().push_front(entry);
        if self.min_frequency == 0 || freq < self.min_frequency {
            self.min_frequency = freq;
        }
        handle
    }

    /// Bumps the access count for an existing key, returning its value.
    fn bump(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let &(freq, handle) = self.map.get(key)?;
        let entry = self.detach(freq, handle);
        let value = entry.value.clone();
        let new_handle = self.attach(freq + 1, entry);
        self.map.insert(key.clone(), (freq + 1, new_handle));
        Some(value)
    }
}

/// A thread-safe, fixed-capacity LFU cache.
pub struct LfuCache<K, V, S = std::collections::hash_map::RandomState> {
    capacity: NonZeroUsize,
    state: Mutex<LfuState<K, V, S>>,
}

impl<K, V> LfuCache<K, V, std::collections::hash_map::RandomState>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache that holds at most `config.capacity()` entries.
    pub fn from_config(config: LfuCacheConfig) -> Self {
        Self::with_hasher(config, std::collections::hash_map::RandomState::default())
    }
}

impl<K, V, S> LfuCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates a cache using an explicit hasher builder.
    pub fn with_hasher(config: LfuCacheConfig, hash_builder: S) -> Self {
        LfuCache {
            capacity: config.capacity(),
            state: Mutex::new(LfuState {
                map: HashMap::with_hasher(hash_builder),
                buckets: BTreeMap::new(),
                min_frequency: 0,
            }),
        }
    }

    /// The maximum number of entries this cache will hold.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Subtracts `delta` from every entry's frequency counter (clamped to
    /// at least 1), then recomputes `min_frequency`. Used by the LFU-aging
    /// decorator to keep long-lived popular entries from permanently
    /// dominating newly hot ones.
    pub(crate) fn decay_all_freqs(&self, delta: usize) {
        let delta = delta.max(1);
        let mut state = self.state.lock();
        if state.buckets.is_empty() {
            return;
        }
        let old_buckets = std::mem::take(&mut state.buckets);
        for (freq, mut bucket) in old_buckets {
            let new_freq = freq.saturating_sub(delta).max(1);
            while let Some((_, entry)) = bucket.pop_back() {
                let key = entry.key.clone();
                let handle = state.buckets.entry(new_freq).or_default().push_front(entry);
                state.map.insert(key, (new_freq, handle));
            }
        }
        state.min_frequency = state.buckets.keys().next().copied().unwrap_or(0);
    }
}

impl<K, V, S> CachePolicy<K, V> for LfuCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn put(&self, key: K, value: V) {
        let mut state = self.state.lock();

        if let Some(&(freq, handle)) = state.map.get(&key) {
            let mut entry = state.detach(freq, handle);
            entry.value = value;
            let new_handle = state.attach(freq + 1, entry);
            state.map.insert(key, (freq + 1, new_handle));
            return;
        }

        if state.map.len() >= self.capacity.get() {
            let evict_freq = state.min_frequency;
            if let Some((_, evicted)) = state
                .buckets
                .get_mut(&evict_freq)
                .and_then(|bucket| bucket.pop_back())
            {
                if state.buckets.get(&evict_freq).is_some_and(IndexList::is_empty) {
                    state.buckets.remove(&evict_freq);
                }
                state.map.remove(&evicted.key);
            }
        }

        let handle = state.attach(1, CacheEntry::new(key.clone(), value, ()));
        state.map.insert(key, (1, handle));
    }

    fn get(&self, key: &K) -> Option<V> {
        self.state.lock().bump(key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let (freq, handle) = state.map.remove(key)?;
        Some(state.detach(freq, handle).value)
    }

    fn len(&self) -> usize {
        self.state.lock().map.len()
    }

    fn purge(&self) {
        let mut state = self.state.lock();
        state.map.clear();
        state.buckets.clear();
        state.min_frequency = 0;
    }
}

impl<K, V, S> InternalCachePolicy<K, V> for LfuCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn evict_one(&self) -> Option<(K, V)> {
        let mut state = self.state.lock();
        let evict_freq = state.min_frequency;
        let (_, entry) = state.buckets.get_mut(&evict_freq)?.pop_back()?;
        if state.buckets.get(&evict_freq).is_some_and(IndexList::is_empty) {
            state.buckets.remove(&evict_freq);
            state.min_frequency = state.buckets.keys().next().copied().unwrap_or(0);
        }
        state.map.remove(&entry.key);
        Some((entry.key, entry.value))
    }
}

impl<K, V, S> std::fmt::Debug for LfuCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfuCache")
            .field("capacity", &self.capacity)
            .finish()
    }
}
