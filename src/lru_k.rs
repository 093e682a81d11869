//! LRU-K: an admission decorator over [`LruCache`].
//!
//! Plain LRU promotes any key to most-recently-used on its very first
//! access, which makes a single scan-through of cold keys evict everything
//! genuinely hot. LRU-K delays admission: a key is only inserted into the
//! underlying LRU cache once it has been observed `k` times. Until then its
//! access history (a count, and — once a value has actually been offered via
//! `put` — that value) lives in a small, separately bounded history list of
//! its own, so a one-off scan only ever evicts other scan entries out of
//! history rather than hot entries out of the real cache.
//!
//! A `get` still counts toward the `k` observations needed for admission:
//! if a prior `put` has already staged a value for a key and a later `get`
//! pushes its observation count to `k`, that staged value is promoted into
//! the main cache and returned as a hit. A `get` on a key that has never
//! been `put` carries no value to promote and is always a miss no matter
//! how many times it is observed.
//!
//! This decorator holds its own mutex around the history bookkeeping; the
//! wrapped [`LruCache`] is independently self-synchronizing and is only ever
//! called while already holding the decorator's own lock, never the other
//! way around.

use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::config::LruKCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Handle, IndexList};
use crate::lru::LruCache;
use crate::policy::CachePolicy;
use crate::HashMap;

struct HistoryMeta<V> {
    count: usize,
    staged: Option<V>,
}

struct HistoryState<K, V, S> {
    map: HashMap<K, Handle, S>,
    list: IndexList<CacheEntry<K, HistoryMeta<V>>>,
}

impl<K, V, S> HistoryState<K, V, S>
where
    K: Eq + Hash + Clone,
{
    /// Records one observation of `key`, returning its count *after* this
    /// observation (the increment happens before the threshold comparison
    /// a caller makes against it).
    fn observe(&mut self, key: &K, capacity: NonZeroUsize) -> Handle
    where
        S: BuildHasher,
    {
        if let Some(&handle) = self.map.get(key) {
            self.list.get_mut(handle).value.count += 1;
            self.list.move_to_front(handle);
            return handle;
        }

        let handle = self.list.push_front(CacheEntry::new(
            key.clone(),
            HistoryMeta {
                count: 1,
                staged: None,
            },
            (),
        ));
        self.map.insert(key.clone(), handle);

        if self.map.len() > capacity.get() {
            if let Some((_, evicted)) = self.list.pop_back() {
                self.map.remove(&evicted.key);
            }
        }
        handle
    }

    fn remove(&mut self, key: &K) {
        if let Some(handle) = self.map.remove(key) {
            self.list.remove(handle);
        }
    }
}

/// An LRU cache that only admits a key after it has been observed `k`
/// times.
pub struct LruKCache<K, V, S = std::collections::hash_map::RandomState> {
    k: usize,
    history_capacity: NonZeroUsize,
    base: LruCache<K, V, S>,
    history: Mutex<HistoryState<K, V, S>>,
}

impl<K, V> LruKCache<K, V, std::collections::hash_map::RandomState>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache from an [`LruKCacheConfig`]. Panics if `config.k()`
    /// is zero: every key would be admitted on first sight, which is just
    /// plain LRU with extra bookkeeping, so a `k` of zero is a construction
    /// error rather than a silently degraded mode.
    pub fn from_config(config: LruKCacheConfig) -> Self {
        assert!(config.k() >= 1, "cache-policy: LRU-K requires k >= 1");
        LruKCache {
            k: config.k(),
            history_capacity: config.history_capacity(),
            base: LruCache::from_config(crate::config::LruCacheConfig::new(config.cache_capacity())),
            history: Mutex::new(HistoryState {
                map: HashMap::with_hasher(std::collections::hash_map::RandomState::default()),
                list: IndexList::new(),
            }),
        }
    }
}

impl<K, V, S> CachePolicy<K, V> for LruKCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Default,
{
    fn put(&self, key: K, value: V) {
        if self.base.get(&key).is_some() {
            self.base.put(key, value);
            return;
        }

        let mut history = self.history.lock();
        let handle = history.observe(&key, self.history_capacity);
        let count = history.list.get(handle).value.count;
        if count >= self.k {
            history.remove(&key);
            drop(history);
            self.base.put(key, value);
        } else {
            history.list.get_mut(handle).value.staged = Some(value);
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        if let Some(value) = self.base.get(key) {
            let mut history = self.history.lock();
            history.observe(key, self.history_capacity);
            return Some(value);
        }
        let mut history = self.history.lock();
        let handle = history.observe(key, self.history_capacity);
        let meta = &mut history.list.get_mut(handle).value;
        if meta.count >= self.k {
            if let Some(value) = meta.staged.take() {
                history.remove(key);
                drop(history);
                self.base.put(key.clone(), value.clone());
                return Some(value);
            }
        }
        None
    }

    fn remove(&self, key: &K) -> Option<V> {
        if let Some(value) = self.base.remove(key) {
            return Some(value);
        }
        let mut history = self.history.lock();
        if let Some(&handle) = history.map.get(key) {
            let staged = history.list.get(handle).value.staged.clone();
            history.remove(key);
            return staged;
        }
        None
    }

    fn len(&self) -> usize {
        self.base.len()
    }

    fn purge(&self) {
        self.base.purge();
        let mut history = self.history.lock();
        history.map.clear();
        history.list.clear();
    }
}

impl<K, V, S> std::fmt::Debug for LruKCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruKCache").field("k", &self.k).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LruKCacheConfig;

    fn cache(cache_cap: usize, history_cap: usize, k: usize) -> LruKCache<&'static str, i32> {
        LruKCache::from_config(LruKCacheConfig::new(
            NonZeroUsize::new(cache_cap).unwrap(),
            NonZeroUsize::new(history_cap).unwrap(),
            k,
        ))
    }

    #[test]
    fn a_single_put_does_not_admit_below_k() {
        let c = cache(4, 4, 3);
        c.put("a", 1);
        assert!(c.get(&"a").is_none());
    }

    #[test]
    fn the_kth_put_admits_with_the_latest_value() {
        let c = cache(4, 4, 2);
        c.put("a", 1);
        c.put("a", 2);
        assert_eq!(c.get(&"a"), Some(2));
    }

    #[test]
    fn a_read_that_reaches_k_promotes_the_staged_value() {
        // Matches the admission scenario: a single put stages the value,
        // and the get that pushes the observation count to k admits it,
        // returning that staged value as a hit.
        let c = cache(4, 4, 2);
        c.put("a", 1);
        assert_eq!(c.get(&"a"), Some(1));
        assert_eq!(c.get(&"a"), Some(1));
    }

    #[test]
    fn reads_with_no_prior_put_never_admit_because_they_carry_no_value() {
        let c = cache(4, 4, 2);
        c.get(&"a");
        c.get(&"a");
        c.get(&"a");
        assert!(c.get(&"a").is_none());
    }

    #[test]
    fn reads_below_k_with_a_staged_value_stay_a_miss_until_the_kth() {
        let c = cache(4, 4, 3);
        c.put("a", 1); // count == 1
        assert!(c.get(&"a").is_none()); // count == 2, still below k
        assert_eq!(c.get(&"a"), Some(1)); // count == 3, admitted
    }

    #[test]
    fn scan_resistance_one_off_keys_stay_out_of_the_real_cache() {
        let c = cache(2, 8, 2);
        c.put("hot", 1);
        c.put("hot", 1);
        assert_eq!(c.get(&"hot"), Some(1));

        for i in 0..10 {
            c.put(i, i);
        }
        assert_eq!(c.get(&"hot"), Some(1));
    }

    #[test]
    fn a_main_cache_hit_still_bumps_the_history_counter() {
        let c = cache(4, 4, 2);
        c.put("a", 1);
        c.put("a", 2); // admitted into the main cache, history entry cleared
        assert_eq!(c.get(&"a"), Some(2)); // main-cache hit
        let history = c.history.lock();
        let handle = *history.map.get(&"a").expect("hit must re-bump history");
        assert_eq!(history.list.get(handle).value.count, 1);
    }

    #[test]
    fn history_capacity_bounds_memory_for_never_promoted_keys() {
        let c = cache(4, 2, 5);
        c.put("a", 1);
        c.put("b", 2);
        c.put("c", 3);
        // "a" should have been evicted out of history by "c" arriving.
        c.put("a", 10);
        c.put("a", 11);
        c.put("a", 12);
        c.put("a", 13);
        assert_eq!(c.get(&"a"), Some(13));
    }
}
