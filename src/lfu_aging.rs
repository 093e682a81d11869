//! LFU-aging: a decorator over [`LfuCache`] that periodically decays every
//! frequency counter.
//!
//! Plain LFU has long memory: an item that was popular for an hour keeps
//! outranking newly popular items indefinitely, since frequency counters
//! only ever increase. This decorator tracks the running average access
//! count across the cache and, once that average crosses a configured
//! ceiling, subtracts `max_average / 2` from every counter in the base
//! engine (via [`LfuCache::decay_all_freqs`]) and halves its own running
//! totals to match — so old popularity decays instead of accumulating
//! forever.
//!
//! The decorator's own mutex guards only the running-average bookkeeping;
//! the wrapped [`LfuCache`] remains independently self-synchronizing.

use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::config::LfuAgingCacheConfig;
use crate::lfu::LfuCache;
use crate::policy::CachePolicy;

struct AgingState {
    total_accesses: usize,
}

/// An LFU cache whose frequency counters decay as the average access count
/// grows, preventing long-idle formerly popular entries from permanently
/// dominating.
pub struct LfuAgingCache<K, V, S = std::collections::hash_map::RandomState> {
    base: LfuCache<K, V, S>,
    max_average: usize,
    state: Mutex<AgingState>,
}

impl<K, V> LfuAgingCache<K, V, std::collections::hash_map::RandomState>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache from an [`LfuAgingCacheConfig`].
    pub fn from_config(config: LfuAgingCacheConfig) -> Self {
        LfuAgingCache {
            base: LfuCache::from_config(crate::config::LfuCacheConfig::new(config.capacity())),
            max_average: config.max_average(),
            state: Mutex::new(AgingState { total_accesses: 0 }),
        }
    }
}

impl<K, V, S> LfuAgingCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Records one access, decaying the whole cache once the running
    /// average crosses `max_average`.
    fn record_access(&self) {
        let mut state = self.state.lock();
        state.total_accesses += 1;
        let len = self.base.len().max(1);
        if state.total_accesses / len > self.max_average {
            self.base.decay_all_freqs(self.max_average / 2);
            state.total_accesses /= 2;
        }
    }
}

impl<K, V, S> CachePolicy<K, V> for LfuAgingCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn put(&self, key: K, value: V) {
        self.base.put(key, value);
        self.record_access();
    }

    fn get(&self, key: &K) -> Option<V> {
        let value = self.base.get(key);
        if value.is_some() {
            self.record_access();
        }
        value
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.base.remove(key)
    }

    fn len(&self) -> usize {
        self.base.len()
    }

    fn purge(&self) {
        self.base.purge();
        let mut state = self.state.lock();
        state.total_accesses = 0;
    }
}

impl<K, V, S> std::fmt::Debug for LfuAgingCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfuAgingCache")
            .field("max_average", &self.max_average)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LfuAgingCacheConfig;
    use std::num::NonZeroUsize;

    fn cache(cap: usize, max_average: usize) -> LfuAgingCache<&'static str, i32> {
        LfuAgingCache::from_config(LfuAgingCacheConfig::new(
            NonZeroUsize::new(cap).unwrap(),
            max_average,
        ))
    }

    #[test]
    fn behaves_like_lfu_below_the_aging_threshold() {
        let c = cache(2, 1000);
        c.put("rare", 1);
        c.put("popular", 2);
        for _ in 0..5 {
            c.get(&"popular");
        }
        c.put("new", 3);
        assert!(c.get(&"rare").is_none());
        assert_eq!(c.get(&"popular"), Some(2));
    }

    #[test]
    fn crossing_the_average_ceiling_decays_frequencies_without_losing_values() {
        let c = cache(2, 2);
        c.put("a", 1);
        for _ in 0..10 {
            c.get(&"a");
        }
        assert_eq!(c.get(&"a"), Some(1));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn hot_key_survives_a_subsequent_insert_once_decay_fires() {
        // Capacity 10, maxAverage 5, ten keys inserted, one hit 60 times.
        // Once the running average crosses 5 the base engine decays by
        // subtracting maxAverage/2 from every counter; the over-hot key and
        // its neighbors must both survive a following insert rather than
        // the decay collapsing every counter down to the eviction floor.
        let c = cache(10, 5);
        for i in 0..10 {
            c.put(i, i * 10);
        }
        for _ in 0..60 {
            c.get(&0);
        }
        c.put(10, 100);
        assert_eq!(c.get(&0), Some(0));
        assert_eq!(c.get(&10), Some(100));
    }

    #[test]
    fn aging_lets_a_newly_hot_key_eventually_outrank_an_old_one() {
        let c = cache(2, 2);
        c.put("old", 1);
        for _ in 0..20 {
            c.get(&"old");
        }
        c.put("fresh", 2);
        for _ in 0..20 {
            c.get(&"fresh");
        }
        // after repeated decay passes both keys' counters stay bounded;
        // the cache still holds both since capacity is 2.
        assert_eq!(c.get(&"old"), Some(1));
        assert_eq!(c.get(&"fresh"), Some(2));
    }
}
