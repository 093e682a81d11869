//! The uniform `CachePolicy` contract every engine in this crate implements.
//!
//! LRU, LFU, the LRU-K and LFU-aging decorators, both ARC variants, and the
//! sharded wrapper all expose the same public surface. Decorators and the
//! sharded wrapper are written generically against this trait rather than
//! against one concrete engine, so e.g. `Sharded<K, V, C>` works for any
//! `C: CachePolicy<K, V>` and `ArcHybridCache` can be read as "an ARC engine
//! whose T1/T2 segments happen to be an `LruCache` and an `LfuCache`".
//!
//! `evict_one` and `decay_all_freqs` are deliberately not part of the public
//! surface a library consumer sees documented prominently — they exist for
//! composed engines (ARC-hybrid calling into its LRU/LFU segments, the
//! LFU-aging decorator driving its base LFU engine) to reach past the normal
//! put/get contract. A plain `LruCache` used standalone never needs them.

/// Shared behavior of every cache eviction engine in this crate.
pub trait CachePolicy<K, V> {
    /// Inserts or updates `key` with `value`, evicting per the engine's
    /// policy if the cache is at capacity and `key` is new.
    fn put(&self, key: K, value: V);

    /// Returns the value for `key` if present, recording the access per the
    /// engine's policy (e.g. promoting recency or frequency).
    fn get(&self, key: &K) -> Option<V>;

    /// Removes `key`, returning its value if it was present.
    fn remove(&self, key: &K) -> Option<V>;

    /// The number of key/value pairs currently held.
    fn len(&self) -> usize;

    /// Whether the cache currently holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry, resetting the engine to its just-constructed
    /// state (capacity and configuration are unaffected).
    fn purge(&self);
}

/// Internal extension used by composed engines to evict or age entries
/// out of band from a normal `put`/`get` access.
pub(crate) trait InternalCachePolicy<K, V>: CachePolicy<K, V> {
    /// Evicts a single entry per the engine's own policy, returning its key
    /// and value if the engine was non-empty.
    fn evict_one(&self) -> Option<(K, V)>;
}
