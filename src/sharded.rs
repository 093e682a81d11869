//! A hash-sharded fan-out wrapper over any [`CachePolicy`] engine.
//!
//! Every engine in this crate already serializes its own mutable state
//! behind one internal mutex, so a single large cache becomes a lock
//! bottleneck under concurrent load purely from contention on that one
//! mutex, not from any correctness problem. [`Sharded`] partitions the key
//! space across `N` independent engine instances the same way the
//! teacher's `ConcurrentLruCache` partitions the key space across `N`
//! mutex-guarded segments — `hash(key) % N` picks the shard — except here
//! each shard is a whole engine (so `Sharded` works for LRU, LFU, LRU-K,
//! LFU-aging, ARC, or ARC-hybrid alike) rather than one bespoke wrapper
//! struct per algorithm.
//!
//! The requested total capacity is split across shards by
//! [`ShardedCacheConfig::shard_capacity`] so that the sum across shards is
//! exactly the configured total rather than `shard_count * per_shard_capacity`
//! over- or under-counting by rounding: the factory is called once per
//! shard with that shard's own capacity and index, the same way the
//! teacher's lock-striped concurrent caches size each segment.

use std::hash::{BuildHasher, Hash, Hasher};
use std::marker::PhantomData;
use std::num::NonZeroUsize;

use crate::config::ShardedCacheConfig;
use crate::policy::CachePolicy;

/// A cache built from `N` independent engines of type `C`, routing each key
/// to exactly one shard by hash.
pub struct Sharded<K, V, C, S = std::collections::hash_map::RandomState> {
    shards: Box<[C]>,
    hash_builder: S,
    _marker: PhantomData<(K, V)>,
}

impl<K, V, C> Sharded<K, V, C, std::collections::hash_map::RandomState>
where
    K: Hash,
    C: CachePolicy<K, V>,
{
    /// Builds a sharded cache from `config`, constructing each shard with
    /// `factory`. `factory` is called once per shard, given that shard's
    /// split-off capacity (see [`ShardedCacheConfig::shard_capacity`]) and
    /// its index, so that shard capacities sum exactly to
    /// `config.total_capacity()` and each shard gets independent state
    /// rather than sharing one engine instance.
    pub fn from_config<F>(config: ShardedCacheConfig, factory: F) -> Self
    where
        F: FnMut(usize, usize) -> C,
    {
        Self::with_hasher(
            config,
            std::collections::hash_map::RandomState::default(),
            factory,
        )
    }
}

impl<K, V, C, S> Sharded<K, V, C, S>
where
    K: Hash,
    C: CachePolicy<K, V>,
    S: BuildHasher,
{
    /// Builds a sharded cache using an explicit key-routing hasher.
    pub fn with_hasher<F>(config: ShardedCacheConfig, hash_builder: S, mut factory: F) -> Self
    where
        F: FnMut(usize, usize) -> C,
    {
        let shards = (0..config.shard_count().get())
            .map(|index| factory(config.shard_capacity(index), index))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Sharded {
            shards,
            hash_builder,
            _marker: PhantomData,
        }
    }

    /// The number of independent shards this cache routes across.
    pub fn shard_count(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.shards.len()).expect("constructed with a NonZeroUsize shard count")
    }

    fn shard_for(&self, key: &K) -> &C {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }
}

impl<K, V, C, S> CachePolicy<K, V> for Sharded<K, V, C, S>
where
    K: Hash,
    C: CachePolicy<K, V>,
    S: BuildHasher,
{
    fn put(&self, key: K, value: V) {
        self.shard_for(&key).put(key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        self.shard_for(key).get(key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.shard_for(key).remove(key)
    }

    fn len(&self) -> usize {
        self.shards.iter().map(CachePolicy::len).sum()
    }

    fn purge(&self) {
        for shard in self.shards.iter() {
            shard.purge();
        }
    }
}

impl<K, V, C, S> std::fmt::Debug for Sharded<K, V, C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sharded")
            .field("shard_count", &self.shards.len())
            .finish()
    }
}
