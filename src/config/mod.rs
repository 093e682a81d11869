//! Cache configuration structures.
//!
//! Each engine has its own dedicated configuration struct that encapsulates
//! its construction-time parameters. Every cache is created from its config
//! as the single entry point — `Cache::from_config(config)` — rather than
//! through a constellation of constructor overloads.
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | [`LruCacheConfig`] | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | [`LfuCacheConfig`] | [`LfuCache`](crate::LfuCache) | Least Frequently Used |
//! | [`LruKCacheConfig`] | [`LruKCache`](crate::LruKCache) | LRU-K admission decorator |
//! | [`LfuAgingCacheConfig`] | [`LfuAgingCache`](crate::LfuAgingCache) | LFU-aging decorator |
//! | [`ArcCacheConfig`] | [`ArcCache`](crate::ArcCache) | Adaptive Replacement Cache |
//! | [`ArcHybridCacheConfig`] | [`ArcHybridCache`](crate::ArcHybridCache) | ARC with LRU/LFU delegate segments |
//! | [`ShardedCacheConfig`] | [`Sharded`](crate::Sharded) | Hash-sharded fan-out wrapper |
//!
//! # Examples
//!
//! ```
//! use cache_policy::config::LruCacheConfig;
//! use cache_policy::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig::new(NonZeroUsize::new(1000).unwrap());
//! let cache: LruCache<String, i32> = LruCache::from_config(config);
//! ```

pub mod arc;
pub mod arc_hybrid;
pub mod lfu;
pub mod lfu_aging;
pub mod lru;
pub mod lru_k;
pub mod sharded;

pub use arc::ArcCacheConfig;
pub use arc_hybrid::ArcHybridCacheConfig;
pub use lfu::LfuCacheConfig;
pub use lfu_aging::LfuAgingCacheConfig;
pub use lru::LruCacheConfig;
pub use lru_k::LruKCacheConfig;
pub use sharded::ShardedCacheConfig;
