//! Configuration for the LRU-K admission decorator.

use std::fmt;
use std::num::NonZeroUsize;

/// Configuration for an [`LruKCache`](crate::LruKCache).
///
/// # Examples
///
/// ```
/// use cache_policy::config::lru_k::LruKCacheConfig;
/// use core::num::NonZeroUsize;
///
/// let config = LruKCacheConfig::new(
///     NonZeroUsize::new(100).unwrap(),
///     NonZeroUsize::new(500).unwrap(),
///     2,
/// );
/// assert_eq!(config.k(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct LruKCacheConfig {
    cache_capacity: NonZeroUsize,
    history_capacity: NonZeroUsize,
    k: usize,
}

impl LruKCacheConfig {
    /// Creates a new configuration.
    ///
    /// * `cache_capacity` - maximum number of admitted key/value pairs.
    /// * `history_capacity` - maximum number of keys tracked pre-admission.
    /// * `k` - number of observations required before admission.
    pub fn new(cache_capacity: NonZeroUsize, history_capacity: NonZeroUsize, k: usize) -> Self {
        Self {
            cache_capacity,
            history_capacity,
            k,
        }
    }

    /// Maximum number of admitted key/value pairs.
    pub fn cache_capacity(&self) -> NonZeroUsize {
        self.cache_capacity
    }

    /// Maximum number of keys tracked pre-admission.
    pub fn history_capacity(&self) -> NonZeroUsize {
        self.history_capacity
    }

    /// Number of observations required before a key is admitted.
    pub fn k(&self) -> usize {
        self.k
    }
}

impl fmt::Debug for LruKCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKCacheConfig")
            .field("cache_capacity", &self.cache_capacity)
            .field("history_capacity", &self.history_capacity)
            .field("k", &self.k)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_k_config_creation() {
        let config = LruKCacheConfig::new(
            NonZeroUsize::new(10).unwrap(),
            NonZeroUsize::new(20).unwrap(),
            3,
        );
        assert_eq!(config.cache_capacity().get(), 10);
        assert_eq!(config.history_capacity().get(), 20);
        assert_eq!(config.k(), 3);
    }
}
