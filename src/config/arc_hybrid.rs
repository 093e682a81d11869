//! Configuration for the ARC-hybrid engine.

use std::fmt;

/// Configuration for an [`ArcHybridCache`](crate::ArcHybridCache).
///
/// As with [`ArcCacheConfig`](crate::config::ArcCacheConfig), `capacity` is
/// a plain `usize` and zero is a valid, degenerate configuration.
///
/// # Examples
///
/// ```
/// use cache_policy::config::arc_hybrid::ArcHybridCacheConfig;
///
/// let config = ArcHybridCacheConfig::new(256);
/// assert_eq!(config.capacity(), 256);
/// ```
#[derive(Clone, Copy)]
pub struct ArcHybridCacheConfig {
    capacity: usize,
}

impl ArcHybridCacheConfig {
    /// Creates a new configuration for an ARC-hybrid cache.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// The cache's target capacity for real (non-ghost) entries, split
    /// across the delegate LRU (T1) and LFU (T2) segments.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for ArcHybridCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcHybridCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_hybrid_config_creation() {
        let config = ArcHybridCacheConfig::new(128);
        assert_eq!(config.capacity(), 128);
    }
}
