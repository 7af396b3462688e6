//! Route resolution caching
//!
//! Navigations often revisit the same paths, so resolved matches are kept in
//! an LRU cache keyed by the request path. The cache must be cleared whenever
//! the route table changes; the router does this on every `add_route` and
//! table rebuild.

use crate::matcher::RouteResolution;
use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache performance statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

impl CacheStats {
    /// Fraction of lookups served from cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Resolution cache with LRU eviction.
pub struct ResolutionCache {
    entries: LruCache<String, RouteResolution>,
    stats: CacheStats,
}

impl ResolutionCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a specific capacity.
    ///
    /// A zero capacity is clamped to one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up a cached resolution for a request path.
    pub fn get(&mut self, path: &str) -> Option<RouteResolution> {
        if let Some(resolution) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("resolution cache hit for '{}'", path);
            Some(resolution.clone())
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Store a resolution for a request path.
    pub fn set(&mut self, path: String, resolution: RouteResolution) {
        self.entries.push(path, resolution);
    }

    /// Drop every entry. Called whenever the route table changes.
    pub fn clear(&mut self) {
        trace_log!("clearing resolution cache");
        self.entries.clear();
        self.stats.invalidations += 1;
    }

    /// Current statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("len", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{component, ViewNode};
    use crate::params::RouteParams;

    fn resolution(path: &str) -> RouteResolution {
        RouteResolution {
            route_path: path.to_string(),
            component: component(|_| Ok(ViewNode::Empty)),
            params: RouteParams::new(),
            layouts: Vec::new(),
        }
    }

    #[test]
    fn miss_then_hit() {
        let mut cache = ResolutionCache::new();
        assert!(cache.get("/about").is_none());

        cache.set("/about".to_string(), resolution("/about"));
        let hit = cache.get("/about").unwrap();
        assert_eq!(hit.route_path, "/about");
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn clear_counts_invalidation() {
        let mut cache = ResolutionCache::new();
        cache.set("/a".to_string(), resolution("/a"));
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
        assert!(cache.get("/a").is_none());
    }

    #[test]
    fn lru_evicts_oldest() {
        let mut cache = ResolutionCache::with_capacity(2);
        cache.set("/a".to_string(), resolution("/a"));
        cache.set("/b".to_string(), resolution("/b"));
        cache.set("/c".to_string(), resolution("/c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/a").is_none());
        assert!(cache.get("/c").is_some());
    }

    #[test]
    fn hit_rate() {
        let mut cache = ResolutionCache::new();
        cache.get("/a");
        cache.set("/a".to_string(), resolution("/a"));
        cache.get("/a");

        assert!((cache.stats().hit_rate() - 0.5).abs() < 1e-9);
    }
}
