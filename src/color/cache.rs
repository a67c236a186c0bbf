//! Bounded memo table for color resolutions.

use moka::sync::Cache;

pub use moka::policy::EvictionPolicy;

use super::resolver::ResolvedColor;

/// Normalized phrase → resolution. Unrecognized phrases are cached as `None`.
#[derive(Clone)]
pub struct ResolutionCache {
    capacity: u64,
    entries: Option<Cache<String, Option<ResolvedColor>>>,
}

impl ResolutionCache {
    /// TinyLFU cache holding at most `capacity` phrases. Zero disables caching.
    pub fn new(capacity: u64) -> Self {
        Self::with_policy(capacity, EvictionPolicy::default())
    }

    pub fn with_policy(capacity: u64, policy: EvictionPolicy) -> Self {
        let entries = (capacity > 0).then(|| Cache::builder().max_capacity(capacity).eviction_policy(policy).build());
        Self { capacity, entries }
    }

    /// `None` on a miss; `Some(None)` for a phrase known to be unrecognized.
    pub fn get(&self, phrase: &str) -> Option<Option<ResolvedColor>> {
        self.entries.as_ref()?.get(phrase)
    }

    pub fn insert(&self, phrase: String, resolved: Option<ResolvedColor>) {
        if let Some(entries) = &self.entries {
            entries.insert(phrase, resolved);
        }
    }

    /// Phrases held once pending evictions are applied.
    pub fn entry_count(&self) -> u64 {
        self.entries.as_ref().map_or(0, |entries| {
            entries.run_pending_tasks();
            entries.entry_count()
        })
    }

    pub fn capacity(&self) -> u64 { self.capacity }
}

impl std::fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("capacity", &self.capacity)
            .field("enabled", &self.entries.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::dictionary::base_by_key;

    fn red() -> Option<ResolvedColor> {
        base_by_key("red").map(|base| ResolvedColor { modifiers: vec![], base })
    }

    #[test]
    fn test_stays_within_capacity() {
        let cache = ResolutionCache::new(2);
        for phrase in ["red", "blue", "green", "navy", "zxqv"] {
            cache.insert(phrase.to_string(), None);
        }
        assert!(cache.entry_count() <= 2);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_lru_drops_least_recently_used() {
        let cache = ResolutionCache::with_policy(2, EvictionPolicy::lru());
        cache.insert("red".to_string(), red());
        cache.entry_count();
        cache.insert("blue".to_string(), None);
        cache.entry_count();
        assert_eq!(cache.get("red"), Some(red()));
        cache.insert("green".to_string(), None);
        assert_eq!(cache.entry_count(), 2);
        assert_eq!(cache.get("blue"), None);
        assert_eq!(cache.get("red"), Some(red()));
    }

    #[test]
    fn test_unrecognized_phrases_are_remembered() {
        let cache = ResolutionCache::new(8);
        cache.insert("zxqv".to_string(), None);
        assert_eq!(cache.get("zxqv"), Some(None));
        assert_eq!(cache.get("red"), None);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = ResolutionCache::new(0);
        cache.insert("red".to_string(), red());
        assert_eq!(cache.get("red"), None);
        assert_eq!(cache.entry_count(), 0);
    }
}
