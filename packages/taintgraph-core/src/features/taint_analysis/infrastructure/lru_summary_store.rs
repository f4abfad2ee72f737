//! LRU-backed [`SummaryStore`], grounded on the teacher's `FunctionSummaryCache`
//! (hit/miss counters, bounded size, `stats()` string).

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::features::taint_analysis::domain::PassThroughCache;
use crate::features::taint_analysis::ports::SummaryStore;

pub struct LruSummaryStore {
    cache: LruCache<String, PassThroughCache>,
    hits: usize,
    misses: usize,
}

impl LruSummaryStore {
    pub fn new(max_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::new(1).unwrap());
        LruSummaryStore {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn with_default_size() -> Self {
        Self::new(10_000)
    }

    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "summary cache: {} entries, {} hits, {} misses, {:.2}% hit rate",
            self.cache.len(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

impl Default for LruSummaryStore {
    fn default() -> Self {
        Self::with_default_size()
    }
}

impl SummaryStore for LruSummaryStore {
    fn get(&mut self, canonical: &str) -> Option<PassThroughCache> {
        match self.cache.get(canonical) {
            Some(summary) => {
                self.hits += 1;
                Some(summary.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn put(&mut self, canonical: &str, summary: PassThroughCache) {
        self.cache.put(canonical.to_string(), summary);
    }

    fn contains(&self, canonical: &str) -> bool {
        self.cache.contains(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let mut store = LruSummaryStore::new(4);
        store.put("pkg.F", PassThroughCache::null(false, 1, 1));
        assert!(store.contains("pkg.F"));
        assert!(store.get("pkg.F").is_some());
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut store = LruSummaryStore::new(1);
        store.put("pkg.F", PassThroughCache::null(false, 0, 0));
        store.put("pkg.G", PassThroughCache::null(false, 0, 0));
        assert!(!store.contains("pkg.F"));
        assert!(store.contains("pkg.G"));
    }
}
