use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    stored_at: Instant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

/// Time-bounded memoization keyed by string. Stale entries are dropped on read.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, key: &str, max_age: Duration) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.stored_at.elapsed() < max_age {
                return Some(entry.data.clone());
            }
        }

        // Only remove if it is still the stale entry we saw.
        self.entries
            .remove_if(key, |_, entry| entry.stored_at.elapsed() >= max_age);
        None
    }

    pub fn set(&self, key: impl Into<String>, data: V) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                data,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let mut keys = self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        keys.sort();

        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn fresh_entry_is_returned() {
        let cache = ResponseCache::new();
        cache.set("search_ai__today 12-m", 42_u32);

        assert_eq!(cache.get("search_ai__today 12-m", FIVE_MINUTES), Some(42));
        assert_eq!(cache.get("missing", FIVE_MINUTES), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_at_max_age() {
        let cache = ResponseCache::new();
        cache.set("trending_US", "snapshot".to_string());

        tokio::time::advance(FIVE_MINUTES - Duration::from_millis(1)).await;
        assert!(cache.get("trending_US", FIVE_MINUTES).is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get("trending_US", FIVE_MINUTES), None);
        assert!(cache.is_empty(), "stale entry should be evicted on read");
    }

    #[tokio::test(start_paused = true)]
    async fn set_overwrites_and_restamps() {
        let cache = ResponseCache::new();
        cache.set("k", 1_u8);
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.set("k", 2_u8);
        tokio::time::advance(Duration::from_secs(200)).await;

        assert_eq!(cache.get("k", FIVE_MINUTES), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn max_age_is_chosen_by_the_reader() {
        let cache = ResponseCache::new();
        cache.set("countries", 7_u8);
        tokio::time::advance(Duration::from_secs(600)).await;

        assert_eq!(cache.get("countries", Duration::from_secs(86_400)), Some(7));
        assert_eq!(cache.get("countries", FIVE_MINUTES), None);
    }

    #[test]
    fn stats_and_clear() {
        let cache = ResponseCache::new();
        cache.set("b", 1_u8);
        cache.set("a", 2_u8);

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.keys, vec!["a".to_string(), "b".to_string()]);

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
