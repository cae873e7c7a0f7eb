use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::dictionary::DictionaryEntry;

pub const DEFAULT_MAX_SIZE: usize = 100;
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(30 * 60);

/// In-memory cache of search results keyed by the raw search term.
///
/// Entries are valid for `expiration` after insertion and are purged lazily
/// when read past that window. When the cache is full and a new key arrives,
/// the entry with the oldest timestamp is evicted first.
pub struct SearchCache {
    entries: HashMap<String, CacheItem>,
    max_size: usize,
    expiration: Duration,
}

struct CacheItem {
    data: Vec<DictionaryEntry>,
    timestamp: Instant,
}

impl SearchCache {
    pub fn new(max_size: usize, expiration: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_size,
            expiration,
        }
    }

    /// Returns the cached entries for `term`, deleting them on the way out
    /// if they have expired.
    pub fn get(&mut self, term: &str) -> Option<Vec<DictionaryEntry>> {
        let expired = match self.entries.get(term) {
            Some(item) => item.timestamp.elapsed() > self.expiration,
            None => return None,
        };
        if expired {
            self.entries.remove(term);
            return None;
        }
        self.entries.get(term).map(|item| item.data.clone())
    }

    /// Inserts or refreshes an entry. Overwriting an existing key never
    /// triggers eviction.
    pub fn set(&mut self, term: &str, data: Vec<DictionaryEntry>) {
        if !self.entries.contains_key(term) && self.entries.len() >= self.max_size {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, item)| item.timestamp)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                self.entries.remove(&key);
            }
        }
        self.entries.insert(
            term.to_string(),
            CacheItem {
                data,
                timestamp: Instant::now(),
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, DEFAULT_EXPIRATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    fn entry(word: &str) -> DictionaryEntry {
        serde_json::from_value(json!({
            "headword_info": { "headword": word },
            "part_of_speech": "noun",
            "definition_sections": []
        }))
        .unwrap()
    }

    #[test]
    fn test_get_returns_cached_entries() {
        let mut cache = SearchCache::default();
        cache.set("cat", vec![entry("cat")]);

        let hit = cache.get("cat").expect("cached entry");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].headword_info.headword, "cat");
        assert!(cache.get("dog").is_none());
    }

    #[test]
    fn test_expired_entry_reads_as_absent_and_is_removed() {
        let mut cache = SearchCache::new(100, Duration::from_millis(1));
        cache.set("cat", vec![entry("cat")]);
        thread::sleep(Duration::from_millis(10));

        assert!(cache.get("cat").is_none());
        // The read purged it: capacity accounting reflects the removal.
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_eviction_removes_oldest_entry() {
        let mut cache = SearchCache::new(3, DEFAULT_EXPIRATION);
        for word in ["ant", "bee", "cow"] {
            cache.set(word, vec![entry(word)]);
            thread::sleep(Duration::from_millis(2));
        }

        cache.set("dog", vec![entry("dog")]);

        assert_eq!(cache.len(), 3);
        assert!(cache.get("ant").is_none());
        assert!(cache.get("bee").is_some());
        assert!(cache.get("dog").is_some());
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let mut cache = SearchCache::new(2, DEFAULT_EXPIRATION);
        cache.set("ant", vec![entry("ant")]);
        cache.set("bee", vec![entry("bee")]);

        cache.set("ant", vec![entry("ant")]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("bee").is_some());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut cache = SearchCache::default();
        cache.set("ant", vec![entry("ant")]);
        cache.set("bee", vec![entry("bee")]);

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get("ant").is_none());
    }
}
