//! Query result caching
//!
//! Memoizes query execution for a bounded time-to-live, keyed by the
//! rendered query text (the literal arguments of the request) plus the ttl
//! itself. The cache carries its own lock so concurrent callers are safe;
//! the lock is never held across an await point.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use magicchat_core::QueryTable;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    ttl_secs: u64,
}

struct CacheEntry {
    stored_at: Instant,
    table: QueryTable,
    generated: Option<String>,
}

/// TTL memoization for query results.
///
/// Owned by one connector instance; neither the remote service nor callers
/// see it. Entries expire passively: an expired entry is dropped on the
/// next lookup for its key.
pub struct QueryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl QueryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the stored result for this query if it is still fresh
    pub fn lookup(&self, query: &str, ttl: Duration) -> Option<(QueryTable, Option<String>)> {
        let key = CacheKey {
            query: query.to_string(),
            ttl_secs: ttl.as_secs(),
        };

        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < ttl => {
                Some((entry.table.clone(), entry.generated.clone()))
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store a freshly computed result
    pub fn store(&self, query: &str, ttl: Duration, table: QueryTable, generated: Option<String>) {
        let key = CacheKey {
            query: query.to_string(),
            ttl_secs: ttl.as_secs(),
        };

        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                table,
                generated,
            },
        );
    }

    /// Number of live entries (expired entries linger until looked up)
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// Returns true if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_one_row() -> QueryTable {
        QueryTable::from_objects(&[serde_json::json!({"title": "Rugrats"})]).unwrap()
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = QueryCache::new();
        let ttl = Duration::from_secs(60);
        cache.store("query-a", ttl, table_with_one_row(), None);

        let (table, generated) = cache.lookup("query-a", ttl).unwrap();
        assert_eq!(table, table_with_one_row());
        assert!(generated.is_none());
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let cache = QueryCache::new();
        assert!(cache.lookup("query-a", Duration::from_secs(60)).is_none());
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = QueryCache::new();
        let ttl = Duration::from_secs(0);
        cache.store("query-a", ttl, table_with_one_row(), None);

        assert!(cache.lookup("query-a", ttl).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_ttl_is_part_of_the_key() {
        let cache = QueryCache::new();
        cache.store(
            "query-a",
            Duration::from_secs(60),
            table_with_one_row(),
            None,
        );

        // Same query text under a different ttl is a distinct entry
        assert!(cache.lookup("query-a", Duration::from_secs(120)).is_none());
        assert!(cache.lookup("query-a", Duration::from_secs(60)).is_some());
    }

    #[test]
    fn test_generated_text_is_cached_with_the_table() {
        let cache = QueryCache::new();
        let ttl = Duration::from_secs(60);
        cache.store(
            "query-a",
            ttl,
            table_with_one_row(),
            Some("Watch Rugrats tonight.".to_string()),
        );

        let (_, generated) = cache.lookup("query-a", ttl).unwrap();
        assert_eq!(generated.as_deref(), Some("Watch Rugrats tonight."));
    }

    #[test]
    fn test_clear() {
        let cache = QueryCache::new();
        cache.store(
            "query-a",
            Duration::from_secs(60),
            table_with_one_row(),
            None,
        );
        cache.clear();
        assert!(cache.is_empty());
    }
}
