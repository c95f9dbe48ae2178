//! Store Capability Module
//!
//! The narrow key-value interface the result cache and request metrics are
//! written against, and its in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;

// == KvStore Trait ==
/// String-keyed, byte-valued storage with expiry, lists and counters.
///
/// Implementations must be safe to share between requests. Nothing stored
/// through this trait is required for correctness: callers treat every
/// error as a miss or a skipped write.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the live value at `key`, or None if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` at `key` for `ttl_secs` seconds (`SET key value EX ttl`).
    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()>;

    /// Prepends to the list at `key`, returning its new length.
    async fn lpush(&self, key: &str, value: String) -> Result<usize>;

    /// Trims the list at `key` to the inclusive range `start..=stop`.
    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()>;

    /// Reads the inclusive range `start..=stop` of the list at `key`.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>>;

    /// Increments the counter at `key`, returning the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Reads the counter at `key`, zero if absent. Not a cache lookup.
    async fn counter(&self, key: &str) -> Result<i64>;

    /// Returns usage statistics.
    async fn stats(&self) -> Result<CacheStats>;
}

// == Memory Store ==
/// `KvStore` over a shared `CacheStore`.
///
/// Cloning is cheap and clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<CacheStore>>,
}

impl MemoryStore {
    pub fn new(max_entries: usize) -> Self {
        Self::from_store(CacheStore::new(max_entries))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Removes expired entries, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: reads update LRU order and stats
        let mut store = self.inner.write().await;
        match store.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_miss() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        let mut store = self.inner.write().await;
        store.set(key.to_string(), value, Some(ttl_secs))
    }

    async fn lpush(&self, key: &str, value: String) -> Result<usize> {
        self.inner.write().await.lpush(key, value)
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        self.inner.write().await.ltrim(key, start, stop);
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        Ok(self.inner.read().await.lrange(key, start, stop))
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.inner.write().await.incr(key)
    }

    async fn counter(&self, key: &str) -> Result<i64> {
        Ok(self.inner.read().await.counter(key))
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(self.inner.read().await.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_memory_store_set_and_get() {
        let store = MemoryStore::new(100);

        store.set_ex("key", b"[1,2,1]".to_vec(), 60).await.unwrap();

        assert_eq!(store.get("key").await.unwrap(), Some(b"[1,2,1]".to_vec()));
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_store_expiry_is_a_miss() {
        let store = MemoryStore::new(100);

        store.set_ex("key", b"v".to_vec(), 1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new(100);
        let clone = store.clone();

        clone.incr("requests").await.unwrap();
        assert_eq!(store.incr("requests").await.unwrap(), 2);
        assert_eq!(clone.counter("requests").await.unwrap(), 2);
        assert_eq!(store.stats().await.unwrap().hits, 0);
    }

    #[tokio::test]
    async fn test_memory_store_lists() {
        let store = MemoryStore::new(100);

        for item in ["a", "b", "c"] {
            store.lpush("recent", item.to_string()).await.unwrap();
        }
        store.ltrim("recent", 0, 1).await.unwrap();

        assert_eq!(store.lrange("recent", 0, -1).await.unwrap(), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_oversized_key() {
        let store = MemoryStore::new(100);
        let key = "k".repeat(crate::cache::MAX_KEY_LENGTH + 1);

        assert!(store.set_ex(&key, b"v".to_vec(), 60).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_cleanup() {
        let store = MemoryStore::new(100);

        store.set_ex("short", b"v".to_vec(), 1).await.unwrap();
        store.set_ex("long", b"v".to_vec(), 60).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.cleanup_expired().await, 1);
        assert_eq!(store.stats().await.unwrap().total_entries, 1);
    }
}
