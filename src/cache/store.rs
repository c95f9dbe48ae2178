//! Cache Store Module
//!
//! In-memory key-value engine: expiring blobs with LRU eviction, plus
//! Redis-style lists and integer counters. Lists and counters are metrics
//! storage: they are never evicted and never show up in lookup statistics.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{BitonicError, Result};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    /// Expiring blobs
    entries: HashMap<String, CacheEntry>,
    counters: HashMap<String, i64>,
    /// Lists, newest element first
    lists: HashMap<String, VecDeque<String>>,
    /// LRU access tracker over `entries`
    lru: LruTracker,
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            counters: HashMap::new(),
            lists: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, expiring after `ttl` seconds (never if None).
    ///
    /// Overwrites reset the TTL. At capacity, the least recently used entry
    /// is evicted first.
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl: Option<u64>) -> Result<()> {
        check_key(&key)?;
        if value.len() > MAX_VALUE_SIZE {
            return Err(BitonicError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.make_room_for(&key)?;
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.lru.touch(&key);
        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// Expired entries are removed on access and reported as `Expired`.
    pub fn get(&mut self, key: &str) -> Result<Vec<u8>> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_lookup(false);
            return Err(BitonicError::NotFound(key.to_string()));
        };

        if entry.is_expired() {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_lookup(false);
            return Err(BitonicError::Expired(key.to_string()));
        }

        let value = entry.value.clone();
        self.stats.record_lookup(true);
        self.lru.touch(key);
        Ok(value)
    }

    // == Incr ==
    /// Increments the counter at `key`, starting from zero.
    ///
    /// Fails if `key` holds a live blob.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        check_key(key)?;
        if self.entries.get(key).is_some_and(|entry| !entry.is_expired()) {
            return Err(BitonicError::InvalidRequest(format!(
                "Value at '{}' is not a counter",
                key
            )));
        }

        let counter = self.counters.entry(key.to_string()).or_insert(0);
        *counter = counter.checked_add(1).ok_or_else(|| {
            BitonicError::InvalidRequest(format!("Counter '{}' would overflow", key))
        })?;
        Ok(*counter)
    }

    /// Current value of the counter at `key`, zero if never incremented.
    pub fn counter(&self, key: &str) -> i64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    // == List Push ==
    /// Prepends `value` to the list at `key`, returning the new length.
    pub fn lpush(&mut self, key: &str, value: String) -> Result<usize> {
        check_key(key)?;
        let list = self.lists.entry(key.to_string()).or_default();
        list.push_front(value);
        Ok(list.len())
    }

    // == List Trim ==
    /// Keeps only the elements between `start` and `stop` inclusive.
    ///
    /// Negative indices count from the end, as in Redis. An empty result
    /// removes the list.
    pub fn ltrim(&mut self, key: &str, start: isize, stop: isize) {
        let Some(list) = self.lists.get_mut(key) else {
            return;
        };

        match list_bounds(list.len(), start, stop) {
            Some((from, to)) => {
                list.truncate(to + 1);
                list.drain(..from);
            }
            None => {
                self.lists.remove(key);
            }
        }
    }

    // == List Range ==
    /// Returns the elements between `start` and `stop` inclusive.
    pub fn lrange(&self, key: &str, start: isize, stop: isize) -> Vec<String> {
        let Some(list) = self.lists.get(key) else {
            return Vec::new();
        };

        match list_bounds(list.len(), start, stop) {
            Some((from, to)) => list.range(from..=to).cloned().collect(),
            None => Vec::new(),
        }
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Helpers ==
    fn make_room_for(&mut self, key: &str) -> Result<()> {
        if self.entries.contains_key(key) || self.entries.len() < self.max_entries {
            return Ok(());
        }

        match self.lru.evict_oldest() {
            Some(evicted_key) => {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                Ok(())
            }
            None => Err(BitonicError::CacheUnavailable(
                "Store is full and eviction failed".to_string(),
            )),
        }
    }

    fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(BitonicError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(BitonicError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Resolves Redis-style inclusive indices against a list of `len` elements.
fn list_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}
