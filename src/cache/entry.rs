//! Store Entry Module
//!
//! A stored value and the monotonic deadline after which it is dead.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Vec<u8>,
    /// None for values that never expire
    deadline: Option<Instant>,
}

impl CacheEntry {
    /// Creates an entry that lives for `ttl_secs` seconds, or forever.
    pub fn new(value: Vec<u8>, ttl_secs: Option<u64>) -> Self {
        let now = Instant::now();
        let deadline = ttl_secs.and_then(|secs| now.checked_add(Duration::from_secs(secs)));

        Self { value, deadline }
    }

    /// True once `now` has reached the deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Time left before expiry, zero once dead, None without a deadline.
    pub fn time_to_live(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
