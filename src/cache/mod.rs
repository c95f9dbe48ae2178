//! Cache Module
//!
//! The result cache for computed sequences and the key-value store it sits on.

mod backend;
mod entry;
mod lru;
mod result_cache;
mod stats;
mod store;


// Re-export public types
pub use backend::{KvStore, MemoryStore};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use result_cache::{cache_key, CachedSequence, Lookup, ResultCache, Served, Source, KEY_PREFIX};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 4 * 1024 * 1024; // 4 MB
