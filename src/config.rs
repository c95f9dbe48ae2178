//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use tracing::warn;

use crate::bitonic::Mode;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds applied to every cached sequence
    pub cache_ttl: u64,
    /// Maximum number of entries the in-memory store can hold
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Whether computed sequences are cached at all
    pub cache_enabled: bool,
    /// Number of recently computed keys kept for the stats endpoint
    pub recent_limit: usize,
    /// Construction mode used when a request does not name one
    pub default_mode: Mode,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL` - Cached sequence TTL in seconds (default: 3600)
    /// - `MAX_ENTRIES` - Maximum store entries (default: 1000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `RECENT_LIMIT` - Recent keys kept (default: 10)
    /// - `DEFAULT_MODE` - `peak_anchored` or `randomized` (default: peak_anchored)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            cache_enabled: parse_var("CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            recent_limit: parse_var("RECENT_LIMIT").unwrap_or(defaults.recent_limit),
            default_mode: parse_var("DEFAULT_MODE").unwrap_or(defaults.default_mode),
        }
    }
}

/// Reads `name` from the environment. Unset yields None silently; an
/// unparsable value is logged and also yields None.
fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}, using default", name, raw);
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl: 3600,
            max_entries: 1000,
            cleanup_interval: 1,
            cache_enabled: true,
            recent_limit: 10,
            default_mode: Mode::PeakAnchored,
        }
    }
}
