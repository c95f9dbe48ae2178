//! Response DTOs for the bitonic API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::bitonic::{Mode, Sequence, ValidationResult};
use crate::cache::{CacheStats, Source};
use crate::service::{Computation, ServiceStats};

/// Response body for /bitonic
///
/// An infeasible request is answered with `feasible: false` and a null
/// `sequence`.
#[derive(Debug, Clone, Serialize)]
pub struct ComputeResponse {
    pub sequence: Option<Sequence>,
    pub feasible: bool,
    pub max_length: u64,
    pub mode: Mode,
    /// `cache` or `computed`; null when infeasible
    pub source: Option<Source>,
}

impl From<Computation> for ComputeResponse {
    fn from(computation: Computation) -> Self {
        Self {
            sequence: computation.sequence,
            feasible: computation.feasible,
            max_length: computation.max_length,
            mode: computation.mode,
            source: computation.source,
        }
    }
}

/// Response body for POST /validate
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub peak_index: Option<usize>,
    pub reason: Option<String>,
    pub length: usize,
}

impl ValidateResponse {
    pub fn new(result: ValidationResult, length: usize) -> Self {
        Self {
            valid: result.valid,
            peak_index: result.peak_index,
            reason: result.reason,
            length,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Compute requests accepted since startup
    pub requests: i64,
    /// Most recently computed requests, newest first
    pub recent: Vec<String>,
    pub cache_enabled: bool,
    pub cache_ttl: Option<u64>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<ServiceStats> for StatsResponse {
    fn from(stats: ServiceStats) -> Self {
        let store = stats.store.unwrap_or_else(CacheStats::new);
        Self {
            requests: stats.requests,
            recent: stats.recent,
            cache_enabled: stats.cache_enabled,
            cache_ttl: stats.cache_ttl,
            hit_rate: store.hit_rate(),
            hits: store.hits,
            misses: store.misses,
            evictions: store.evictions,
            expirations: store.expirations,
            total_entries: store.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_response_serialize() {
        let resp = ComputeResponse::from(Computation {
            sequence: Some(vec![2, 3, 4, 5, 4, 3, 2]),
            feasible: true,
            max_length: 7,
            mode: Mode::PeakAnchored,
            source: Some(Source::Cache),
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["sequence"], serde_json::json!([2, 3, 4, 5, 4, 3, 2]));
        assert_eq!(json["mode"], "peak_anchored");
        assert_eq!(json["source"], "cache");
    }

    #[test]
    fn test_infeasible_response_serialize() {
        let resp = ComputeResponse::from(Computation {
            sequence: None,
            feasible: false,
            max_length: 7,
            mode: Mode::PeakAnchored,
            source: None,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["sequence"].is_null());
        assert_eq!(json["feasible"], false);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let resp = StatsResponse::from(ServiceStats {
            requests: 10,
            recent: vec![],
            cache_enabled: true,
            cache_ttl: Some(60),
            store: Some(CacheStats {
                hits: 8,
                misses: 2,
                expirations: 0,
                evictions: 1,
                total_entries: 4,
            }),
        });
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.total_entries, 4);
    }

    #[test]
    fn test_stats_response_without_store() {
        let resp = StatsResponse::from(ServiceStats {
            requests: 0,
            recent: vec![],
            cache_enabled: false,
            cache_ttl: None,
            store: None,
        });
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
