//! Sequence Service
//!
//! The request facade: validates parameters, consults the result cache,
//! builds on a miss and records request metrics. HTTP handlers only ever
//! talk to this type.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::bitonic::{self, Mode, Parameters, Sequence, Strategy, ValidationResult};
use crate::cache::{CacheStats, KvStore, ResultCache, Served, Source};
use crate::config::Config;
use crate::error::{BitonicError, Result};

/// Counter incremented for every accepted compute request
pub const REQUEST_COUNTER_KEY: &str = "bitonic:requests";

/// List of the most recently computed requests, newest first
pub const RECENT_KEY: &str = "bitonic:recent";

// == Computation ==
/// Outcome of a compute request.
///
/// Infeasible requests are a normal outcome: `feasible` is false and there
/// is no sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computation {
    pub sequence: Option<Sequence>,
    pub feasible: bool,
    pub max_length: u64,
    pub mode: Mode,
    pub source: Option<Source>,
}

// == Service Stats ==
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub requests: i64,
    pub recent: Vec<String>,
    pub cache_enabled: bool,
    pub cache_ttl: Option<u64>,
    pub store: Option<CacheStats>,
}

// == Sequence Service ==
pub struct SequenceService {
    store: Arc<dyn KvStore>,
    cache: Option<ResultCache>,
    recent_limit: usize,
}

impl SequenceService {
    /// Creates a service caching results in `store` for `cache_ttl` seconds.
    pub fn new(store: Arc<dyn KvStore>, cache_ttl: u64, recent_limit: usize) -> Self {
        Self {
            cache: Some(ResultCache::new(Arc::clone(&store), cache_ttl)),
            store,
            recent_limit,
        }
    }

    /// Creates a service that always recomputes and uses `store` for metrics only.
    pub fn without_cache(store: Arc<dyn KvStore>, recent_limit: usize) -> Self {
        Self {
            store,
            cache: None,
            recent_limit,
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn KvStore>) -> Self {
        if config.cache_enabled {
            Self::new(store, config.cache_ttl, config.recent_limit)
        } else {
            Self::without_cache(store, config.recent_limit)
        }
    }

    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    // == Compute ==
    /// Produces a bitonic sequence for `params` under `strategy`.
    ///
    /// Malformed parameters fail before the cache or builder is touched.
    /// Unseeded randomized requests bypass the cache.
    pub async fn compute(&self, params: Parameters, strategy: Strategy) -> Result<Computation> {
        let mode = strategy.mode();
        params.validate(mode)?;

        self.record_request().await;

        let max_length = params.max_length(mode)?;
        if !params.is_feasible(mode)? {
            debug!(n = params.n, low = params.low, high = params.high, %mode, "infeasible request");
            return Ok(Computation {
                sequence: None,
                feasible: false,
                max_length,
                mode,
                source: None,
            });
        }

        let served = match &self.cache {
            Some(cache) if strategy.is_deterministic() => {
                cache.get_or_compute(&params, strategy).await?
            }
            _ => Served {
                sequence: bitonic::build(&params, strategy)?,
                source: Source::Computed,
            },
        };

        self.self_check(&params, &served.sequence)?;

        if served.source == Source::Computed {
            self.record_recent(&params, strategy).await;
        }

        Ok(Computation {
            sequence: Some(served.sequence),
            feasible: true,
            max_length,
            mode,
            source: Some(served.source),
        })
    }

    // == Validate ==
    pub fn validate(&self, sequence: &[i64]) -> ValidationResult {
        bitonic::validate(sequence)
    }

    /// Like `validate`, but keeps the boundary found for rejected sequences.
    pub fn diagnose(&self, sequence: &[i64]) -> ValidationResult {
        bitonic::diagnose(sequence)
    }

    // == Stats ==
    /// Collects request metrics and store statistics. Missing metrics read as empty.
    pub async fn stats(&self) -> ServiceStats {
        let requests = self
            .store
            .counter(REQUEST_COUNTER_KEY)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to read request counter");
                0
            });

        let recent = self
            .store
            .lrange(RECENT_KEY, 0, -1)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to read recent requests");
                Vec::new()
            });

        let store = match self.store.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "failed to read store statistics");
                None
            }
        };

        ServiceStats {
            requests,
            recent,
            cache_enabled: self.cache.is_some(),
            cache_ttl: self.cache.as_ref().map(ResultCache::ttl_secs),
            store,
        }
    }

    // == Helpers ==
    /// Rejects output that breaks the builder's contract.
    fn self_check(&self, params: &Parameters, sequence: &[i64]) -> Result<()> {
        let check = bitonic::validate(sequence);
        let in_range = sequence
            .iter()
            .all(|value| *value >= params.low && *value <= params.high);

        if check.valid && in_range && sequence.len() == params.n {
            return Ok(());
        }

        error!(
            n = params.n,
            low = params.low,
            high = params.high,
            reason = ?check.reason,
            in_range,
            "built sequence failed self-check"
        );
        Err(BitonicError::Internal(
            "generated sequence failed validation".to_string(),
        ))
    }

    async fn record_request(&self) {
        if let Err(e) = self.store.incr(REQUEST_COUNTER_KEY).await {
            warn!(error = %e, "failed to increment request counter");
        }
    }

    async fn record_recent(&self, params: &Parameters, strategy: Strategy) {
        if self.recent_limit == 0 {
            return;
        }

        let label = format!("{}:{}:{}:{}", strategy.mode(), params.n, params.low, params.high);
        if let Err(e) = self.store.lpush(RECENT_KEY, label).await {
            warn!(error = %e, "failed to record recent request");
            return;
        }

        let stop = isize::try_from(self.recent_limit).unwrap_or(isize::MAX) - 1;
        if let Err(e) = self.store.ltrim(RECENT_KEY, 0, stop).await {
            warn!(error = %e, "failed to trim recent requests");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;

    fn service() -> SequenceService {
        SequenceService::new(Arc::new(MemoryStore::new(100)), 60, 3)
    }

    #[tokio::test]
    async fn test_compute_full_range() {
        let computation = service()
            .compute(Parameters::new(7, 2, 5), Strategy::PeakAnchored)
            .await
            .unwrap();

        assert!(computation.feasible);
        assert_eq!(computation.sequence, Some(vec![2, 3, 4, 5, 4, 3, 2]));
        assert_eq!(computation.max_length, 7);
        assert_eq!(computation.source, Some(Source::Computed));
    }

    #[tokio::test]
    async fn test_compute_infeasible() {
        let service = service();
        for (n, low, high, max) in [(8, 2, 5, 7), (6, 8, 10, 5)] {
            let computation = service
                .compute(Parameters::new(n, low, high), Strategy::PeakAnchored)
                .await
                .unwrap();
            assert!(!computation.feasible);
            assert_eq!(computation.sequence, None);
            assert_eq!(computation.max_length, max);
            assert_eq!(computation.source, None);
        }
    }

    #[tokio::test]
    async fn test_compute_invalid_range() {
        let result = service()
            .compute(Parameters::new(3, 5, 5), Strategy::PeakAnchored)
            .await;
        assert!(matches!(result, Err(BitonicError::InvalidRange(_))));

        let result = service()
            .compute(Parameters::new(1, 0, 5), Strategy::Randomized { seed: None })
            .await;
        assert!(matches!(result, Err(BitonicError::InvalidRange(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_counted() {
        let service = service();
        let _ = service
            .compute(Parameters::new(3, 9, 1), Strategy::PeakAnchored)
            .await;
        assert_eq!(service.stats().await.requests, 0);
    }

    #[tokio::test]
    async fn test_compute_second_call_served_from_cache() {
        let service = service();
        let params = Parameters::new(5, 3, 10);

        let first = service.compute(params, Strategy::PeakAnchored).await.unwrap();
        let second = service.compute(params, Strategy::PeakAnchored).await.unwrap();

        assert_eq!(first.source, Some(Source::Computed));
        assert_eq!(second.source, Some(Source::Cache));
        assert_eq!(first.sequence, second.sequence);
    }

    #[tokio::test]
    async fn test_compute_without_cache_always_recomputes() {
        let service = SequenceService::without_cache(Arc::new(MemoryStore::new(100)), 3);
        let params = Parameters::new(5, 3, 10);

        for _ in 0..2 {
            let computation = service.compute(params, Strategy::PeakAnchored).await.unwrap();
            assert_eq!(computation.source, Some(Source::Computed));
        }
        assert!(!service.stats().await.cache_enabled);
    }

    #[tokio::test]
    async fn test_compute_randomized() {
        let service = service();
        let params = Parameters::new(6, 0, 10);

        let computation = service
            .compute(params, Strategy::Randomized { seed: None })
            .await
            .unwrap();
        let sequence = computation.sequence.unwrap();
        assert_eq!(sequence.len(), 6);
        assert!(sequence.iter().all(|v| (0..=10).contains(v)));
        assert_eq!(computation.max_length, 11);

        let again = service
            .compute(params, Strategy::Randomized { seed: None })
            .await
            .unwrap();
        assert_eq!(again.source, Some(Source::Computed));
    }

    #[tokio::test]
    async fn test_compute_randomized_infeasible() {
        let computation = service()
            .compute(Parameters::new(7, 2, 5), Strategy::Randomized { seed: Some(1) })
            .await
            .unwrap();
        assert!(!computation.feasible);
        assert_eq!(computation.max_length, 4);
    }

    #[tokio::test]
    async fn test_stats_tracks_requests_and_recent() {
        let service = service();
        for (n, low, high) in [(3, 0, 1), (4, 0, 5), (5, 0, 5), (6, 0, 5)] {
            service
                .compute(Parameters::new(n, low, high), Strategy::PeakAnchored)
                .await
                .unwrap();
        }
        service
            .compute(Parameters::new(3, 0, 1), Strategy::PeakAnchored)
            .await
            .unwrap();

        let stats = service.stats().await;
        assert_eq!(stats.requests, 5);
        assert_eq!(
            stats.recent,
            vec![
                "peak_anchored:6:0:5",
                "peak_anchored:5:0:5",
                "peak_anchored:4:0:5"
            ]
        );
        assert_eq!(stats.cache_ttl, Some(60));
        assert!(stats.store.is_some());
    }

    #[tokio::test]
    async fn test_compute_recomputes_over_bad_cached_value() {
        use crate::cache::CachedSequence;

        let store = MemoryStore::new(100);
        let service = SequenceService::new(Arc::new(store.clone()), 60, 3);
        let params = Parameters::new(3, 0, 4);
        let planted = CachedSequence::new(&params, Strategy::PeakAnchored, vec![4, 4, 4]);
        store
            .set_ex(
                "bitonic:peak_anchored:3:0:4",
                serde_json::to_vec(&planted).unwrap(),
                60,
            )
            .await
            .unwrap();

        let computation = service.compute(params, Strategy::PeakAnchored).await.unwrap();

        assert_eq!(computation.source, Some(Source::Computed));
        assert_eq!(computation.sequence, Some(vec![3, 4, 3]));
    }

    #[tokio::test]
    async fn test_stats_does_not_count_as_cache_lookup() {
        let service = service();
        service
            .compute(Parameters::new(3, 0, 1), Strategy::PeakAnchored)
            .await
            .unwrap();

        for _ in 0..3 {
            service.stats().await;
        }

        let store = service.stats().await.store.unwrap();
        assert_eq!(store.hits, 0);
        assert_eq!(store.misses, 1);
        assert_eq!(store.total_entries, 1);
    }

    #[test]
    fn test_validate_and_diagnose() {
        let service = service();
        assert!(service.validate(&[1, 3, 5, 7, 4, 2]).valid);
        assert!(!service.validate(&[1, 2, 3, 4, 5]).valid);
        assert_eq!(service.diagnose(&[1, 2, 3, 4, 5]).peak_index, Some(4));
    }
}
