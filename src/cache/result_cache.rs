//! Result Cache Module
//!
//! Maps request parameters to previously built sequences with a fixed TTL.
//! The backing store is an optimization only: every store failure is
//! logged and degrades to recomputation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bitonic::{self, Mode, Parameters, Sequence, Strategy};
use crate::cache::KvStore;
use crate::error::Result;

/// Prefix shared by every cached sequence key
pub const KEY_PREFIX: &str = "bitonic";

// == Cache Key ==
/// Deterministic store key for a request.
///
/// Returns None for unseeded randomized requests: their output differs per
/// call, so caching one draw would hand it to every later caller.
pub fn cache_key(params: &Parameters, strategy: Strategy) -> Option<String> {
    let base = format!(
        "{}:{}:{}:{}:{}",
        KEY_PREFIX,
        strategy.mode(),
        params.n,
        params.low,
        params.high
    );
    match strategy {
        Strategy::PeakAnchored => Some(base),
        Strategy::Randomized { seed: Some(seed) } => Some(format!("{}:{}", base, seed)),
        Strategy::Randomized { seed: None } => None,
    }
}

// == Cached Sequence ==
/// Serialized cache value: the sequence plus what produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSequence {
    pub sequence: Sequence,
    pub length: usize,
    pub low: i64,
    pub high: i64,
    pub mode: Mode,
    pub seed: Option<u64>,
    pub computed_at: DateTime<Utc>,
}

impl CachedSequence {
    pub fn new(params: &Parameters, strategy: Strategy, sequence: Sequence) -> Self {
        Self {
            length: sequence.len(),
            sequence,
            low: params.low,
            high: params.high,
            mode: strategy.mode(),
            seed: strategy.seed(),
            computed_at: Utc::now(),
        }
    }

    /// Returns true if this value was produced for exactly these inputs.
    fn matches(&self, params: &Parameters, strategy: Strategy) -> bool {
        self.length == params.n
            && self.sequence.len() == params.n
            && self.low == params.low
            && self.high == params.high
            && self.mode == strategy.mode()
            && self.seed == strategy.seed()
    }

    /// Returns true if the sequence is bitonic and every value lies in range.
    fn is_well_formed(&self) -> bool {
        self.sequence
            .iter()
            .all(|value| (self.low..=self.high).contains(value))
            && bitonic::validate(&self.sequence).valid
    }
}

// == Lookup ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit(CachedSequence),
    Miss,
}

// == Source ==
/// Where a returned sequence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cache,
    Computed,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Cache => f.write_str("cache"),
            Source::Computed => f.write_str("computed"),
        }
    }
}

/// A sequence tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub sequence: Sequence,
    pub source: Source,
}

// == Result Cache ==
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KvStore>,
    ttl_secs: u64,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KvStore>, ttl_secs: u64) -> Self {
        Self { store, ttl_secs }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    // == Lookup ==
    /// Returns the cached value for a request, or `Miss`.
    ///
    /// Store errors, undecodable values, values recorded for different
    /// inputs and values that are not bitonic are all reported as `Miss`.
    pub async fn lookup(&self, params: &Parameters, strategy: Strategy) -> Lookup {
        let Some(key) = cache_key(params, strategy) else {
            return Lookup::Miss;
        };

        let bytes = match self.store.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %key, "cache miss");
                return Lookup::Miss;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache lookup failed, treating as miss");
                return Lookup::Miss;
            }
        };

        match serde_json::from_slice::<CachedSequence>(&bytes) {
            Ok(cached) if !cached.matches(params, strategy) => {
                warn!(key = %key, "cached value does not match request, ignoring");
                Lookup::Miss
            }
            Ok(cached) if !cached.is_well_formed() => {
                warn!(key = %key, "cached value is not a bitonic sequence, ignoring");
                Lookup::Miss
            }
            Ok(cached) => {
                debug!(key = %key, "cache hit");
                Lookup::Hit(cached)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cached value is not decodable, ignoring");
                Lookup::Miss
            }
        }
    }

    // == Store ==
    /// Writes `sequence` for a request with an explicit TTL.
    ///
    /// Returns whether the write went through. Failures are logged only.
    pub async fn store(
        &self,
        params: &Parameters,
        strategy: Strategy,
        sequence: &[i64],
        ttl_secs: u64,
    ) -> bool {
        let Some(key) = cache_key(params, strategy) else {
            debug!("unseeded randomized result, not caching");
            return false;
        };

        let value = CachedSequence::new(params, strategy, sequence.to_vec());
        let bytes = match serde_json::to_vec(&value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to encode sequence for cache");
                return false;
            }
        };

        match self.store.set_ex(&key, bytes, ttl_secs).await {
            Ok(()) => {
                debug!(key = %key, ttl_secs, "cached sequence");
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache store failed, result not cached");
                false
            }
        }
    }

    // == Get Or Compute ==
    /// Returns the cached sequence for a request, building and storing it
    /// with the configured TTL on a miss.
    ///
    /// Only builder errors are returned.
    pub async fn get_or_compute(&self, params: &Parameters, strategy: Strategy) -> Result<Served> {
        if let Lookup::Hit(cached) = self.lookup(params, strategy).await {
            return Ok(Served {
                sequence: cached.sequence,
                source: Source::Cache,
            });
        }

        let sequence = bitonic::build(params, strategy)?;
        self.store(params, strategy, &sequence, self.ttl_secs).await;

        Ok(Served {
            sequence,
            source: Source::Computed,
        })
    }
}
