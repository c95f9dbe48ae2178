//! Request DTOs for the bitonic API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::bitonic::{Mode, Parameters, Strategy};

/// Request for a bitonic sequence (POST /bitonic body, GET /bitonic query)
///
/// # Fields
/// - `n`: Sequence length
/// - `l`, `r`: Inclusive value range
/// - `mode`: Optional construction mode (server default if omitted)
/// - `seed`: Optional seed for the randomized mode
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeRequest {
    pub n: usize,
    pub l: i64,
    pub r: i64,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ComputeRequest {
    /// Converts the request into typed parameters and a strategy.
    pub fn into_parts(self, default_mode: Mode) -> (Parameters, Strategy) {
        let mode = self.mode.unwrap_or(default_mode);
        (
            Parameters::new(self.n, self.l, self.r),
            Strategy::from_mode(mode, self.seed),
        )
    }
}

/// Request body for POST /validate
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub sequence: Vec<i64>,
    /// Report the boundary found even for rejected sequences
    #[serde(default)]
    pub diagnostic: bool,
}
