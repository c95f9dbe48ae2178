//! Bitonic Module
//!
//! Feasibility checks, sequence construction and validation for bitonic
//! integer sequences. Everything here is pure and synchronous.

mod builder;
mod feasibility;
mod validator;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BitonicError, Result};

pub use builder::build;
pub use feasibility::{is_feasible, is_feasible_randomized, max_length};
pub use validator::{diagnose, validate, ValidationResult};

// == Public Constants ==
/// Shortest sequence that can be bitonic
pub const MIN_SEQUENCE_LENGTH: usize = 2;

/// Longest sequence a single request may ask for
pub const MAX_SEQUENCE_LENGTH: usize = 100_000;

/// A generated or caller-supplied integer sequence.
pub type Sequence = Vec<i64>;

// == Mode ==
/// Named construction mode, as selected by a request or the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Deterministic construction with `high` as the unique peak
    #[serde(alias = "peak", alias = "deterministic")]
    PeakAnchored,
    /// Random split point and random steps
    #[serde(alias = "random")]
    Randomized,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::PeakAnchored => "peak_anchored",
            Mode::Randomized => "randomized",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = BitonicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "peak_anchored" | "peak" | "deterministic" => Ok(Mode::PeakAnchored),
            "randomized" | "random" => Ok(Mode::Randomized),
            other => Err(BitonicError::InvalidRequest(format!(
                "Unknown mode '{}'",
                other
            ))),
        }
    }
}

// == Strategy ==
/// A construction mode together with whatever it needs to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    PeakAnchored,
    /// With a seed the draw is reproducible; without one every call differs.
    Randomized { seed: Option<u64> },
}

impl Strategy {
    /// Builds a strategy from a mode. The seed is ignored for peak-anchored.
    pub fn from_mode(mode: Mode, seed: Option<u64>) -> Self {
        match mode {
            Mode::PeakAnchored => Strategy::PeakAnchored,
            Mode::Randomized => Strategy::Randomized { seed },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Strategy::PeakAnchored => Mode::PeakAnchored,
            Strategy::Randomized { .. } => Mode::Randomized,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        match self {
            Strategy::PeakAnchored => None,
            Strategy::Randomized { seed } => *seed,
        }
    }

    /// Returns true if identical parameters always produce identical output.
    pub fn is_deterministic(&self) -> bool {
        match self {
            Strategy::PeakAnchored => true,
            Strategy::Randomized { seed } => seed.is_some(),
        }
    }
}

// == Parameters ==
/// Requested length and inclusive value range of a bitonic sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameters {
    pub n: usize,
    pub low: i64,
    pub high: i64,
}

impl Parameters {
    pub fn new(n: usize, low: i64, high: i64) -> Self {
        Self { n, low, high }
    }

    /// Checks the parameter relationship required by `mode`.
    ///
    /// Peak-anchored construction needs `low < high`; randomized accepts
    /// `low == high` and reports it as infeasible later.
    pub fn validate(&self, mode: Mode) -> Result<()> {
        if self.n < MIN_SEQUENCE_LENGTH {
            return Err(BitonicError::InvalidRange(format!(
                "sequence length must be at least {}, got {}",
                MIN_SEQUENCE_LENGTH, self.n
            )));
        }
        if self.n > MAX_SEQUENCE_LENGTH {
            return Err(BitonicError::InvalidRequest(format!(
                "sequence length exceeds maximum of {}",
                MAX_SEQUENCE_LENGTH
            )));
        }
        if self.low > self.high {
            return Err(BitonicError::InvalidRange(format!(
                "low ({}) must not exceed high ({})",
                self.low, self.high
            )));
        }
        if mode == Mode::PeakAnchored && self.low == self.high {
            return Err(BitonicError::InvalidRange(format!(
                "low ({}) must be strictly less than high ({})",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Longest sequence `mode` can build in `[low, high]`.
    pub fn max_length(&self, mode: Mode) -> Result<u64> {
        match mode {
            Mode::PeakAnchored => max_length(self.low, self.high),
            Mode::Randomized => {
                is_feasible_randomized(self.n, self.low, self.high)?;
                Ok(self.high.abs_diff(self.low).saturating_add(1))
            }
        }
    }

    /// Checks whether a sequence can be built for these parameters under `mode`.
    pub fn is_feasible(&self, mode: Mode) -> Result<bool> {
        match mode {
            Mode::PeakAnchored => is_feasible(self.n, self.low, self.high),
            Mode::Randomized => is_feasible_randomized(self.n, self.low, self.high),
        }
    }
}
