//! Sequence Builder Module
//!
//! Constructs bitonic sequences under one of two named strategies.
//!
//! # Strategies
//! - Peak-anchored: deterministic, `high` is the unique peak and both runs
//!   count down from `high - 1` independently, so values may repeat across
//!   the peak.
//! - Randomized: random split point and random distinct values below a
//!   random peak. Reproducible only when seeded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    is_feasible, is_feasible_randomized, Mode, Parameters, Sequence, Strategy,
    MIN_SEQUENCE_LENGTH,
};
use crate::error::{BitonicError, Result};

// == Build ==
/// Builds a bitonic sequence for `params` using `strategy`.
///
/// Fails with `InvalidRange` on malformed parameters and with
/// `InfeasibleRange` when no sequence of length `n` fits the range.
pub fn build(params: &Parameters, strategy: Strategy) -> Result<Sequence> {
    match strategy {
        Strategy::PeakAnchored => build_peak_anchored(params),
        Strategy::Randomized { seed: Some(seed) } => {
            build_randomized(params, &mut StdRng::seed_from_u64(seed))
        }
        Strategy::Randomized { seed: None } => build_randomized(params, &mut rand::thread_rng()),
    }
}

// == Peak-Anchored ==
fn build_peak_anchored(params: &Parameters) -> Result<Sequence> {
    params.validate(Mode::PeakAnchored)?;
    if !is_feasible(params.n, params.low, params.high)? {
        return Err(BitonicError::InfeasibleRange {
            n: params.n,
            max_length: params.max_length(Mode::PeakAnchored)?,
        });
    }

    let span = usize::try_from(params.high.abs_diff(params.low)).unwrap_or(usize::MAX);
    let (rising, falling) = peak_anchored_split(params.n, span);
    let high = params.high;

    let mut sequence = Vec::with_capacity(params.n);
    sequence.extend((1..=rising).rev().map(|step| high - step as i64));
    sequence.push(high);
    sequence.extend((1..=falling).map(|step| high - step as i64));
    Ok(sequence)
}

/// Splits the `n - 1` non-peak elements into (before peak, after peak).
///
/// The descending run takes as many values as the range allows while the
/// ascending run keeps at least one, so the peak stays interior. A pair is
/// the single exception: `[high, high - 1]`.
fn peak_anchored_split(n: usize, span: usize) -> (usize, usize) {
    if n == MIN_SEQUENCE_LENGTH {
        return (0, 1);
    }
    let falling = (n - 2).min(span);
    (n - 1 - falling, falling)
}

// == Randomized ==
fn build_randomized<R: Rng + ?Sized>(params: &Parameters, rng: &mut R) -> Result<Sequence> {
    params.validate(Mode::Randomized)?;
    if !is_feasible_randomized(params.n, params.low, params.high)? {
        return Err(BitonicError::InfeasibleRange {
            n: params.n,
            max_length: params.max_length(Mode::Randomized)?,
        });
    }

    let n = params.n;
    let low = params.low;

    // Length of the ascending run including the peak
    let rising_len = if n == MIN_SEQUENCE_LENGTH {
        1
    } else {
        rng.gen_range(2..=n - 1)
    };
    let falling_len = n - rising_len;

    // Both runs draw distinct values from [low, peak)
    let reach = (rising_len - 1).max(falling_len) as u64;
    let offset = rng.gen_range(reach..=params.high.abs_diff(low));
    let peak = low.wrapping_add_unsigned(offset);
    let below = usize::try_from(offset).unwrap_or(usize::MAX);

    let mut rising = sample_below(rng, low, below, rising_len - 1);
    rising.sort_unstable();
    let mut falling = sample_below(rng, low, below, falling_len);
    falling.sort_unstable_by(|a, b| b.cmp(a));

    let mut sequence = Vec::with_capacity(n);
    sequence.extend(rising);
    sequence.push(peak);
    sequence.extend(falling);
    Ok(sequence)
}

/// Draws `amount` distinct values from `[low, low + below)`.
fn sample_below<R: Rng + ?Sized>(rng: &mut R, low: i64, below: usize, amount: usize) -> Vec<i64> {
    rand::seq::index::sample(rng, below, amount)
        .into_iter()
        .map(|index| low.wrapping_add_unsigned(index as u64))
        .collect()
}
