//! Range Feasibility Module
//!
//! Decides whether a bitonic sequence of a given length fits in a value range.

use crate::error::{BitonicError, Result};

// == Max Length ==
/// Longest bitonic sequence that fits in `[low, high]`.
///
/// Ascending strictly from `low` to `high` and descending strictly back to
/// `low` uses `2 * (high - low) + 1` values. Saturates at `u64::MAX`.
///
/// Fails with `InvalidRange` when `low >= high`.
pub fn max_length(low: i64, high: i64) -> Result<u64> {
    if low >= high {
        return Err(BitonicError::InvalidRange(format!(
            "low ({}) must be strictly less than high ({})",
            low, high
        )));
    }
    let span = high.abs_diff(low);
    Ok(span.saturating_mul(2).saturating_add(1))
}

// == Is Feasible ==
/// Returns whether a peak-anchored sequence of length `n` fits in `[low, high]`.
///
/// An `n` that is merely too long yields `Ok(false)`, not an error.
pub fn is_feasible(n: usize, low: i64, high: i64) -> Result<bool> {
    let max = max_length(low, high)?;
    Ok(u64::try_from(n).map_or(false, |n| n <= max))
}

/// Returns whether a randomized sequence of length `n` fits in `[low, high]`.
///
/// Each run draws distinct values below the peak, so the range must span at
/// least `n - 1` steps.
pub fn is_feasible_randomized(n: usize, low: i64, high: i64) -> Result<bool> {
    if low > high {
        return Err(BitonicError::InvalidRange(format!(
            "low ({}) must not exceed high ({})",
            low, high
        )));
    }
    let span = high.abs_diff(low);
    let steps = n.saturating_sub(1);
    Ok(u64::try_from(steps).map_or(false, |steps| span >= steps))
}
