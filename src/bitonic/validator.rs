//! Bitonic Validator Module
//!
//! Classifies arbitrary sequences as bitonic and locates their peak.

use serde::Serialize;

// == Validation Result ==
/// Outcome of checking a sequence for the bitonic shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Index of the peak. Only set for valid sequences unless produced by `diagnose`.
    pub peak_index: Option<usize>,
    /// Why the sequence was rejected
    pub reason: Option<String>,
}

impl ValidationResult {
    fn accepted(peak_index: usize) -> Self {
        Self {
            valid: true,
            peak_index: Some(peak_index),
            reason: None,
        }
    }

    fn rejected(peak_index: Option<usize>, reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            peak_index,
            reason: Some(reason.into()),
        }
    }
}

// == Validate ==
/// Checks whether `sequence` strictly increases to a single peak and then
/// strictly decreases.
///
/// A strictly decreasing pair such as `[5, 3]` is accepted with its peak at
/// index 0. Longer purely decreasing sequences and purely increasing
/// sequences of any length are rejected.
pub fn validate(sequence: &[i64]) -> ValidationResult {
    let mut result = diagnose(sequence);
    if !result.valid {
        result.peak_index = None;
    }
    result
}

// == Diagnose ==
/// Same as `validate`, but reports the ascending/descending boundary it
/// found even when the sequence is rejected.
pub fn diagnose(sequence: &[i64]) -> ValidationResult {
    if sequence.len() < 2 {
        return ValidationResult::rejected(None, "too short");
    }

    let last = sequence.len() - 1;
    let peak = sequence
        .windows(2)
        .take_while(|pair| pair[0] < pair[1])
        .count();

    if peak == last {
        return ValidationResult::rejected(Some(peak), "no descending run");
    }
    if peak == 0 && sequence.len() > 2 {
        return ValidationResult::rejected(Some(peak), "no ascending run");
    }

    match sequence[peak..]
        .windows(2)
        .position(|pair| pair[0] <= pair[1])
    {
        Some(offset) => ValidationResult::rejected(
            Some(peak),
            format!("not strictly decreasing at index {}", peak + offset + 1),
        ),
        None => ValidationResult::accepted(peak),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bitonic() {
        let result = validate(&[1, 3, 5, 7, 4, 2]);
        assert!(result.valid);
        assert_eq!(result.peak_index, Some(3));
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_validate_increasing_rejected() {
        let result = validate(&[1, 2, 3, 4, 5]);
        assert!(!result.valid);
        assert!(result.peak_index.is_none());
        assert_eq!(result.reason.as_deref(), Some("no descending run"));
    }

    #[test]
    fn test_validate_decreasing_rejected() {
        let result = validate(&[5, 4, 3, 2, 1]);
        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some("no ascending run"));
    }

    #[test]
    fn test_validate_decreasing_pair_accepted() {
        let result = validate(&[5, 3]);
        assert!(result.valid);
        assert_eq!(result.peak_index, Some(0));
    }

    #[test]
    fn test_validate_increasing_pair_rejected() {
        assert!(!validate(&[3, 5]).valid);
    }

    #[test]
    fn test_validate_equal_pair_rejected() {
        let result = validate(&[4, 4]);
        assert!(!result.valid);
        assert_eq!(
            result.reason.as_deref(),
            Some("not strictly decreasing at index 1")
        );
    }

    #[test]
    fn test_validate_too_short() {
        for sequence in [vec![], vec![7]] {
            let result = validate(&sequence);
            assert!(!result.valid);
            assert_eq!(result.reason.as_deref(), Some("too short"));
        }
    }

    #[test]
    fn test_validate_plateau_rejected() {
        let result = validate(&[1, 2, 2, 1]);
        assert!(!result.valid);
        assert_eq!(
            result.reason.as_deref(),
            Some("not strictly decreasing at index 2")
        );
    }

    #[test]
    fn test_validate_second_rise_rejected() {
        let result = validate(&[1, 4, 2, 3]);
        assert!(!result.valid);
        assert_eq!(
            result.reason.as_deref(),
            Some("not strictly decreasing at index 3")
        );
    }

    #[test]
    fn test_diagnose_reports_boundary() {
        let result = diagnose(&[1, 4, 2, 3]);
        assert!(!result.valid);
        assert_eq!(result.peak_index, Some(1));

        let result = diagnose(&[1, 2, 3]);
        assert_eq!(result.peak_index, Some(2));

        assert_eq!(diagnose(&[9]).peak_index, None);
    }

    #[test]
    fn test_diagnose_matches_validate_when_valid() {
        let sequence = [2, 3, 4, 5, 4, 3, 2];
        assert_eq!(diagnose(&sequence), validate(&sequence));
    }
}
