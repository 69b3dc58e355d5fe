//! Agreement between detected marks and reference annotations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub tolerance: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// TP / (TP + FN); 0 when there are no reference events.
    pub sensitivity: f64,
    /// TP / (TP + FP); 0 when nothing was detected.
    pub positive_predictivity: f64,
}

/// Pair each reference event with at most one detection no further than
/// `tolerance` samples away. Both slices must be sorted ascending.
pub fn match_events(reference: &[usize], detected: &[usize], tolerance: usize) -> MatchSummary {
    let (mut i, mut j) = (0, 0);
    let mut tp = 0;
    while i < reference.len() && j < detected.len() {
        let (r, d) = (reference[i], detected[j]);
        if d + tolerance < r {
            j += 1;
        } else if r + tolerance < d {
            i += 1;
        } else {
            tp += 1;
            i += 1;
            j += 1;
        }
    }
    let fp = detected.len() - tp;
    let fn_ = reference.len() - tp;
    MatchSummary {
        tolerance,
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
        sensitivity: ratio(tp, tp + fn_),
        positive_predictivity: ratio(tp, tp + fp),
    }
}

/// Tolerance in samples for a duration, at least one sample.
pub fn tolerance_samples(fs: f64, seconds: f64) -> usize {
    ((seconds * fs).round() as usize).max(1)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_agreement() {
        let s = match_events(&[100, 400, 700], &[101, 398, 700], 3);
        assert_eq!(s.true_positives, 3);
        assert_eq!(s.false_positives, 0);
        assert_eq!(s.false_negatives, 0);
        assert!((s.sensitivity - 1.0).abs() < 1e-12);
        assert!((s.positive_predictivity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn misses_and_extras_are_counted() {
        let s = match_events(&[100, 400, 700, 1000], &[50, 103, 690, 1000, 1200], 5);
        assert_eq!(s.true_positives, 2);
        assert_eq!(s.false_positives, 3);
        assert_eq!(s.false_negatives, 2);
        assert!((s.sensitivity - 0.5).abs() < 1e-12);
        assert!((s.positive_predictivity - 0.4).abs() < 1e-12);
    }

    #[test]
    fn one_detection_matches_one_reference() {
        let s = match_events(&[100, 102], &[101], 3);
        assert_eq!(s.true_positives, 1);
        assert_eq!(s.false_negatives, 1);
    }

    #[test]
    fn empty_inputs() {
        let s = match_events(&[], &[], 2);
        assert_eq!(s.sensitivity, 0.0);
        assert_eq!(s.positive_predictivity, 0.0);
    }

    #[test]
    fn tolerance_from_seconds() {
        assert_eq!(tolerance_samples(360.0, 0.05), 18);
        assert_eq!(tolerance_samples(10.0, 0.01), 1);
    }
}
