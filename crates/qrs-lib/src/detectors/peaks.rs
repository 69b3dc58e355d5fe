//! Candidate search and mean thresholding on the integrated signal.

use crate::error::{QrsError, QrsResult, Stage};
use crate::signal::{AcceptedPeaks, IntegratedSignal, PeakCandidate};

/// Strict local maxima over a symmetric neighbourhood of radius `order`.
///
/// Index `i` (with `order <= i < len - order`) qualifies when its value is
/// strictly greater than every other sample in `[i - order, i + order]`.
/// A tie, or a missing value anywhere in the neighbourhood, disqualifies it,
/// so plateaus and the incomplete-window edges never produce candidates.
pub fn find_peaks(signal: &IntegratedSignal, order: usize) -> QrsResult<Vec<PeakCandidate>> {
    if order == 0 {
        return Err(QrsError::invalid(Stage::PeakFind, "order", 0.0));
    }
    let data = &signal.samples;
    let n = data.len();
    let mut out = Vec::new();
    if n <= 2 * order {
        return Ok(out);
    }
    for i in order..n - order {
        let Some(centre) = data[i] else {
            continue;
        };
        let is_peak = (1..=order).all(|o| {
            matches!(data[i - o], Some(left) if centre > left)
                && matches!(data[i + o], Some(right) if centre > right)
        });
        if is_peak {
            out.push(PeakCandidate {
                index: i,
                amplitude: centre,
            });
        }
    }
    Ok(out)
}

/// Keep candidates whose amplitude is strictly above the candidates' mean.
///
/// An empty candidate list leaves the mean undefined and fails with
/// `NoCandidatePeaks`. When every candidate has the same amplitude none
/// exceeds the mean and the accepted set is empty; that is a limitation of a
/// single mean threshold and is reported as-is.
pub fn select_above_mean(candidates: &[PeakCandidate]) -> QrsResult<AcceptedPeaks> {
    if candidates.is_empty() {
        return Err(QrsError::NoCandidatePeaks {
            stage: Stage::Threshold,
        });
    }
    let threshold =
        candidates.iter().map(|c| c.amplitude).sum::<f64>() / candidates.len() as f64;
    let indices = candidates
        .iter()
        .filter(|c| c.amplitude > threshold)
        .map(|c| c.index)
        .collect();
    Ok(AcceptedPeaks { threshold, indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrated(values: &[f64]) -> IntegratedSignal {
        IntegratedSignal {
            fs: 100.0,
            samples: values.iter().copied().map(Some).collect(),
        }
    }

    #[test]
    fn finds_strict_maxima_only() {
        let sig = integrated(&[0.0, 1.0, 3.0, 1.0, 0.0, 2.0, 2.0, 0.0, 5.0, 4.0, 0.0]);
        let peaks = find_peaks(&sig, 1).unwrap();
        let idx: Vec<usize> = peaks.iter().map(|p| p.index).collect();
        // The 2.0 plateau at 5..=6 is not reported.
        assert_eq!(idx, vec![2, 8]);
        assert_eq!(peaks[1].amplitude, 5.0);
    }

    #[test]
    fn every_candidate_beats_its_whole_neighbourhood() {
        let values: Vec<f64> = (0..400)
            .map(|i| {
                let t = i as f64 * 0.07;
                t.sin() + 0.4 * (3.1 * t).sin() + 0.1 * (11.3 * t).cos()
            })
            .collect();
        let sig = integrated(&values);
        for order in [1usize, 3, 10] {
            let peaks = find_peaks(&sig, order).unwrap();
            assert!(!peaks.is_empty());
            for p in &peaks {
                assert!(p.index >= order && p.index < values.len() - order);
                for j in p.index - order..=p.index + order {
                    if j != p.index {
                        assert!(values[p.index] > values[j]);
                    }
                }
            }
            assert!(peaks.windows(2).all(|w| w[0].index < w[1].index));
        }
    }

    #[test]
    fn missing_values_block_candidates() {
        let mut sig = integrated(&[0.0, 1.0, 5.0, 1.0, 0.0, 1.0, 6.0, 1.0, 0.0]);
        sig.samples[0] = None;
        sig.samples[7] = None;
        let peaks = find_peaks(&sig, 2).unwrap();
        assert!(peaks.is_empty());
        sig.samples[0] = Some(0.0);
        let peaks = find_peaks(&sig, 2).unwrap();
        assert_eq!(peaks.iter().map(|p| p.index).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn short_signal_has_no_candidates() {
        let peaks = find_peaks(&integrated(&[0.0, 1.0, 0.0]), 2).unwrap();
        assert!(peaks.is_empty());
    }

    #[test]
    fn zero_order_is_invalid() {
        let err = find_peaks(&integrated(&[0.0; 10]), 0).unwrap_err();
        assert_eq!(err.stage(), Stage::PeakFind);
    }

    #[test]
    fn threshold_keeps_candidates_above_mean() {
        let candidates = [
            PeakCandidate { index: 10, amplitude: 9.0 },
            PeakCandidate { index: 40, amplitude: 1.0 },
            PeakCandidate { index: 70, amplitude: 8.0 },
            PeakCandidate { index: 95, amplitude: 2.0 },
        ];
        let accepted = select_above_mean(&candidates).unwrap();
        assert!((accepted.threshold - 5.0).abs() < 1e-12);
        assert_eq!(accepted.indices, vec![10, 70]);
        for &i in &accepted.indices {
            let amp = candidates.iter().find(|c| c.index == i).unwrap().amplitude;
            assert!(amp > accepted.threshold);
        }
    }

    #[test]
    fn empty_candidates_fail() {
        assert_eq!(
            select_above_mean(&[]).unwrap_err(),
            QrsError::NoCandidatePeaks {
                stage: Stage::Threshold
            }
        );
    }

    #[test]
    fn identical_pulses_are_both_rejected() {
        // Two identical humps in an otherwise flat integrated signal.
        let mut values = vec![0.0; 200];
        for centre in [50usize, 150] {
            for k in 0..=8 {
                let v = 8.0 - k as f64;
                values[centre - k] = v;
                values[centre + k] = v;
            }
        }
        let peaks = find_peaks(&integrated(&values), 10).unwrap();
        assert_eq!(peaks.iter().map(|p| p.index).collect::<Vec<_>>(), vec![50, 150]);
        let accepted = select_above_mean(&peaks).unwrap();
        assert!(accepted.is_empty());
        assert_eq!(accepted.threshold, 8.0);
    }
}
