use crate::error::{QrsError, QrsResult, Stage};
use serde::{Deserialize, Serialize};

/// Uniformly sampled single-lead recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    fs: f64,
    samples: Vec<f64>,
}

impl Signal {
    /// Validate and wrap a sample buffer. `fs` is in Hz.
    pub fn new(fs: f64, samples: Vec<f64>) -> QrsResult<Self> {
        validate_fs(fs, Stage::Input)?;
        if let Some(index) = samples.iter().position(|x| !x.is_finite()) {
            return Err(QrsError::NonFiniteSample { index });
        }
        Ok(Self { fs, samples })
    }

    pub fn fs(&self) -> f64 {
        self.fs
    }
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.fs
    }

    /// Same sampling rate, samples in reverse time order.
    pub fn reversed(&self) -> Self {
        let mut samples = self.samples.clone();
        samples.reverse();
        Self {
            fs: self.fs,
            samples,
        }
    }

    /// Derived signal produced by a stage; samples are already known finite.
    pub(crate) fn derived(fs: f64, samples: Vec<f64>) -> Self {
        Self { fs, samples }
    }
}

/// Moving-sum output. `None` marks samples without a complete window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegratedSignal {
    pub fs: f64,
    pub samples: Vec<Option<f64>>,
}

impl IntegratedSignal {
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<f64> {
        self.samples.get(index).copied().flatten()
    }
}

/// Strict local maximum of the integrated signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakCandidate {
    pub index: usize,
    pub amplitude: f64,
}

/// Candidates surviving the mean threshold, ascending by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedPeaks {
    pub threshold: f64,
    pub indices: Vec<usize>,
}

impl AcceptedPeaks {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Localised R-wave positions in the original signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiducialMarks {
    pub indices: Vec<usize>,
}

impl FiducialMarks {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Mark positions in seconds from the start of the recording.
    pub fn times(&self, fs: f64) -> Vec<f64> {
        self.indices.iter().map(|&i| i as f64 / fs).collect()
    }
}

pub(crate) fn validate_fs(fs: f64, stage: Stage) -> QrsResult<()> {
    if fs.is_finite() && fs > 0.0 {
        Ok(())
    } else {
        Err(QrsError::invalid(stage, "sampling rate", fs))
    }
}

/// Sample count of a duration, `round(fs * seconds)`.
pub(crate) fn window_samples(fs: f64, seconds: f64) -> usize {
    (fs * seconds).round().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_sampling_rate() {
        for fs in [0.0, -250.0, f64::NAN, f64::INFINITY] {
            let err = Signal::new(fs, vec![0.0; 4]).unwrap_err();
            assert!(matches!(
                err,
                QrsError::InvalidParameter {
                    stage: Stage::Input,
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_non_finite_samples() {
        let err = Signal::new(250.0, vec![0.0, 1.0, f64::NAN]).unwrap_err();
        assert_eq!(err, QrsError::NonFiniteSample { index: 2 });
    }

    #[test]
    fn duration_and_reverse() {
        let sig = Signal::new(4.0, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert!((sig.duration() - 1.5).abs() < 1e-12);
        assert_eq!(sig.reversed().samples(), &[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn marks_convert_to_seconds() {
        let marks = FiducialMarks::from_indices(vec![0, 150, 300]);
        assert_eq!(marks.times(300.0), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn window_samples_rounds() {
        assert_eq!(window_samples(300.0, 0.150), 45);
        assert_eq!(window_samples(360.0, 0.150), 54);
        assert_eq!(window_samples(3.0, 0.150), 0);
    }
}
