pub mod butterworth;
pub mod zero_phase;

use crate::error::QrsResult;
use crate::signal::Signal;
use butterworth::Section;

/// Zero-phase Butterworth bandpass bound to one sampling rate.
///
/// Coefficients are designed once in [`BandpassFilter::design`] and reused for
/// every signal passed to [`BandpassFilter::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct BandpassFilter {
    fs: f64,
    order: usize,
    low_hz: f64,
    high_hz: f64,
    sections: Vec<Section>,
}

impl BandpassFilter {
    pub fn design(order: usize, low_hz: f64, high_hz: f64, fs: f64) -> QrsResult<Self> {
        let sections = butterworth::design_bandpass(order, low_hz, high_hz, fs)?;
        Ok(Self {
            fs,
            order,
            low_hz,
            high_hz,
            sections,
        })
    }

    pub fn fs(&self) -> f64 {
        self.fs
    }
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Whether this filter was designed for exactly these parameters.
    pub fn matches(&self, order: usize, low_hz: f64, high_hz: f64, fs: f64) -> bool {
        self.order == order && self.low_hz == low_hz && self.high_hz == high_hz && self.fs == fs
    }

    /// Minimum signal length the forward-backward pass accepts.
    pub fn min_len(&self) -> usize {
        zero_phase::min_len(&self.sections)
    }

    /// Filter `signal` forward and backward; output length equals input length.
    pub fn apply(&self, signal: &Signal) -> QrsResult<Signal> {
        let out = zero_phase::filtfilt(&self.sections, signal.samples())?;
        Ok(Signal::derived(signal.fs(), out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn designed_once_and_reused() {
        let filter = BandpassFilter::design(3, 5.0, 15.0, 360.0).unwrap();
        assert_eq!(filter.sections().len(), 3);
        assert_eq!(filter.min_len(), 22);
        assert!(filter.matches(3, 5.0, 15.0, 360.0));
        assert!(!filter.matches(3, 5.0, 15.0, 250.0));

        let a = Signal::new(360.0, (0..400).map(|i| ((i % 50) as f64).sqrt()).collect()).unwrap();
        let b = a.reversed();
        let ya = filter.apply(&a).unwrap();
        let yb = filter.apply(&b).unwrap();
        assert_eq!(ya.len(), a.len());
        assert_eq!(yb.len(), b.len());
        assert_eq!(filter.apply(&a).unwrap(), ya);
    }
}
