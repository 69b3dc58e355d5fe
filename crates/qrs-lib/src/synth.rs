//! Synthetic pulse trains for exercising the detector.

use crate::error::QrsResult;
use crate::signal::Signal;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Gaussian pulses at known times plus optional uniform noise.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseTrain {
    pub fs: f64,
    pub duration_s: f64,
    /// Pulse centres (seconds).
    pub beat_times_s: Vec<f64>,
    pub amplitude: f64,
    /// Gaussian standard deviation (seconds).
    pub width_s: f64,
    /// Noise is drawn uniformly from `[-noise, noise]`.
    pub noise: f64,
    pub seed: u64,
}

impl PulseTrain {
    /// Pulses every `1 / rate_hz` seconds, the first half a period in.
    pub fn regular(fs: f64, duration_s: f64, rate_hz: f64) -> Self {
        let period = 1.0 / rate_hz;
        let mut beat_times_s = Vec::new();
        let mut t = period * 0.5;
        while t < duration_s {
            beat_times_s.push(t);
            t += period;
        }
        Self::with_beats(fs, duration_s, beat_times_s)
    }

    /// First pulse at `first_s`, then one after each interval, `tail_s` of
    /// signal after the last.
    pub fn from_intervals(fs: f64, first_s: f64, intervals_s: &[f64], tail_s: f64) -> Self {
        let mut beat_times_s = Vec::with_capacity(intervals_s.len() + 1);
        let mut t = first_s;
        beat_times_s.push(t);
        for &rr in intervals_s {
            t += rr;
            beat_times_s.push(t);
        }
        Self::with_beats(fs, t + tail_s, beat_times_s)
    }

    fn with_beats(fs: f64, duration_s: f64, beat_times_s: Vec<f64>) -> Self {
        Self {
            fs,
            duration_s,
            beat_times_s,
            amplitude: 10.0,
            width_s: 0.020,
            noise: 0.0,
            seed: 0,
        }
    }

    pub fn amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn width(mut self, width_s: f64) -> Self {
        self.width_s = width_s;
        self
    }

    pub fn noise(mut self, noise: f64, seed: u64) -> Self {
        self.noise = noise;
        self.seed = seed;
        self
    }

    /// Nearest sample index of each pulse centre.
    pub fn beat_indices(&self) -> Vec<usize> {
        self.beat_times_s
            .iter()
            .map(|t| (t * self.fs).round() as usize)
            .collect()
    }

    pub fn render(&self) -> QrsResult<Signal> {
        let n = (self.duration_s * self.fs).round() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let samples = (0..n)
            .map(|i| {
                let t = i as f64 / self.fs;
                let mut v: f64 = self
                    .beat_times_s
                    .iter()
                    .map(|&c| {
                        let z = (t - c) / self.width_s;
                        self.amplitude * (-0.5 * z * z).exp()
                    })
                    .sum();
                if self.noise > 0.0 {
                    v += rng.gen_range(-self.noise..=self.noise);
                }
                v
            })
            .collect();
        Signal::new(self.fs, samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_train_places_pulses_mid_period() {
        let train = PulseTrain::regular(300.0, 10.0, 1.0);
        assert_eq!(train.beat_times_s.len(), 10);
        assert_eq!(train.beat_indices()[0], 150);
        assert_eq!(train.beat_indices()[9], 2850);
        let sig = train.render().unwrap();
        assert_eq!(sig.len(), 3000);
        assert!((sig.samples()[150] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn noise_is_seeded_and_bounded() {
        let train = PulseTrain::regular(250.0, 2.0, 1.0).noise(0.3, 7);
        let a = train.render().unwrap();
        let b = train.render().unwrap();
        assert_eq!(a, b);
        let clean = PulseTrain::regular(250.0, 2.0, 1.0).render().unwrap();
        for (x, y) in a.samples().iter().zip(clean.samples()) {
            assert!((x - y).abs() <= 0.3);
        }
    }

    #[test]
    fn intervals_accumulate() {
        let train = PulseTrain::from_intervals(250.0, 0.5, &[0.8, 0.9], 1.0);
        assert_eq!(train.beat_times_s.len(), 3);
        assert!((train.beat_times_s[2] - 2.2).abs() < 1e-12);
        assert!((train.duration_s - 3.2).abs() < 1e-12);
    }
}
