//! Butterworth bandpass design as cascaded second-order sections.
//!
//! The analog prototype poles are mapped through the lowpass-to-bandpass
//! transform, then to the z-plane with a prewarped bilinear transform. Every
//! section carries one zero at z = 1 and one at z = -1, so the numerators are
//! `[1, 0, -1]` before the overall gain is folded into the first section.

use crate::error::{QrsError, QrsResult, Stage};
use num_complex::Complex64;
use std::f64::consts::PI;

/// One second-order section, `H(z) = (b0 + b1 z^-1 + b2 z^-2) / (1 + a1 z^-1 + a2 z^-2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    pub b: [f64; 3],
    pub a: [f64; 2],
}

impl Section {
    /// Gain at DC.
    pub fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (1.0 + self.a[0] + self.a[1])
    }

    /// Direct Form II Transposed state reached after a unit step settles.
    pub fn step_state(&self) -> [f64; 2] {
        let g = self.dc_gain();
        let s1 = self.b[2] - self.a[1] * g;
        let s0 = self.b[1] - self.a[0] * g + s1;
        [s0, s1]
    }

    fn response(&self, z_inv: Complex64) -> Complex64 {
        let num = self.b[0] + z_inv * (self.b[1] + z_inv * self.b[2]);
        let den = 1.0 + z_inv * (self.a[0] + z_inv * self.a[1]);
        num / den
    }

    /// Process `data` in place starting from `state`.
    pub fn run(&self, data: &mut [f64], mut state: [f64; 2]) {
        for x in data.iter_mut() {
            let input = *x;
            let output = self.b[0] * input + state[0];
            state[0] = self.b[1] * input - self.a[0] * output + state[1];
            state[1] = self.b[2] * input - self.a[1] * output;
            *x = output;
        }
    }
}

/// Design an `order`-th order Butterworth bandpass between `low_hz` and `high_hz`.
///
/// Returns `order` sections. Cutoffs must satisfy `0 < low < high < fs / 2`.
pub fn design_bandpass(
    order: usize,
    low_hz: f64,
    high_hz: f64,
    fs: f64,
) -> QrsResult<Vec<Section>> {
    crate::signal::validate_fs(fs, Stage::Bandpass)?;
    if order == 0 {
        return Err(QrsError::invalid(Stage::Bandpass, "filter order", 0.0));
    }
    let nyquist = fs * 0.5;
    if !(low_hz > 0.0 && low_hz < nyquist) {
        return Err(QrsError::invalid(Stage::Bandpass, "low cutoff", low_hz));
    }
    if !(high_hz > low_hz && high_hz < nyquist) {
        return Err(QrsError::invalid(Stage::Bandpass, "high cutoff", high_hz));
    }

    let fs2 = 2.0 * fs;
    let wl = prewarp(low_hz, fs);
    let wh = prewarp(high_hz, fs);
    let bw = wh - wl;
    let w0 = (wl * wh).sqrt();

    let mut poles = Vec::with_capacity(2 * order);
    for p in prototype_poles(order) {
        let half = p * (bw * 0.5);
        let root = (half * half - w0 * w0).sqrt();
        for s in [half + root, half - root] {
            poles.push((fs2 + s) / (fs2 - s));
        }
    }

    let mut sections = pair_poles(&poles);

    // Normalise to unity gain at the digital image of the analog centre frequency.
    let wc = 2.0 * (w0 / fs2).atan();
    let z_inv = Complex64::from_polar(1.0, -wc);
    let response = sections
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, s| acc * s.response(z_inv));
    let gain = 1.0 / response.norm();
    if let Some(first) = sections.first_mut() {
        for b in first.b.iter_mut() {
            *b *= gain;
        }
    }
    Ok(sections)
}

/// Magnitude response of a cascade at `freq_hz`.
pub fn magnitude_at(sections: &[Section], freq_hz: f64, fs: f64) -> f64 {
    let z_inv = Complex64::from_polar(1.0, -2.0 * PI * freq_hz / fs);
    sections
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, s| acc * s.response(z_inv))
        .norm()
}

/// Bilinear prewarp, scaled for `s = 2 fs (z - 1) / (z + 1)`.
fn prewarp(freq_hz: f64, fs: f64) -> f64 {
    2.0 * fs * (PI * freq_hz / fs).tan()
}

/// Left-half-plane poles of the normalised Butterworth lowpass.
fn prototype_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + 1 + order) as f64 / (2 * order) as f64;
            Complex64::from_polar(1.0, theta)
        })
        .collect()
}

/// Group conjugate pairs (and leftover real poles two by two) into sections.
fn pair_poles(poles: &[Complex64]) -> Vec<Section> {
    let is_real = |z: &Complex64| z.im.abs() <= 1e-12 * z.norm().max(1.0);
    let mut sections: Vec<Section> = poles
        .iter()
        .filter(|z| !is_real(*z) && z.im > 0.0)
        .map(|z| Section {
            b: [1.0, 0.0, -1.0],
            a: [-2.0 * z.re, z.norm_sqr()],
        })
        .collect();

    let mut reals: Vec<f64> = poles.iter().filter(|z| is_real(*z)).map(|z| z.re).collect();
    reals.sort_by(|a, b| a.total_cmp(b));
    for pair in reals.chunks(2) {
        let (r0, r1) = (pair[0], pair.get(1).copied().unwrap_or(0.0));
        sections.push(Section {
            b: [1.0, 0.0, -1.0],
            a: [-(r0 + r1), r0 * r1],
        });
    }
    sections
}
