//! Map energy peaks back onto the raw trace.
//!
//! The integrated signal is offset from the raw waveform by the filter, the
//! forward difference and the moving sum, so each accepted peak is only a
//! neighbourhood hint. The R-wave is taken to be the largest sample of the
//! unfiltered signal within `±w` of that hint. This assumes an upright QRS:
//! leads or beats where the dominant deflection points downward will be
//! localised onto some other wave.

use crate::error::{QrsError, QrsResult, Stage};
use crate::signal::{window_samples, Signal};

/// Clipped inclusive search window `[p - w, p + w]` within `0..len`.
pub fn search_window(peak: usize, radius: usize, len: usize) -> (usize, usize) {
    let lo = peak.saturating_sub(radius);
    let hi = peak.saturating_add(radius).min(len.saturating_sub(1));
    (lo, hi)
}

/// Localise each accepted peak onto the raw signal; one mark per peak, in order.
pub fn localize(raw: &Signal, peaks: &[usize], window_s: f64) -> QrsResult<Vec<usize>> {
    let radius = window_samples(raw.fs(), window_s);
    if radius == 0 {
        return Err(QrsError::invalid(Stage::Localize, "search window", window_s));
    }
    let data = raw.samples();
    if data.is_empty() {
        return Err(QrsError::InsufficientSamples {
            stage: Stage::Localize,
            required: 1,
            actual: 0,
        });
    }
    let marks = peaks
        .iter()
        .map(|&p| {
            let (lo, hi) = search_window(p, radius, data.len());
            argmax(&data[lo..=hi]) + lo
        })
        .collect();
    Ok(marks)
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
