//! Forward-backward (zero-phase) application of a section cascade.
//!
//! Both passes are explicit: the padded signal is filtered forward, reversed,
//! filtered again and reversed back. The edges are extended by odd reflection
//! and each pass starts from the steady state matching its first sample, so
//! the output carries no group delay and no start-up transient.

use super::butterworth::Section;
use crate::error::{QrsError, QrsResult, Stage};

/// Edge padding used for a cascade: three times the transfer-function length.
pub fn pad_len(sections: &[Section]) -> usize {
    3 * (2 * sections.len() + 1)
}

/// Shortest input accepted by [`filtfilt`].
pub fn min_len(sections: &[Section]) -> usize {
    pad_len(sections) + 1
}

/// Zero-phase filter `data` through `sections`.
pub fn filtfilt(sections: &[Section], data: &[f64]) -> QrsResult<Vec<f64>> {
    let required = min_len(sections);
    if data.len() < required {
        return Err(QrsError::InsufficientSamples {
            stage: Stage::Bandpass,
            required,
            actual: data.len(),
        });
    }
    let pad = pad_len(sections);
    let mut work = odd_extend(data, pad);

    let states = steady_states(sections);
    run_cascade(sections, &states, &mut work);
    work.reverse();
    run_cascade(sections, &states, &mut work);
    work.reverse();

    work.truncate(pad + data.len());
    Ok(work.split_off(pad))
}

/// Single causal pass, each section starting from `state * data[0]`.
fn run_cascade(sections: &[Section], states: &[[f64; 2]], data: &mut [f64]) {
    let x0 = data.first().copied().unwrap_or(0.0);
    for (section, state) in sections.iter().zip(states) {
        section.run(data, [state[0] * x0, state[1] * x0]);
    }
}

/// Per-section state for a unit step applied at the cascade input.
fn steady_states(sections: &[Section]) -> Vec<[f64; 2]> {
    let mut scale = 1.0;
    sections
        .iter()
        .map(|s| {
            let [s0, s1] = s.step_state();
            let state = [s0 * scale, s1 * scale];
            scale *= s.dc_gain();
            state
        })
        .collect()
}

/// Point-symmetric reflection of `pad` samples about each end.
fn odd_extend(data: &[f64], pad: usize) -> Vec<f64> {
    let n = data.len();
    let (first, last) = (data[0], data[n - 1]);
    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - data[i]));
    out.extend_from_slice(data);
    out.extend((1..=pad).map(|i| 2.0 * last - data[n - 1 - i]));
    out
}
