//! Derivative-squaring and moving-window integration stages.

use crate::error::{QrsError, QrsResult, Stage};
use crate::signal::{window_samples, IntegratedSignal, Signal};

/// First difference followed by elementwise squaring.
///
/// `out[i] = (x[i + 1] - x[i])^2`; the output is one sample shorter than the input.
pub fn derivative_square(signal: &Signal) -> QrsResult<Signal> {
    let data = signal.samples();
    if data.len() < 2 {
        return Err(QrsError::InsufficientSamples {
            stage: Stage::DerivativeSquare,
            required: 2,
            actual: data.len(),
        });
    }
    let out = data
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            d * d
        })
        .collect();
    Ok(Signal::derived(signal.fs(), out))
}

/// Left and right extents of a centred window of `width` samples.
///
/// Odd widths are symmetric; even widths reach one sample further left.
pub fn window_radii(width: usize) -> (usize, usize) {
    let right = width.saturating_sub(1) / 2;
    (width.saturating_sub(1) - right, right)
}

/// Centred moving sum over `window_s` seconds.
///
/// Samples closer to either edge than the window radius have no complete
/// window and come out as `None`.
pub fn moving_integrate(signal: &Signal, window_s: f64) -> QrsResult<IntegratedSignal> {
    let width = window_samples(signal.fs(), window_s);
    if width == 0 {
        return Err(QrsError::invalid(Stage::Integrate, "window", window_s));
    }
    let data = signal.samples();
    if data.len() < width {
        return Err(QrsError::InsufficientSamples {
            stage: Stage::Integrate,
            required: width,
            actual: data.len(),
        });
    }
    let (left, right) = window_radii(width);
    let samples = (0..data.len())
        .map(|i| {
            if i < left || i + right >= data.len() {
                None
            } else {
                Some(data[i - left..=i + right].iter().sum())
            }
        })
        .collect();
    Ok(IntegratedSignal {
        fs: signal.fs(),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(fs: f64, data: Vec<f64>) -> Signal {
        Signal::new(fs, data).unwrap()
    }

    #[test]
    fn derivative_square_drops_one_sample() {
        for n in [2usize, 3, 10, 257] {
            let data: Vec<f64> = (0..n).map(|i| (i as f64 * 0.3).sin()).collect();
            let out = derivative_square(&sig(100.0, data)).unwrap();
            assert_eq!(out.len(), n - 1);
        }
    }

    #[test]
    fn derivative_square_values() {
        let out = derivative_square(&sig(10.0, vec![1.0, 3.0, 2.0, 2.0, -1.0])).unwrap();
        assert_eq!(out.samples(), &[4.0, 1.0, 0.0, 9.0]);
        assert!(out.samples().iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn derivative_square_needs_two_samples() {
        let err = derivative_square(&sig(10.0, vec![1.0])).unwrap_err();
        assert_eq!(err.stage(), Stage::DerivativeSquare);
    }

    #[test]
    fn radii_cover_the_window() {
        assert_eq!(window_radii(45), (22, 22));
        assert_eq!(window_radii(54), (27, 26));
        assert_eq!(window_radii(1), (0, 0));
        for w in 1..40 {
            let (l, r) = window_radii(w);
            assert_eq!(l + r + 1, w);
        }
    }

    #[test]
    fn integrator_marks_incomplete_edges() {
        // 0.5 s at 10 Hz -> 5 sample window, radius 2 on each side.
        let data: Vec<f64> = (1..=8).map(f64::from).collect();
        let out = moving_integrate(&sig(10.0, data), 0.5).unwrap();
        assert_eq!(out.len(), 8);
        assert_eq!(
            out.samples,
            vec![
                None,
                None,
                Some(15.0),
                Some(20.0),
                Some(25.0),
                Some(30.0),
                None,
                None
            ]
        );
    }

    #[test]
    fn integrator_even_window_leans_left() {
        let data = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        // 0.4 s at 10 Hz -> 4 samples: two left, one right.
        let out = moving_integrate(&sig(10.0, data), 0.4).unwrap();
        assert_eq!(
            out.samples,
            vec![None, None, Some(1.0), Some(0.0), Some(0.0), None]
        );
    }

    #[test]
    fn integrator_rejects_short_input_and_zero_window() {
        let err = moving_integrate(&sig(10.0, vec![1.0; 3]), 0.5).unwrap_err();
        assert_eq!(
            err,
            QrsError::InsufficientSamples {
                stage: Stage::Integrate,
                required: 5,
                actual: 3
            }
        );
        let err = moving_integrate(&sig(10.0, vec![1.0; 30]), 0.01).unwrap_err();
        assert!(matches!(err, QrsError::InvalidParameter { .. }));
    }
}
