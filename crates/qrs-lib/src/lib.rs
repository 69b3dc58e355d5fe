//! Classical Pan–Tompkins-style QRS detection for single-lead ECG.
//!
//! Stages run strictly forward: zero-phase bandpass, first difference and
//! squaring, centred moving sum, strict local maxima, mean threshold, and
//! localisation of each accepted peak on the raw trace.

pub mod batch;
pub mod config;
pub mod detectors;
pub mod error;
pub mod filters;
pub mod io;
pub mod metrics;
pub mod signal;
pub mod synth;

pub use config::QrsConfig;
pub use detectors::ecg::{detect_qrs, PipelineTrace, QrsDetector};
pub use error::{QrsError, QrsResult, Stage};
pub use signal::*;
