use crate::{
    config::QrsConfig,
    detectors::{fiducial, peaks, transform},
    error::QrsResult,
    filters::BandpassFilter,
    signal::{AcceptedPeaks, FiducialMarks, IntegratedSignal, PeakCandidate, Signal},
};
use log::{debug, warn};
use serde::Serialize;
use std::borrow::Cow;

/// Every intermediate output of one detector run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineTrace {
    pub bandpassed: Signal,
    pub squared: Signal,
    pub integrated: IntegratedSignal,
    pub candidates: Vec<PeakCandidate>,
    pub accepted: AcceptedPeaks,
    /// One raw-signal index per accepted peak, before duplicates collapse.
    pub localized: Vec<usize>,
    pub marks: FiducialMarks,
}

/// Pan–Tompkins-style QRS detector.
///
/// Holds the configuration and, when built with [`QrsDetector::for_rate`], the
/// bandpass coefficients for that sampling rate so repeated calls skip the
/// filter design.
#[derive(Debug, Clone)]
pub struct QrsDetector {
    config: QrsConfig,
    filter: Option<BandpassFilter>,
}

impl Default for QrsDetector {
    fn default() -> Self {
        Self::new(QrsConfig::default())
    }
}

impl QrsDetector {
    pub fn new(config: QrsConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    /// Validate `config` for `fs` and design the bandpass up front.
    pub fn for_rate(config: QrsConfig, fs: f64) -> QrsResult<Self> {
        config.validate(fs)?;
        let filter = BandpassFilter::design(
            config.filter_order,
            config.lowcut_hz,
            config.highcut_hz,
            fs,
        )?;
        Ok(Self {
            config,
            filter: Some(filter),
        })
    }

    pub fn config(&self) -> &QrsConfig {
        &self.config
    }

    fn filter_for(&self, fs: f64) -> QrsResult<Cow<'_, BandpassFilter>> {
        let cfg = &self.config;
        match &self.filter {
            Some(f) if f.matches(cfg.filter_order, cfg.lowcut_hz, cfg.highcut_hz, fs) => {
                Ok(Cow::Borrowed(f))
            }
            _ => {
                debug!("designing bandpass for fs={fs}");
                BandpassFilter::design(cfg.filter_order, cfg.lowcut_hz, cfg.highcut_hz, fs)
                    .map(Cow::Owned)
            }
        }
    }

    /// R-wave positions in `signal`, strictly increasing.
    pub fn detect(&self, signal: &Signal) -> QrsResult<FiducialMarks> {
        Ok(self.trace(signal)?.marks)
    }

    /// Run every stage in order and keep the intermediate outputs.
    pub fn trace(&self, signal: &Signal) -> QrsResult<PipelineTrace> {
        let cfg = &self.config;
        cfg.validate(signal.fs())?;
        let filter = self.filter_for(signal.fs())?;

        let bandpassed = filter.apply(signal)?;
        let squared = transform::derivative_square(&bandpassed)?;
        let integrated = transform::moving_integrate(&squared, cfg.window_s)?;
        let candidates = peaks::find_peaks(&integrated, cfg.peak_order)?;
        debug!(
            "{} samples at {} Hz: {} candidate peaks",
            signal.len(),
            signal.fs(),
            candidates.len()
        );

        let accepted = peaks::select_above_mean(&candidates)?;
        debug!(
            "threshold {:.6e} accepted {}/{} candidates",
            accepted.threshold,
            accepted.indices.len(),
            candidates.len()
        );
        if accepted.is_empty() {
            warn!("no candidate exceeded the mean threshold; all peak amplitudes are equal");
        }

        let localized = fiducial::localize(signal, &accepted.indices, cfg.window_s)?;
        let mut indices = localized.clone();
        indices.sort_unstable();
        indices.dedup();

        Ok(PipelineTrace {
            bandpassed,
            squared,
            integrated,
            candidates,
            accepted,
            localized,
            marks: FiducialMarks::from_indices(indices),
        })
    }
}

/// Detect QRS complexes with the default parameters.
pub fn detect_qrs(signal: &Signal) -> QrsResult<FiducialMarks> {
    QrsDetector::default().detect(signal)
}
