use crate::error::{QrsError, QrsResult, Stage};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of the QRS detection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrsConfig {
    /// Lower bandpass cutoff (Hz).
    pub lowcut_hz: f64,
    /// Upper bandpass cutoff (Hz).
    pub highcut_hz: f64,
    /// Butterworth prototype order.
    pub filter_order: usize,
    /// Moving-sum window and fiducial search radius (seconds).
    pub window_s: f64,
    /// Neighbourhood radius of the local-maximum test (samples).
    pub peak_order: usize,
}

impl Default for QrsConfig {
    fn default() -> Self {
        Self {
            lowcut_hz: 5.0,
            highcut_hz: 15.0,
            filter_order: 3,
            window_s: 0.150,
            peak_order: 10,
        }
    }
}

impl QrsConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: QrsConfig = toml::from_str(text).context("parsing detector config")?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Check every parameter against the sampling rate before any computation.
    pub fn validate(&self, fs: f64) -> QrsResult<()> {
        crate::signal::validate_fs(fs, Stage::Input)?;
        if self.filter_order == 0 {
            return Err(QrsError::invalid(Stage::Bandpass, "filter order", 0.0));
        }
        let nyquist = fs * 0.5;
        if !(self.lowcut_hz > 0.0 && self.lowcut_hz < nyquist) {
            return Err(QrsError::invalid(
                Stage::Bandpass,
                "low cutoff",
                self.lowcut_hz,
            ));
        }
        if !(self.highcut_hz > self.lowcut_hz && self.highcut_hz < nyquist) {
            return Err(QrsError::invalid(
                Stage::Bandpass,
                "high cutoff",
                self.highcut_hz,
            ));
        }
        if crate::signal::window_samples(fs, self.window_s) == 0 {
            return Err(QrsError::invalid(Stage::Integrate, "window", self.window_s));
        }
        if self.peak_order == 0 {
            return Err(QrsError::invalid(Stage::PeakFind, "order", 0.0));
        }
        Ok(())
    }
}
