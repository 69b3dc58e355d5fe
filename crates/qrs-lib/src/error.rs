use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Pipeline stage that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Input,
    Bandpass,
    DerivativeSquare,
    Integrate,
    PeakFind,
    Threshold,
    Localize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Bandpass => "bandpass",
            Stage::DerivativeSquare => "derivative-square",
            Stage::Integrate => "integrate",
            Stage::PeakFind => "peak-find",
            Stage::Threshold => "threshold",
            Stage::Localize => "localize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QrsError {
    #[error("{stage}: need at least {required} samples, got {actual}")]
    InsufficientSamples {
        stage: Stage,
        required: usize,
        actual: usize,
    },
    #[error("{stage}: no candidate peaks detected")]
    NoCandidatePeaks { stage: Stage },
    #[error("{stage}: invalid {name} ({value})")]
    InvalidParameter {
        stage: Stage,
        name: &'static str,
        value: f64,
    },
    #[error("input: sample {index} is not finite")]
    NonFiniteSample { index: usize },
}

impl QrsError {
    /// Stage the failure originated from.
    pub fn stage(&self) -> Stage {
        match self {
            QrsError::InsufficientSamples { stage, .. }
            | QrsError::NoCandidatePeaks { stage }
            | QrsError::InvalidParameter { stage, .. } => *stage,
            QrsError::NonFiniteSample { .. } => Stage::Input,
        }
    }

    pub(crate) fn invalid(stage: Stage, name: &'static str, value: f64) -> Self {
        QrsError::InvalidParameter { stage, name, value }
    }
}

pub type QrsResult<T> = Result<T, QrsError>;
