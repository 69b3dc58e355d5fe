//! Parallel detection over independent recordings.
//!
//! Each recording runs the full pipeline on its own rayon task. Nothing is
//! shared between tasks except the read-only detector, so one failing
//! recording never affects the others.

use crate::{
    detectors::ecg::QrsDetector,
    error::{QrsError, Stage},
    signal::{FiducialMarks, Signal},
};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Recording {
    pub id: String,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Detected {
        id: String,
        marks: FiducialMarks,
    },
    Failed {
        id: String,
        stage: Stage,
        error: String,
    },
}

impl BatchOutcome {
    fn from_result(id: &str, result: Result<FiducialMarks, QrsError>) -> Self {
        match result {
            Ok(marks) => BatchOutcome::Detected {
                id: id.to_string(),
                marks,
            },
            Err(err) => BatchOutcome::Failed {
                id: id.to_string(),
                stage: err.stage(),
                error: err.to_string(),
            },
        }
    }

    pub fn id(&self) -> &str {
        match self {
            BatchOutcome::Detected { id, .. } | BatchOutcome::Failed { id, .. } => id,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, BatchOutcome::Detected { .. })
    }
}

/// Detect every recording in parallel; outcomes keep the input order.
pub fn detect_batch(detector: &QrsDetector, recordings: &[Recording]) -> Vec<BatchOutcome> {
    recordings
        .par_iter()
        .map(|rec| BatchOutcome::from_result(&rec.id, detector.detect(&rec.signal)))
        .collect()
}
