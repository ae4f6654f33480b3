//! The evaluation entry point.

use tracing::debug;

use crate::checks::{presence, Subject, CHECKS};
use crate::domain::{EvaluationReport, FaceAttributes, ImageMeta, ThresholdConfig};
use crate::error::Result;

/// Runs every check against the primary face and aggregates the verdict.
///
/// The face-presence gate runs first; if it fails the report holds only that
/// result. Otherwise all remaining checks run in their fixed order, even after
/// one of them fails, and `overall_pass` is the conjunction of every result.
///
/// The function is pure: equal inputs always yield an equal report.
///
/// # Errors
///
/// Returns [`EvaluationError::MissingAttribute`](crate::EvaluationError::MissingAttribute)
/// if the primary face record lacks an attribute a check reads.
pub fn evaluate(
    image: &ImageMeta,
    faces: &[FaceAttributes],
    config: &ThresholdConfig,
) -> Result<EvaluationReport> {
    let gate = presence::evaluate(faces, config)?;
    let face_count = faces.len();

    let face = match faces.first() {
        Some(face) if gate.passed => face,
        _ => {
            debug!(faces = face_count, "Face presence gate failed");
            return Ok(EvaluationReport {
                checks: vec![gate],
                overall_pass: false,
                face_detected: false,
                face_count,
            });
        }
    };

    let subject = Subject { image, face };
    let mut checks = Vec::with_capacity(CHECKS.len() + 1);
    checks.push(gate);

    for descriptor in CHECKS {
        let result = descriptor.run(&subject, config)?;
        debug!(check = %descriptor.id, passed = result.passed, "Check evaluated");
        checks.push(result);
    }

    let overall_pass = checks.iter().all(|c| c.passed);

    Ok(EvaluationReport {
        checks,
        overall_pass,
        face_detected: true,
        face_count,
    })
}

/// An evaluator bound to one threshold snapshot.
///
/// Holds no mutable state, so it can be shared across threads and used for
/// any number of independent evaluations.
#[derive(Debug, Clone, Default)]
pub struct QualityEvaluator {
    config: ThresholdConfig,
}

impl QualityEvaluator {
    /// Creates an evaluator using the given thresholds.
    #[must_use]
    pub const fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    /// Returns the thresholds this evaluator applies.
    #[must_use]
    pub const fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Evaluates one image's faces. See [`evaluate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the primary face record is incomplete.
    pub fn evaluate(&self, image: &ImageMeta, faces: &[FaceAttributes]) -> Result<EvaluationReport> {
        evaluate(image, faces, &self.config)
    }
}
