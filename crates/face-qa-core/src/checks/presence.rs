//! Face-presence gate.
//!
//! Unlike the other checks this one sees the full face list: it passes when a
//! primary (first) record exists and its detection confidence clears the
//! minimum. A failed gate ends the evaluation.

use super::{require, CheckId};
use crate::domain::{CheckResult, FaceAttributes, ThresholdConfig};
use crate::error::Result;

/// Evaluates the gate over all detected faces.
///
/// An empty list is an ordinary failure, not an error.
///
/// # Errors
///
/// Returns [`EvaluationError::MissingAttribute`](crate::EvaluationError::MissingAttribute)
/// if the primary record has no detection confidence.
pub fn evaluate(faces: &[FaceAttributes], config: &ThresholdConfig) -> Result<CheckResult> {
    let id = CheckId::FacePresence;
    let min = config.is_face_confidence();
    let threshold = format!("at least one face with confidence > {min}");

    let Some(primary) = faces.first() else {
        return Ok(CheckResult::new(id, false)
            .measure("faces", 0usize)
            .threshold(threshold));
    };

    let confidence = *require(primary.detection_confidence.as_ref(), "Confidence", id)?;

    Ok(CheckResult::new(id, confidence > min)
        .measure("faces", faces.len())
        .measure("confidence", confidence)
        .threshold(threshold))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checks::fixtures;
    use crate::domain::MeasuredValue;
    use crate::error::EvaluationError;

    fn with_confidence(confidence: f64) -> FaceAttributes {
        FaceAttributes {
            detection_confidence: Some(confidence),
            ..fixtures::face()
        }
    }

    #[test]
    fn test_no_faces_fails() {
        let result = evaluate(&[], &ThresholdConfig::default()).unwrap();
        assert!(!result.passed);
        assert_eq!(result.measurement("faces"), Some(&MeasuredValue::Integer(0)));
        assert!(result.measurement("confidence").is_none());
    }

    #[test]
    fn test_confident_face_passes() {
        let result = evaluate(&[with_confidence(99.9)], &ThresholdConfig::default()).unwrap();
        assert!(result.passed);
        assert_eq!(
            result.threshold_text,
            "at least one face with confidence > 99"
        );
    }

    #[test]
    fn test_confidence_at_minimum_fails() {
        let result = evaluate(&[with_confidence(99.0)], &ThresholdConfig::default()).unwrap();
        assert!(!result.passed);
    }

    #[test]
    fn test_only_primary_face_counts() {
        let faces = [with_confidence(50.0), with_confidence(99.9)];
        let result = evaluate(&faces, &ThresholdConfig::default()).unwrap();
        assert!(!result.passed);
        assert_eq!(result.measurement("faces"), Some(&MeasuredValue::Integer(2)));
    }

    #[test]
    fn test_missing_confidence_is_an_error() {
        let face = FaceAttributes {
            detection_confidence: None,
            ..fixtures::face()
        };
        let err = evaluate(&[face], &ThresholdConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::MissingAttribute {
                field: "Confidence".into(),
                check: CheckId::FacePresence
            }
        );
    }
}
