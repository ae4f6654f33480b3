//! Face occlusion check.

use super::{require_flag, CheckId, Subject};
use crate::domain::{CheckResult, ThresholdConfig};
use crate::error::Result;

/// The face must be confidently unobstructed.
pub(super) fn face_not_occluded(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let id = CheckId::FaceNotOccluded;
    let flag = require_flag(subject.face.face_occluded.as_ref(), "FaceOccluded", id)?;
    let min = config.face_occluded_confidence();

    Ok(
        CheckResult::new(id, !flag.present && flag.confidence > min)
            .measure("present", flag.present)
            .measure("confidence", flag.confidence)
            .threshold(format!("not occluded with confidence > {min}")),
    )
}
