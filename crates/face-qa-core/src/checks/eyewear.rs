//! Eyewear checks.

use super::{require_flag, CheckId, Reading, Subject};
use crate::domain::{CheckResult, ThresholdConfig};
use crate::error::Result;

/// Eyeglasses must be confidently absent.
pub(super) fn no_eyeglasses(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let id = CheckId::NoEyeglasses;
    let flag = require_flag(subject.face.eyeglasses.as_ref(), "Eyeglasses", id)?;
    Ok(confidently_absent(id, flag, config.eyeglasses_confidence()))
}

/// Sunglasses must be confidently absent.
pub(super) fn no_sunglasses(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let id = CheckId::NoSunglasses;
    let flag = require_flag(subject.face.sunglasses.as_ref(), "Sunglasses", id)?;
    Ok(confidently_absent(id, flag, config.sunglasses_confidence()))
}

fn confidently_absent(id: CheckId, flag: Reading, min_confidence: f64) -> CheckResult {
    CheckResult::new(id, !flag.present && flag.confidence > min_confidence)
        .measure("present", flag.present)
        .measure("confidence", flag.confidence)
        .threshold(format!("absent with confidence > {min_confidence}"))
}
