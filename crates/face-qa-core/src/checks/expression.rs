//! Neutral-expression checks.
//!
//! The mouth check wants a confident "closed". Smile and eyes are framed the
//! other way round: they fail only when the undesired state is asserted with
//! confidence, so a low-confidence smile or closed-eyes reading still passes.

use super::{require, require_flag, require_value, CheckId, Reading, Subject};
use crate::domain::{CheckResult, ThresholdConfig};
use crate::error::Result;

/// The mouth must be confidently closed.
pub(super) fn mouth_closed(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let id = CheckId::MouthClosed;
    let flag = require_flag(subject.face.mouth_open.as_ref(), "MouthOpen", id)?;
    let min = config.mouth_open_confidence();

    Ok(with_flag(
        CheckResult::new(id, !flag.present && flag.confidence > min),
        flag,
    )
    .threshold(format!("closed with confidence > {min}")))
}

/// Fails only on a smile asserted with confidence above the threshold.
pub(super) fn no_smile(subject: &Subject<'_>, config: &ThresholdConfig) -> Result<CheckResult> {
    let id = CheckId::NoSmile;
    let flag = require_flag(subject.face.smile.as_ref(), "Smile", id)?;
    let limit = config.smile_confidence();

    let confident_smile = flag.present && flag.confidence > limit;

    Ok(with_flag(CheckResult::new(id, !confident_smile), flag)
        .threshold(format!("fails on smile with confidence > {limit}")))
}

/// Fails only on closed eyes asserted with confidence above the threshold.
pub(super) fn eyes_open(subject: &Subject<'_>, config: &ThresholdConfig) -> Result<CheckResult> {
    let id = CheckId::EyesOpen;
    let flag = require_flag(subject.face.eyes_open.as_ref(), "EyesOpen", id)?;
    let limit = config.eyes_open_confidence();

    let confidently_closed = !flag.present && flag.confidence > limit;

    Ok(with_flag(CheckResult::new(id, !confidently_closed), flag)
        .threshold(format!("fails on closed eyes with confidence > {limit}")))
}

/// Gaze must be confident and within the maximum yaw and pitch.
pub(super) fn eye_direction(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let id = CheckId::EyeDirection;
    let gaze = require(subject.face.eye_direction.as_ref(), "EyeDirection", id)?;
    let confidence = require_value(gaze.confidence, "EyeDirection", "Confidence", id)?;
    let yaw = require_value(gaze.yaw, "EyeDirection", "Yaw", id)?;
    let pitch = require_value(gaze.pitch, "EyeDirection", "Pitch", id)?;
    let min_conf = config.eye_direction_confidence();
    let max_angle = config.eye_direction_max_angle();

    let passed = confidence > min_conf && yaw.abs() < max_angle && pitch.abs() < max_angle;

    Ok(CheckResult::new(id, passed)
        .measure("confidence", confidence)
        .measure("yaw", yaw)
        .measure("pitch", pitch)
        .threshold(format!(
            "confidence > {min_conf}, |yaw|, |pitch| < {max_angle}"
        )))
}

fn with_flag(result: CheckResult, flag: Reading) -> CheckResult {
    result
        .measure("present", flag.present)
        .measure("confidence", flag.confidence)
}
