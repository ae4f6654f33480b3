//! Framing checks: face position and head pose.

use super::{require, require_value, CheckId, Subject};
use crate::domain::{CheckResult, ThresholdConfig};
use crate::error::Result;

/// Each bounding-box edge must fall strictly inside its band.
pub(super) fn face_centered(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let id = CheckId::FaceCentered;
    let bbox = require(subject.face.bounding_box.as_ref(), "BoundingBox", id)?;
    let left = require_value(bbox.left, "BoundingBox", "Left", id)?;
    let top = require_value(bbox.top, "BoundingBox", "Top", id)?;
    let width = require_value(bbox.width, "BoundingBox", "Width", id)?;
    let height = require_value(bbox.height, "BoundingBox", "Height", id)?;

    let (right, bottom) = (left + width, top + height);
    let edges = [
        ("left", left, config.face_left()),
        ("right", right, config.face_right()),
        ("top", top, config.face_top()),
        ("bottom", bottom, config.face_bottom()),
    ];

    let passed = edges.iter().all(|(_, value, band)| band.contains(*value));
    let threshold = edges
        .iter()
        .map(|(label, _, band)| format!("{} < {label} < {}", band.lo, band.hi))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(CheckResult::new(id, passed)
        .measure("left", left)
        .measure("right", right)
        .measure("top", top)
        .measure("bottom", bottom)
        .threshold(threshold))
}

/// Roll, yaw and pitch must all stay strictly below the maximum angle.
pub(super) fn pose(subject: &Subject<'_>, config: &ThresholdConfig) -> Result<CheckResult> {
    let id = CheckId::Pose;
    let pose = require(subject.face.pose.as_ref(), "Pose", id)?;
    let roll = require_value(pose.roll, "Pose", "Roll", id)?;
    let yaw = require_value(pose.yaw, "Pose", "Yaw", id)?;
    let pitch = require_value(pose.pitch, "Pose", "Pitch", id)?;
    let max = config.pose_max_angle();

    let passed = roll.abs() < max && yaw.abs() < max && pitch.abs() < max;

    Ok(CheckResult::new(id, passed)
        .measure("roll", roll)
        .measure("yaw", yaw)
        .measure("pitch", pitch)
        .threshold(format!("|roll|, |yaw|, |pitch| < {max}")))
}
