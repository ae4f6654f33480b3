//! Conformance check implementations.
//!
//! Checks are plain data: a [`CheckDescriptor`] pairs a [`CheckId`] with a
//! function from the subject and thresholds to a [`CheckResult`]. The
//! face-presence gate lives in [`presence`] because it works on the whole
//! face list; every other check is listed in [`CHECKS`] in execution order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{CheckResult, FaceAttributes, Flag, ImageMeta, ThresholdConfig};
use crate::error::{EvaluationError, Result};

mod capture;
mod expression;
mod eyewear;
mod framing;
mod occlusion;
pub mod presence;

/// Identifies a check. Declaration order is execution order.
#[non_exhaustive]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    /// A confident face exists (gate).
    FacePresence,
    /// Brightness and sharpness are high enough.
    Lighting,
    /// The image is in color.
    ColorMode,
    /// No eyeglasses.
    NoEyeglasses,
    /// No sunglasses.
    NoSunglasses,
    /// The face sits inside the framing bands.
    FaceCentered,
    /// The image is large enough in pixels.
    ImageDimensions,
    /// The image file is large enough in bytes.
    ImageFileSize,
    /// The head faces the camera.
    Pose,
    /// The mouth is closed.
    MouthClosed,
    /// No confident smile.
    NoSmile,
    /// No confidently closed eyes.
    EyesOpen,
    /// The subject looks into the camera.
    EyeDirection,
    /// Nothing covers the face.
    FaceNotOccluded,
}

impl CheckId {
    /// Every check, in execution order.
    pub const ALL: [Self; 14] = [
        Self::FacePresence,
        Self::Lighting,
        Self::ColorMode,
        Self::NoEyeglasses,
        Self::NoSunglasses,
        Self::FaceCentered,
        Self::ImageDimensions,
        Self::ImageFileSize,
        Self::Pose,
        Self::MouthClosed,
        Self::NoSmile,
        Self::EyesOpen,
        Self::EyeDirection,
        Self::FaceNotOccluded,
    ];

    /// 1-based position in execution order.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Stable snake_case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FacePresence => "face_presence",
            Self::Lighting => "lighting",
            Self::ColorMode => "color_mode",
            Self::NoEyeglasses => "no_eyeglasses",
            Self::NoSunglasses => "no_sunglasses",
            Self::FaceCentered => "face_centered",
            Self::ImageDimensions => "image_dimensions",
            Self::ImageFileSize => "image_file_size",
            Self::Pose => "pose",
            Self::MouthClosed => "mouth_closed",
            Self::NoSmile => "no_smile",
            Self::EyesOpen => "eyes_open",
            Self::EyeDirection => "eye_direction",
            Self::FaceNotOccluded => "face_not_occluded",
        }
    }

    /// Clause label in the photo-conformance checklist.
    #[must_use]
    pub const fn clause(self) -> &'static str {
        match self {
            Self::FacePresence => "0",
            Self::Lighting => "1a",
            Self::ColorMode => "1b",
            Self::NoEyeglasses => "2a",
            Self::NoSunglasses => "2b",
            Self::FaceCentered => "3a",
            Self::ImageDimensions => "4a",
            Self::ImageFileSize => "4b",
            Self::Pose => "5.1a",
            Self::MouthClosed => "5.2b",
            Self::NoSmile => "5.2c",
            Self::EyesOpen => "5.2d",
            Self::EyeDirection => "5.2e",
            Self::FaceNotOccluded => "6",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FacePresence => "Is a face",
            Self::Lighting => "Shadows and lighting",
            Self::ColorMode => "Color image",
            Self::NoEyeglasses => "No eyeglasses",
            Self::NoSunglasses => "No sunglasses",
            Self::FaceCentered => "Face centered",
            Self::ImageDimensions => "Image dimensions",
            Self::ImageFileSize => "Image file size",
            Self::Pose => "Pose",
            Self::MouthClosed => "Expression: mouth closed",
            Self::NoSmile => "Expression: no smile",
            Self::EyesOpen => "Expression: eyes open",
            Self::EyeDirection => "Expression: eye direction",
            Self::FaceNotOccluded => "Face not occluded",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a non-gate check can look at.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    /// Image metadata.
    pub image: &'a ImageMeta,
    /// The primary face record.
    pub face: &'a FaceAttributes,
}

type CheckFn = fn(&Subject<'_>, &ThresholdConfig) -> Result<CheckResult>;

/// A check: its identity and the function that evaluates it.
#[derive(Clone, Copy)]
pub struct CheckDescriptor {
    /// Which check this is.
    pub id: CheckId,
    run: CheckFn,
}

impl CheckDescriptor {
    const fn new(id: CheckId, run: CheckFn) -> Self {
        Self { id, run }
    }

    /// Evaluates the check.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::MissingAttribute`] if the face record lacks
    /// an attribute this check reads.
    pub fn run(&self, subject: &Subject<'_>, config: &ThresholdConfig) -> Result<CheckResult> {
        (self.run)(subject, config)
    }
}

impl fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// The checks that run after the face-presence gate, in execution order.
pub const CHECKS: &[CheckDescriptor] = &[
    CheckDescriptor::new(CheckId::Lighting, capture::lighting),
    CheckDescriptor::new(CheckId::ColorMode, capture::color_mode),
    CheckDescriptor::new(CheckId::NoEyeglasses, eyewear::no_eyeglasses),
    CheckDescriptor::new(CheckId::NoSunglasses, eyewear::no_sunglasses),
    CheckDescriptor::new(CheckId::FaceCentered, framing::face_centered),
    CheckDescriptor::new(CheckId::ImageDimensions, capture::image_dimensions),
    CheckDescriptor::new(CheckId::ImageFileSize, capture::image_file_size),
    CheckDescriptor::new(CheckId::Pose, framing::pose),
    CheckDescriptor::new(CheckId::MouthClosed, expression::mouth_closed),
    CheckDescriptor::new(CheckId::NoSmile, expression::no_smile),
    CheckDescriptor::new(CheckId::EyesOpen, expression::eyes_open),
    CheckDescriptor::new(CheckId::EyeDirection, expression::eye_direction),
    CheckDescriptor::new(CheckId::FaceNotOccluded, occlusion::face_not_occluded),
];

/// Unwraps an optional attribute group or reports it missing for `check`.
fn require<'a, T>(value: Option<&'a T>, field: &str, check: CheckId) -> Result<&'a T> {
    value.ok_or_else(|| EvaluationError::MissingAttribute {
        field: field.to_owned(),
        check,
    })
}

/// Unwraps one value inside an attribute group, reported as `group.leaf`.
fn require_value<T>(value: Option<T>, group: &str, leaf: &str, check: CheckId) -> Result<T> {
    value.ok_or_else(|| EvaluationError::MissingAttribute {
        field: format!("{group}.{leaf}"),
        check,
    })
}

/// A provider classification with both parts present.
#[derive(Debug, Clone, Copy)]
struct Reading {
    present: bool,
    confidence: f64,
}

fn require_flag(flag: Option<&Flag>, group: &str, check: CheckId) -> Result<Reading> {
    let flag = require(flag, group, check)?;
    Ok(Reading {
        present: require_value(flag.present, group, "Value", check)?,
        confidence: require_value(flag.confidence, group, "Confidence", check)?,
    })
}

/// Compliant subject shared by the per-check unit tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{
        BoundingBox, ColorMode, EyeDirection, FaceAttributes, Flag, ImageMeta, Pose, Quality,
    };

    pub fn face() -> FaceAttributes {
        FaceAttributes {
            detection_confidence: Some(99.9),
            quality: Some(Quality::new(80.0, 80.0)),
            bounding_box: Some(BoundingBox::new(0.30, 0.15, 0.35, 0.55)),
            eyeglasses: Some(Flag::new(false, 90.0)),
            sunglasses: Some(Flag::new(false, 90.0)),
            pose: Some(Pose::new(0.0, 0.0, 0.0)),
            mouth_open: Some(Flag::new(false, 90.0)),
            smile: Some(Flag::new(false, 90.0)),
            eyes_open: Some(Flag::new(true, 95.0)),
            eye_direction: Some(EyeDirection::new(0.0, 0.0, 95.0)),
            face_occluded: Some(Flag::new(false, 95.0)),
        }
    }

    pub fn image() -> ImageMeta {
        ImageMeta::new(100_000, 800, 800, ColorMode::Rgb)
    }
}
