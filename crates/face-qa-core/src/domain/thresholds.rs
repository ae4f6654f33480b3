//! Tunable acceptance thresholds.
//!
//! A [`ThresholdConfig`] is an immutable value: overrides go through
//! [`ThresholdConfigBuilder`] and are validated once, in [`ThresholdConfigBuilder::build`].
//! Band ordering (`lo <= hi`) is not validated; an inverted band makes the
//! face-centered check fail every record.

use std::fmt;
use std::str::FromStr;

use crate::error::{EvaluationError, Result};

/// Hardcoded default values for thresholds.
mod defaults {
    pub const IS_FACE_CONFIDENCE: f64 = 99.0;
    pub const MIN_BRIGHTNESS: f64 = 70.0;
    pub const MIN_SHARPNESS: f64 = 70.0;
    pub const EYEGLASSES_CONFIDENCE: f64 = 80.0;
    pub const SUNGLASSES_CONFIDENCE: f64 = 80.0;
    pub const FACE_LEFT: (f64, f64) = (0.20, 0.40);
    pub const FACE_RIGHT: (f64, f64) = (0.60, 0.80);
    pub const FACE_TOP: (f64, f64) = (0.10, 0.25);
    pub const FACE_BOTTOM: (f64, f64) = (0.60, 0.85);
    pub const MIN_IMAGE_DIM_PIXELS: u32 = 600;
    pub const MIN_IMAGE_SIZE_BYTES: u64 = 54 * 1024;
    pub const POSE_MAX_ANGLE: f64 = 12.0;
    pub const MOUTH_OPEN_CONFIDENCE: f64 = 80.0;
    pub const SMILE_CONFIDENCE: f64 = 70.0;
    pub const EYES_OPEN_CONFIDENCE: f64 = 95.0;
    pub const EYE_DIRECTION_CONFIDENCE: f64 = 90.0;
    pub const EYE_DIRECTION_MAX_ANGLE: f64 = 10.0;
    pub const FACE_OCCLUDED_CONFIDENCE: f64 = 90.0;
}

/// An open interval `(lo, hi)` on one bounding-box edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Exclusive lower bound.
    pub lo: f64,
    /// Exclusive upper bound.
    pub hi: f64,
}

impl Band {
    /// Creates a band.
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Returns true if `lo < value < hi`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lo < value && value < self.hi
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}

/// Names of every tunable threshold, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThresholdParam {
    /// Minimum detection confidence for the face-presence gate.
    IsFaceConfidence,
    /// Minimum brightness.
    MinBrightness,
    /// Minimum sharpness.
    MinSharpness,
    /// Minimum confidence that no eyeglasses are worn.
    EyeglassesConfidence,
    /// Minimum confidence that no sunglasses are worn.
    SunglassesConfidence,
    /// Lower bound of the left edge.
    FaceLeftLo,
    /// Upper bound of the left edge.
    FaceLeftHi,
    /// Lower bound of the right edge.
    FaceRightLo,
    /// Upper bound of the right edge.
    FaceRightHi,
    /// Lower bound of the top edge.
    FaceTopLo,
    /// Upper bound of the top edge.
    FaceTopHi,
    /// Lower bound of the bottom edge.
    FaceBottomLo,
    /// Upper bound of the bottom edge.
    FaceBottomHi,
    /// Minimum width and height in pixels.
    MinImageDimPixels,
    /// Minimum file size in bytes.
    MinImageSizeBytes,
    /// Maximum absolute roll, yaw and pitch.
    PoseMaxAngle,
    /// Minimum confidence that the mouth is closed.
    MouthOpenConfidence,
    /// Confidence above which an asserted smile fails.
    SmileConfidence,
    /// Confidence above which asserted closed eyes fail.
    EyesOpenConfidence,
    /// Minimum eye-direction confidence.
    EyeDirectionConfidence,
    /// Maximum absolute gaze yaw and pitch.
    EyeDirectionMaxAngle,
    /// Minimum confidence that the face is not occluded.
    FaceOccludedConfidence,
}

impl ThresholdParam {
    /// Every parameter, in presentation order.
    pub const ALL: [Self; 22] = [
        Self::IsFaceConfidence,
        Self::MinBrightness,
        Self::MinSharpness,
        Self::EyeglassesConfidence,
        Self::SunglassesConfidence,
        Self::FaceLeftLo,
        Self::FaceLeftHi,
        Self::FaceRightLo,
        Self::FaceRightHi,
        Self::FaceTopLo,
        Self::FaceTopHi,
        Self::FaceBottomLo,
        Self::FaceBottomHi,
        Self::MinImageDimPixels,
        Self::MinImageSizeBytes,
        Self::PoseMaxAngle,
        Self::MouthOpenConfidence,
        Self::SmileConfidence,
        Self::EyesOpenConfidence,
        Self::EyeDirectionConfidence,
        Self::EyeDirectionMaxAngle,
        Self::FaceOccludedConfidence,
    ];

    /// Stable name used in config files and `--set` overrides.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IsFaceConfidence => "is_face_conf",
            Self::MinBrightness => "min_brightness",
            Self::MinSharpness => "min_sharpness",
            Self::EyeglassesConfidence => "conf_eyeglasses",
            Self::SunglassesConfidence => "conf_sunglasses",
            Self::FaceLeftLo => "facepos_left_lo",
            Self::FaceLeftHi => "facepos_left_hi",
            Self::FaceRightLo => "facepos_right_lo",
            Self::FaceRightHi => "facepos_right_hi",
            Self::FaceTopLo => "facepos_top_lo",
            Self::FaceTopHi => "facepos_top_hi",
            Self::FaceBottomLo => "facepos_bottom_lo",
            Self::FaceBottomHi => "facepos_bottom_hi",
            Self::MinImageDimPixels => "min_image_dim_pixels",
            Self::MinImageSizeBytes => "min_image_size",
            Self::PoseMaxAngle => "pose_max_pitchrollyaw",
            Self::MouthOpenConfidence => "conf_mouth_open",
            Self::SmileConfidence => "conf_smile",
            Self::EyesOpenConfidence => "conf_eyes_open",
            Self::EyeDirectionConfidence => "conf_eye_direction",
            Self::EyeDirectionMaxAngle => "eye_dir_max_pitchyaw",
            Self::FaceOccludedConfidence => "conf_face_occluded",
        }
    }

    /// Whether the parameter only accepts non-negative whole numbers.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::MinImageDimPixels | Self::MinImageSizeBytes)
    }
}

impl fmt::Display for ThresholdParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThresholdParam {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| EvaluationError::UnknownParameter(s.to_string()))
    }
}

/// Acceptance thresholds for one evaluation.
///
/// Construct with [`ThresholdConfig::default`] or [`ThresholdConfig::builder`].
/// Fields are read through accessors and [`ThresholdConfig::get`]; there is no
/// way to mutate a built config.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdConfig {
    is_face_confidence: f64,
    min_brightness: f64,
    min_sharpness: f64,
    eyeglasses_confidence: f64,
    sunglasses_confidence: f64,
    face_left: Band,
    face_right: Band,
    face_top: Band,
    face_bottom: Band,
    min_image_dim_pixels: u32,
    min_image_size_bytes: u64,
    pose_max_angle: f64,
    mouth_open_confidence: f64,
    smile_confidence: f64,
    eyes_open_confidence: f64,
    eye_direction_confidence: f64,
    eye_direction_max_angle: f64,
    face_occluded_confidence: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            is_face_confidence: defaults::IS_FACE_CONFIDENCE,
            min_brightness: defaults::MIN_BRIGHTNESS,
            min_sharpness: defaults::MIN_SHARPNESS,
            eyeglasses_confidence: defaults::EYEGLASSES_CONFIDENCE,
            sunglasses_confidence: defaults::SUNGLASSES_CONFIDENCE,
            face_left: Band::new(defaults::FACE_LEFT.0, defaults::FACE_LEFT.1),
            face_right: Band::new(defaults::FACE_RIGHT.0, defaults::FACE_RIGHT.1),
            face_top: Band::new(defaults::FACE_TOP.0, defaults::FACE_TOP.1),
            face_bottom: Band::new(defaults::FACE_BOTTOM.0, defaults::FACE_BOTTOM.1),
            min_image_dim_pixels: defaults::MIN_IMAGE_DIM_PIXELS,
            min_image_size_bytes: defaults::MIN_IMAGE_SIZE_BYTES,
            pose_max_angle: defaults::POSE_MAX_ANGLE,
            mouth_open_confidence: defaults::MOUTH_OPEN_CONFIDENCE,
            smile_confidence: defaults::SMILE_CONFIDENCE,
            eyes_open_confidence: defaults::EYES_OPEN_CONFIDENCE,
            eye_direction_confidence: defaults::EYE_DIRECTION_CONFIDENCE,
            eye_direction_max_angle: defaults::EYE_DIRECTION_MAX_ANGLE,
            face_occluded_confidence: defaults::FACE_OCCLUDED_CONFIDENCE,
        }
    }
}

impl ThresholdConfig {
    /// Starts a builder seeded with the default thresholds.
    #[must_use]
    pub fn builder() -> ThresholdConfigBuilder {
        ThresholdConfigBuilder::default()
    }

    /// Starts a builder seeded with this config's values.
    #[must_use]
    pub fn to_builder(&self) -> ThresholdConfigBuilder {
        ThresholdConfigBuilder {
            base: self.clone(),
            overrides: Vec::new(),
        }
    }

    /// Reads any parameter as a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, param: ThresholdParam) -> f64 {
        match param {
            ThresholdParam::IsFaceConfidence => self.is_face_confidence,
            ThresholdParam::MinBrightness => self.min_brightness,
            ThresholdParam::MinSharpness => self.min_sharpness,
            ThresholdParam::EyeglassesConfidence => self.eyeglasses_confidence,
            ThresholdParam::SunglassesConfidence => self.sunglasses_confidence,
            ThresholdParam::FaceLeftLo => self.face_left.lo,
            ThresholdParam::FaceLeftHi => self.face_left.hi,
            ThresholdParam::FaceRightLo => self.face_right.lo,
            ThresholdParam::FaceRightHi => self.face_right.hi,
            ThresholdParam::FaceTopLo => self.face_top.lo,
            ThresholdParam::FaceTopHi => self.face_top.hi,
            ThresholdParam::FaceBottomLo => self.face_bottom.lo,
            ThresholdParam::FaceBottomHi => self.face_bottom.hi,
            ThresholdParam::MinImageDimPixels => f64::from(self.min_image_dim_pixels),
            ThresholdParam::MinImageSizeBytes => self.min_image_size_bytes as f64,
            ThresholdParam::PoseMaxAngle => self.pose_max_angle,
            ThresholdParam::MouthOpenConfidence => self.mouth_open_confidence,
            ThresholdParam::SmileConfidence => self.smile_confidence,
            ThresholdParam::EyesOpenConfidence => self.eyes_open_confidence,
            ThresholdParam::EyeDirectionConfidence => self.eye_direction_confidence,
            ThresholdParam::EyeDirectionMaxAngle => self.eye_direction_max_angle,
            ThresholdParam::FaceOccludedConfidence => self.face_occluded_confidence,
        }
    }

    /// All parameters with their current values, in presentation order.
    pub fn entries(&self) -> impl Iterator<Item = (ThresholdParam, f64)> + '_ {
        ThresholdParam::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    /// Minimum detection confidence for the face-presence gate.
    #[must_use]
    pub const fn is_face_confidence(&self) -> f64 {
        self.is_face_confidence
    }

    /// Minimum brightness.
    #[must_use]
    pub const fn min_brightness(&self) -> f64 {
        self.min_brightness
    }

    /// Minimum sharpness.
    #[must_use]
    pub const fn min_sharpness(&self) -> f64 {
        self.min_sharpness
    }

    /// Minimum confidence that no eyeglasses are worn.
    #[must_use]
    pub const fn eyeglasses_confidence(&self) -> f64 {
        self.eyeglasses_confidence
    }

    /// Minimum confidence that no sunglasses are worn.
    #[must_use]
    pub const fn sunglasses_confidence(&self) -> f64 {
        self.sunglasses_confidence
    }

    /// Allowed band for the left edge.
    #[must_use]
    pub const fn face_left(&self) -> Band {
        self.face_left
    }

    /// Allowed band for the right edge.
    #[must_use]
    pub const fn face_right(&self) -> Band {
        self.face_right
    }

    /// Allowed band for the top edge.
    #[must_use]
    pub const fn face_top(&self) -> Band {
        self.face_top
    }

    /// Allowed band for the bottom edge.
    #[must_use]
    pub const fn face_bottom(&self) -> Band {
        self.face_bottom
    }

    /// Minimum width and height in pixels.
    #[must_use]
    pub const fn min_image_dim_pixels(&self) -> u32 {
        self.min_image_dim_pixels
    }

    /// Minimum file size in bytes.
    #[must_use]
    pub const fn min_image_size_bytes(&self) -> u64 {
        self.min_image_size_bytes
    }

    /// Maximum absolute head angle.
    #[must_use]
    pub const fn pose_max_angle(&self) -> f64 {
        self.pose_max_angle
    }

    /// Minimum confidence that the mouth is closed.
    #[must_use]
    pub const fn mouth_open_confidence(&self) -> f64 {
        self.mouth_open_confidence
    }

    /// Confidence above which an asserted smile fails.
    #[must_use]
    pub const fn smile_confidence(&self) -> f64 {
        self.smile_confidence
    }

    /// Confidence above which asserted closed eyes fail.
    #[must_use]
    pub const fn eyes_open_confidence(&self) -> f64 {
        self.eyes_open_confidence
    }

    /// Minimum eye-direction confidence.
    #[must_use]
    pub const fn eye_direction_confidence(&self) -> f64 {
        self.eye_direction_confidence
    }

    /// Maximum absolute gaze angle.
    #[must_use]
    pub const fn eye_direction_max_angle(&self) -> f64 {
        self.eye_direction_max_angle
    }

    /// Minimum confidence that the face is not occluded.
    #[must_use]
    pub const fn face_occluded_confidence(&self) -> f64 {
        self.face_occluded_confidence
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn apply(&mut self, param: ThresholdParam, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(invalid(param, format!("{value} is not a finite number")));
        }
        if param.is_integral() && (value < 0.0 || value.fract() != 0.0) {
            return Err(invalid(
                param,
                format!("{value} is not a non-negative whole number"),
            ));
        }

        match param {
            ThresholdParam::IsFaceConfidence => self.is_face_confidence = value,
            ThresholdParam::MinBrightness => self.min_brightness = value,
            ThresholdParam::MinSharpness => self.min_sharpness = value,
            ThresholdParam::EyeglassesConfidence => self.eyeglasses_confidence = value,
            ThresholdParam::SunglassesConfidence => self.sunglasses_confidence = value,
            ThresholdParam::FaceLeftLo => self.face_left.lo = value,
            ThresholdParam::FaceLeftHi => self.face_left.hi = value,
            ThresholdParam::FaceRightLo => self.face_right.lo = value,
            ThresholdParam::FaceRightHi => self.face_right.hi = value,
            ThresholdParam::FaceTopLo => self.face_top.lo = value,
            ThresholdParam::FaceTopHi => self.face_top.hi = value,
            ThresholdParam::FaceBottomLo => self.face_bottom.lo = value,
            ThresholdParam::FaceBottomHi => self.face_bottom.hi = value,
            ThresholdParam::MinImageDimPixels => {
                if value > f64::from(u32::MAX) {
                    return Err(invalid(param, format!("{value} exceeds {}", u32::MAX)));
                }
                self.min_image_dim_pixels = value as u32;
            }
            ThresholdParam::MinImageSizeBytes => {
                // u64::MAX rounds up to 2^64 as f64, the first value that does not fit
                if value >= u64::MAX as f64 {
                    return Err(invalid(param, format!("{value} exceeds {}", u64::MAX)));
                }
                self.min_image_size_bytes = value as u64;
            }
            ThresholdParam::PoseMaxAngle => self.pose_max_angle = value,
            ThresholdParam::MouthOpenConfidence => self.mouth_open_confidence = value,
            ThresholdParam::SmileConfidence => self.smile_confidence = value,
            ThresholdParam::EyesOpenConfidence => self.eyes_open_confidence = value,
            ThresholdParam::EyeDirectionConfidence => self.eye_direction_confidence = value,
            ThresholdParam::EyeDirectionMaxAngle => self.eye_direction_max_angle = value,
            ThresholdParam::FaceOccludedConfidence => self.face_occluded_confidence = value,
        }
        Ok(())
    }
}

fn invalid(param: ThresholdParam, reason: String) -> EvaluationError {
    EvaluationError::InvalidConfigValue {
        name: param.name().to_string(),
        reason,
    }
}

/// Collects named overrides and produces a validated [`ThresholdConfig`].
///
/// Overrides apply in insertion order, so a later value for the same
/// parameter wins.
#[derive(Debug, Clone, Default)]
pub struct ThresholdConfigBuilder {
    base: ThresholdConfig,
    overrides: Vec<(ThresholdParam, f64)>,
}

impl ThresholdConfigBuilder {
    /// Overrides one parameter.
    #[must_use]
    pub fn set(mut self, param: ThresholdParam, value: f64) -> Self {
        self.overrides.push((param, value));
        self
    }

    /// Overrides a parameter given by its config-file name.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownParameter`] if `name` is not a
    /// threshold parameter.
    pub fn set_by_name(self, name: &str, value: f64) -> Result<Self> {
        let param = name.parse::<ThresholdParam>()?;
        Ok(self.set(param, value))
    }

    /// Sets both bounds of the left-edge band.
    #[must_use]
    pub fn face_left(self, lo: f64, hi: f64) -> Self {
        self.set(ThresholdParam::FaceLeftLo, lo)
            .set(ThresholdParam::FaceLeftHi, hi)
    }

    /// Sets both bounds of the right-edge band.
    #[must_use]
    pub fn face_right(self, lo: f64, hi: f64) -> Self {
        self.set(ThresholdParam::FaceRightLo, lo)
            .set(ThresholdParam::FaceRightHi, hi)
    }

    /// Sets both bounds of the top-edge band.
    #[must_use]
    pub fn face_top(self, lo: f64, hi: f64) -> Self {
        self.set(ThresholdParam::FaceTopLo, lo)
            .set(ThresholdParam::FaceTopHi, hi)
    }

    /// Sets both bounds of the bottom-edge band.
    #[must_use]
    pub fn face_bottom(self, lo: f64, hi: f64) -> Self {
        self.set(ThresholdParam::FaceBottomLo, lo)
            .set(ThresholdParam::FaceBottomHi, hi)
    }

    /// Validates every override and builds the config.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::InvalidConfigValue`] for a non-finite value,
    /// or for a negative or fractional value of an integral parameter.
    pub fn build(self) -> Result<ThresholdConfig> {
        let mut config = self.base;
        for (param, value) in self.overrides {
            config.apply(param, value)?;
        }
        Ok(config)
    }
}
