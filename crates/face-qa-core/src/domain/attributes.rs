//! Input records: detected face attributes and image metadata.
//!
//! Face records use the provider's PascalCase field names on the wire so a
//! cached detect-faces response deserializes directly. Every attribute group
//! and every value inside one is optional at this layer; the checks decide
//! what is required and report exactly which value is absent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attributes of one detected face, as reported by the face-attribute provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceAttributes {
    /// Likelihood (0-100) that the record is a face.
    #[serde(rename = "Confidence", skip_serializing_if = "Option::is_none")]
    pub detection_confidence: Option<f64>,
    /// Image quality measured over the face region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    /// Face location, normalized to the image extent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Whether the subject wears eyeglasses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eyeglasses: Option<Flag>,
    /// Whether the subject wears sunglasses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunglasses: Option<Flag>,
    /// Head orientation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    /// Whether the mouth is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouth_open: Option<Flag>,
    /// Whether the subject smiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smile: Option<Flag>,
    /// Whether the eyes are open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eyes_open: Option<Flag>,
    /// Gaze direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_direction: Option<EyeDirection>,
    /// Whether part of the face is covered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_occluded: Option<Flag>,
}

/// Brightness and sharpness of the face region (0-100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quality {
    /// Brightness score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    /// Sharpness score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f64>,
}

impl Quality {
    #[must_use]
    pub const fn new(brightness: f64, sharpness: f64) -> Self {
        Self {
            brightness: Some(brightness),
            sharpness: Some(sharpness),
        }
    }
}

/// Normalized face rectangle; all values are fractions of the image extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    /// Left edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Top edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl BoundingBox {
    /// Creates a bounding box from its left/top corner and extent.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Right edge (`left + width`), if both are known.
    #[must_use]
    pub fn right(&self) -> Option<f64> {
        Some(self.left? + self.width?)
    }

    /// Bottom edge (`top + height`), if both are known.
    #[must_use]
    pub fn bottom(&self) -> Option<f64> {
        Some(self.top? + self.height?)
    }
}

/// A boolean classification together with the provider's confidence in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Flag {
    /// Classification outcome.
    #[serde(rename = "Value", skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,
    /// Confidence (0-100) in `present`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Flag {
    #[must_use]
    pub const fn new(present: bool, confidence: f64) -> Self {
        Self {
            present: Some(present),
            confidence: Some(confidence),
        }
    }
}

/// Head pose in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pose {
    /// Rotation around the viewing axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    /// Left/right turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    /// Up/down tilt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
}

impl Pose {
    #[must_use]
    pub const fn new(roll: f64, yaw: f64, pitch: f64) -> Self {
        Self {
            roll: Some(roll),
            yaw: Some(yaw),
            pitch: Some(pitch),
        }
    }
}

/// Gaze direction in degrees, with the provider's confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EyeDirection {
    /// Horizontal gaze angle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    /// Vertical gaze angle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    /// Confidence (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl EyeDirection {
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64, confidence: f64) -> Self {
        Self {
            yaw: Some(yaw),
            pitch: Some(pitch),
            confidence: Some(confidence),
        }
    }
}

/// Pixel layout of the source image.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorMode {
    /// Three-channel color without alpha.
    Rgb,
    /// Single luminance channel.
    Grayscale,
    /// Anything else (alpha channels, palettes, CMYK, ...).
    Other,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgb => "RGB",
            Self::Grayscale => "GRAYSCALE",
            Self::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// File-level facts about the image the faces were detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeta {
    /// Encoded file size in bytes.
    pub byte_size: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub color_mode: ColorMode,
}

impl ImageMeta {
    /// Creates image metadata.
    #[must_use]
    pub const fn new(byte_size: u64, width: u32, height: u32, color_mode: ColorMode) -> Self {
        Self {
            byte_size,
            width,
            height,
            color_mode,
        }
    }
}

/// A loaded image: its identity, raw bytes and metadata.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path to the image file.
    pub path: String,
    /// Raw encoded bytes, as handed to a face-attribute provider.
    pub bytes: Vec<u8>,
    /// Size, dimensions and color mode.
    pub meta: ImageMeta,
}

impl ImageInfo {
    /// Creates image info.
    #[must_use]
    pub fn new(path: impl Into<String>, bytes: Vec<u8>, meta: ImageMeta) -> Self {
        Self {
            path: path.into(),
            bytes,
            meta,
        }
    }
}
