//! Builders for attribute records, image metadata and synthetic images.

use std::io::Cursor;

use face_qa_core::domain::{
    BoundingBox, ColorMode, EyeDirection, FaceAttributes, Flag, ImageInfo, ImageMeta, Pose,
    Quality,
};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

/// Builder for [`FaceAttributes`] records.
///
/// Starts from a fully populated record that passes every check under the
/// default thresholds; each setter degrades one attribute.
#[derive(Debug, Clone)]
pub struct FaceAttributesBuilder {
    face: FaceAttributes,
}

impl FaceAttributesBuilder {
    /// A record that clears every check under default thresholds.
    #[must_use]
    pub fn compliant() -> Self {
        Self {
            face: FaceAttributes {
                detection_confidence: Some(99.9),
                quality: Some(Quality::new(80.0, 80.0)),
                bounding_box: Some(BoundingBox::new(0.30, 0.15, 0.35, 0.55)),
                eyeglasses: Some(Flag::new(false, 90.0)),
                sunglasses: Some(Flag::new(false, 90.0)),
                pose: Some(Pose::new(0.0, 0.0, 0.0)),
                mouth_open: Some(Flag::new(false, 90.0)),
                smile: Some(Flag::new(false, 90.0)),
                eyes_open: Some(Flag::new(true, 99.0)),
                eye_direction: Some(EyeDirection::new(0.0, 0.0, 95.0)),
                face_occluded: Some(Flag::new(false, 95.0)),
            },
        }
    }

    /// A record with nothing but a detection confidence.
    #[must_use]
    pub fn bare(confidence: f64) -> Self {
        Self {
            face: FaceAttributes {
                detection_confidence: Some(confidence),
                ..FaceAttributes::default()
            },
        }
    }

    #[must_use]
    pub const fn confidence(mut self, confidence: f64) -> Self {
        self.face.detection_confidence = Some(confidence);
        self
    }

    #[must_use]
    pub const fn quality(mut self, brightness: f64, sharpness: f64) -> Self {
        self.face.quality = Some(Quality::new(brightness, sharpness));
        self
    }

    #[must_use]
    pub const fn bounding_box(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.face.bounding_box = Some(BoundingBox::new(left, top, width, height));
        self
    }

    #[must_use]
    pub const fn eyeglasses(mut self, present: bool, confidence: f64) -> Self {
        self.face.eyeglasses = Some(Flag::new(present, confidence));
        self
    }

    #[must_use]
    pub const fn sunglasses(mut self, present: bool, confidence: f64) -> Self {
        self.face.sunglasses = Some(Flag::new(present, confidence));
        self
    }

    #[must_use]
    pub const fn pose(mut self, roll: f64, yaw: f64, pitch: f64) -> Self {
        self.face.pose = Some(Pose::new(roll, yaw, pitch));
        self
    }

    #[must_use]
    pub const fn mouth_open(mut self, present: bool, confidence: f64) -> Self {
        self.face.mouth_open = Some(Flag::new(present, confidence));
        self
    }

    #[must_use]
    pub const fn smile(mut self, present: bool, confidence: f64) -> Self {
        self.face.smile = Some(Flag::new(present, confidence));
        self
    }

    #[must_use]
    pub const fn eyes_open(mut self, present: bool, confidence: f64) -> Self {
        self.face.eyes_open = Some(Flag::new(present, confidence));
        self
    }

    #[must_use]
    pub const fn eye_direction(mut self, yaw: f64, pitch: f64, confidence: f64) -> Self {
        self.face.eye_direction = Some(EyeDirection::new(yaw, pitch, confidence));
        self
    }

    #[must_use]
    pub const fn face_occluded(mut self, present: bool, confidence: f64) -> Self {
        self.face.face_occluded = Some(Flag::new(present, confidence));
        self
    }

    /// Removes the eye-direction attribute, leaving the record incomplete.
    #[must_use]
    pub const fn without_eye_direction(mut self) -> Self {
        self.face.eye_direction = None;
        self
    }

    /// Removes the quality attribute, leaving the record incomplete.
    #[must_use]
    pub const fn without_quality(mut self) -> Self {
        self.face.quality = None;
        self
    }

    #[must_use]
    pub fn build(self) -> FaceAttributes {
        self.face
    }
}

impl Default for FaceAttributesBuilder {
    fn default() -> Self {
        Self::compliant()
    }
}

/// Builder for [`ImageMeta`] values. Defaults to an 800x800 RGB image of
/// 100 000 bytes.
#[derive(Debug, Clone, Copy)]
pub struct ImageMetaBuilder {
    meta: ImageMeta,
}

impl ImageMetaBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            meta: ImageMeta::new(100_000, 800, 800, ColorMode::Rgb),
        }
    }

    #[must_use]
    pub const fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.meta.width = width;
        self.meta.height = height;
        self
    }

    #[must_use]
    pub const fn byte_size(mut self, byte_size: u64) -> Self {
        self.meta.byte_size = byte_size;
        self
    }

    #[must_use]
    pub const fn color_mode(mut self, color_mode: ColorMode) -> Self {
        self.meta.color_mode = color_mode;
        self
    }

    #[must_use]
    pub const fn build(self) -> ImageMeta {
        self.meta
    }
}

impl Default for ImageMetaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for encoded synthetic test images.
///
/// Images come back as [`ImageInfo`] holding PNG bytes and matching metadata,
/// or as raw PNG bytes for writing to disk.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates an RGB image of pseudo-random noise.
    ///
    /// Noise barely compresses, so an 800x800 image encodes to well over the
    /// default minimum file size.
    #[must_use]
    pub fn noise_rgb(width: u32, height: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let h = hash(x, y);
            Rgb([h.to_le_bytes()[0], h.to_le_bytes()[1], h.to_le_bytes()[2]])
        });
        Self::info("synthetic://noise_rgb", &DynamicImage::ImageRgb8(img))
    }

    /// Creates a uniform grayscale image.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> ImageInfo {
        let img = GrayImage::from_fn(width, height, |_, _| Luma([value]));
        Self::info("synthetic://uniform_gray", &DynamicImage::ImageLuma8(img))
    }

    /// Creates a uniform RGB image; small on disk since it compresses well.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |_, _| Rgb([r, g, b]));
        Self::info("synthetic://rgb_uniform", &DynamicImage::ImageRgb8(img))
    }

    /// Encodes an image as PNG.
    ///
    /// # Panics
    ///
    /// Panics if PNG encoding fails, which only happens for unsupported
    /// pixel layouts.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)
            .expect("PNG encoding of a synthetic image");
        buf.into_inner()
    }

    fn info(path: &str, img: &DynamicImage) -> ImageInfo {
        let bytes = Self::png_bytes(img);
        let color_mode = match img {
            DynamicImage::ImageRgb8(_) => ColorMode::Rgb,
            DynamicImage::ImageLuma8(_) => ColorMode::Grayscale,
            _ => ColorMode::Other,
        };
        let meta = ImageMeta::new(bytes.len() as u64, img.width(), img.height(), color_mode);
        ImageInfo::new(path, bytes, meta)
    }
}

// xorshift-style mix of the pixel coordinates
const fn hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^ (h >> 15)
}

/// Serializes face records as a provider `DetectFaces` response body.
#[must_use]
pub fn provider_response_json(faces: &[FaceAttributes]) -> String {
    serde_json::json!({ "FaceDetails": faces }).to_string()
}
