//! Capture-quality checks: lighting, color, resolution and file size.

use super::{require, require_value, CheckId, Subject};
use crate::domain::{CheckResult, ColorMode, ThresholdConfig};
use crate::error::Result;

/// Brightness and sharpness must both exceed their minimums.
pub(super) fn lighting(subject: &Subject<'_>, config: &ThresholdConfig) -> Result<CheckResult> {
    let id = CheckId::Lighting;
    let quality = require(subject.face.quality.as_ref(), "Quality", id)?;
    let brightness = require_value(quality.brightness, "Quality", "Brightness", id)?;
    let sharpness = require_value(quality.sharpness, "Quality", "Sharpness", id)?;

    let passed = brightness > config.min_brightness() && sharpness > config.min_sharpness();

    Ok(CheckResult::new(id, passed)
        .measure("brightness", brightness)
        .measure("sharpness", sharpness)
        .threshold(format!(
            "brightness > {}, sharpness > {}",
            config.min_brightness(),
            config.min_sharpness()
        )))
}

/// The image must be plain RGB.
pub(super) fn color_mode(subject: &Subject<'_>, _config: &ThresholdConfig) -> Result<CheckResult> {
    let mode = subject.image.color_mode;

    Ok(CheckResult::new(CheckId::ColorMode, mode == ColorMode::Rgb)
        .measure("color_mode", mode.to_string())
        .threshold(format!("color mode = {}", ColorMode::Rgb)))
}

/// Width and height must each reach the minimum (inclusive).
pub(super) fn image_dimensions(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let min = config.min_image_dim_pixels();
    let image = subject.image;

    Ok(
        CheckResult::new(CheckId::ImageDimensions, image.width >= min && image.height >= min)
            .measure("width", image.width)
            .measure("height", image.height)
            .threshold(format!("width >= {min}, height >= {min} pixels")),
    )
}

/// The encoded file must be larger than the minimum size.
pub(super) fn image_file_size(
    subject: &Subject<'_>,
    config: &ThresholdConfig,
) -> Result<CheckResult> {
    let min = config.min_image_size_bytes();
    let size = subject.image.byte_size;

    Ok(CheckResult::new(CheckId::ImageFileSize, size > min)
        .measure("bytes", size)
        .threshold(format!("size > {min} bytes")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checks::fixtures;
    use crate::domain::{ImageMeta, Quality};
    use crate::error::EvaluationError;

    fn run_with(
        check: fn(&Subject<'_>, &ThresholdConfig) -> Result<CheckResult>,
        face: &crate::domain::FaceAttributes,
        image: &ImageMeta,
    ) -> Result<CheckResult> {
        check(&Subject { image, face }, &ThresholdConfig::default())
    }

    #[test]
    fn test_lighting_passes_above_minimums() {
        let result = run_with(lighting, &fixtures::face(), &fixtures::image()).unwrap();
        assert!(result.passed);
        assert_eq!(result.threshold_text, "brightness > 70, sharpness > 70");
    }

    #[test]
    fn test_lighting_fails_at_equality() {
        let mut face = fixtures::face();
        face.quality = Some(Quality::new(70.0, 90.0));
        assert!(!run_with(lighting, &face, &fixtures::image()).unwrap().passed);

        face.quality = Some(Quality::new(90.0, 70.0));
        assert!(!run_with(lighting, &face, &fixtures::image()).unwrap().passed);
    }

    #[test]
    fn test_lighting_requires_quality() {
        let mut face = fixtures::face();
        face.quality = None;
        let err = run_with(lighting, &face, &fixtures::image()).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::MissingAttribute {
                field: "Quality".into(),
                check: CheckId::Lighting
            }
        );
    }

    #[test]
    fn test_lighting_names_missing_quality_value() {
        let mut face = fixtures::face();
        face.quality = Some(Quality {
            sharpness: None,
            ..Quality::new(80.0, 80.0)
        });
        let err = run_with(lighting, &face, &fixtures::image()).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::MissingAttribute {
                field: "Quality.Sharpness".into(),
                check: CheckId::Lighting
            }
        );
        assert!(err.to_string().contains("check 2"));
    }

    #[test]
    fn test_color_mode() {
        let face = fixtures::face();
        let mut image = fixtures::image();
        assert!(run_with(color_mode, &face, &image).unwrap().passed);

        image.color_mode = ColorMode::Grayscale;
        let result = run_with(color_mode, &face, &image).unwrap();
        assert!(!result.passed);
        assert_eq!(result.measured[0].value.to_string(), "GRAYSCALE");

        image.color_mode = ColorMode::Other;
        assert!(!run_with(color_mode, &face, &image).unwrap().passed);
    }

    #[test]
    fn test_dimensions_inclusive_minimum() {
        let face = fixtures::face();
        let exact = ImageMeta::new(100_000, 600, 600, ColorMode::Rgb);
        assert!(run_with(image_dimensions, &face, &exact).unwrap().passed);

        let narrow = ImageMeta::new(100_000, 599, 800, ColorMode::Rgb);
        assert!(!run_with(image_dimensions, &face, &narrow).unwrap().passed);

        let short = ImageMeta::new(100_000, 800, 599, ColorMode::Rgb);
        assert!(!run_with(image_dimensions, &face, &short).unwrap().passed);
    }

    #[test]
    fn test_file_size_strict_minimum() {
        let face = fixtures::face();
        let exact = ImageMeta::new(55_296, 800, 800, ColorMode::Rgb);
        assert!(!run_with(image_file_size, &face, &exact).unwrap().passed);

        let above = ImageMeta::new(55_297, 800, 800, ColorMode::Rgb);
        assert!(run_with(image_file_size, &face, &above).unwrap().passed);
    }

    #[test]
    fn test_image_checks_ignore_face_attributes() {
        let face = crate::domain::FaceAttributes::default();
        let image = fixtures::image();
        assert!(run_with(color_mode, &face, &image).is_ok());
        assert!(run_with(image_dimensions, &face, &image).is_ok());
        assert!(run_with(image_file_size, &face, &image).is_ok());
    }
}
