//! Core domain types for face-photo conformance checks.

mod attributes;
mod report;
mod thresholds;

pub use attributes::{
    BoundingBox, ColorMode, EyeDirection, FaceAttributes, Flag, ImageInfo, ImageMeta, Pose,
    Quality,
};
pub use report::{CheckResult, EvaluationReport, ImageReport, MeasuredValue, Measurement};
pub use thresholds::{Band, ThresholdConfig, ThresholdConfigBuilder, ThresholdParam};
