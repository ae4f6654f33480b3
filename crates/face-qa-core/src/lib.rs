//! Face QA Core - passport-photo conformance checks.
//!
//! This crate holds the domain types, the threshold model, the ordered table
//! of conformance checks and the pure [`evaluate`] function that turns one
//! image's face attributes into an accept/reject [`EvaluationReport`]. It does
//! no I/O; the port traits describe what adapters provide.
//!
//! # Example
//!
//! ```
//! use face_qa_core::{evaluate, ColorMode, ImageMeta, ThresholdConfig};
//!
//! let image = ImageMeta::new(120_000, 800, 1000, ColorMode::Rgb);
//! let report = evaluate(&image, &[], &ThresholdConfig::default()).unwrap();
//!
//! assert!(!report.face_detected);
//! assert_eq!(report.checks.len(), 1);
//! ```

pub mod checks;
pub mod domain;
mod error;
mod evaluator;
pub mod ports;

pub use checks::{CheckDescriptor, CheckId, CHECKS};
pub use domain::{
    Band, BoundingBox, CheckResult, ColorMode, EvaluationReport, EyeDirection, FaceAttributes,
    Flag, ImageInfo, ImageMeta, ImageReport, MeasuredValue, Measurement, Pose, Quality,
    ThresholdConfig, ThresholdConfigBuilder, ThresholdParam,
};
pub use error::{EvaluationError, Result};
pub use evaluator::{evaluate, QualityEvaluator};
pub use ports::{
    FaceAttributeProvider, ImageLoadError, ImageSource, ProgressEvent, ProgressSink, ResultOutput,
};
