//! Test support utilities for face-qa.
//!
//! Provides attribute and image builders plus mocks of every core port.
//!
//! # Example
//!
//! ```
//! use face_qa_core::{evaluate, ThresholdConfig};
//! use face_qa_test_support::{FaceAttributesBuilder, ImageMetaBuilder};
//!
//! let face = FaceAttributesBuilder::compliant().smile(true, 85.0).build();
//! let image = ImageMetaBuilder::new().build();
//!
//! let report = evaluate(&image, &[face], &ThresholdConfig::default()).unwrap();
//! assert!(!report.overall_pass);
//! ```

mod builders;
mod mocks;

pub use builders::{
    provider_response_json, FaceAttributesBuilder, ImageMetaBuilder, SyntheticImageBuilder,
};
pub use mocks::{MockFaceProvider, MockImageSource, MockProgressSink, MockResultOutput};
