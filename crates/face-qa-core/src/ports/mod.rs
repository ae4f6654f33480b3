//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the evaluation core and the
//! adapters that load images, fetch face attributes and present results.

mod face_provider;
mod image_source;
mod progress;
mod result_output;

pub use face_provider::FaceAttributeProvider;
pub use image_source::{ImageLoadError, ImageSource};
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
