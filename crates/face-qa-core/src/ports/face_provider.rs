//! Face-attribute provider port.

use crate::domain::{FaceAttributes, ImageInfo};

/// Port for obtaining detected-face attribute records for an image.
///
/// Implementations may call a detection service or read a cached response.
/// Their failures (network, auth, missing cache entry, malformed response)
/// are reported here and never reach the evaluator.
pub trait FaceAttributeProvider: Send + Sync {
    /// Returns a short name for logs.
    fn name(&self) -> &'static str;

    /// Returns zero or more face records for the image, largest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot produce attributes for the image.
    fn faces(&self, image: &ImageInfo) -> anyhow::Result<Vec<FaceAttributes>>;
}
