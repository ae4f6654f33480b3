//! Image source port for loading images and their metadata.

use thiserror::Error;

use crate::domain::ImageInfo;

/// An image that was found but could not be loaded.
#[derive(Debug, Error)]
#[error("{path}: {reason:#}")]
pub struct ImageLoadError {
    /// Where the image was expected.
    pub path: String,
    /// What went wrong while reading or inspecting it.
    pub reason: anyhow::Error,
}

impl ImageLoadError {
    pub fn new(path: impl Into<String>, reason: anyhow::Error) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// # Errors
    ///
    /// Individual items are errors, naming the image, if it fails to load.
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, ImageLoadError>> + Send + '_>;

    /// Returns the number of items [`images`](Self::images) yields, if known.
    fn count_hint(&self) -> Option<usize>;
}
