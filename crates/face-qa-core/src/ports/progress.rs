//! Progress reporting port for UI integration.

use crate::domain::ImageReport;

/// Events emitted during a batch evaluation.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Evaluation started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// Evaluation completed for an image.
    Completed {
        /// The image report.
        report: Box<ImageReport>,
    },
    /// An image could not be evaluated.
    Skipped {
        /// Path to the image.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Images evaluated.
        processed: usize,
        /// Images skipped.
        skipped: usize,
        /// Evaluated images that were rejected.
        rejected: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
