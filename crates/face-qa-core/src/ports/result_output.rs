//! Result output port for presenting evaluation reports.

use crate::domain::ImageReport;

/// Port for outputting per-image evaluation reports.
pub trait ResultOutput: Send + Sync {
    /// Writes a single image report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, report: &ImageReport) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
