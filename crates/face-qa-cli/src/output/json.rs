//! JSON output adapter.

use anyhow::Result;
use face_qa_core::{ImageReport, ResultOutput};
use std::io::{self, Write};
use std::sync::Mutex;

/// JSON output adapter.
///
/// In lines mode every report is written as it arrives; in array mode reports
/// are buffered and written as one JSON array on the first flush.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pending: Mutex<Option<Vec<ImageReport>>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a JSON Lines output writing to the given writer.
    #[must_use]
    pub fn lines(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            pending: Mutex::new(None),
            pretty: false,
        }
    }

    /// Creates an output that writes a single JSON array.
    #[must_use]
    pub fn array(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pending: Mutex::new(Some(Vec::new())),
            pretty,
        }
    }

    /// Creates a JSON Lines output writing to stdout.
    #[must_use]
    pub fn stdout_lines() -> Self {
        Self::lines(Box::new(io::stdout()))
    }

    /// Creates a JSON array output writing to stdout.
    #[must_use]
    pub fn stdout_array(pretty: bool) -> Self {
        Self::array(Box::new(io::stdout()), pretty)
    }

    /// Writes a batch of reports as a JSON array.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_array(&self, reports: &[ImageReport]) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(reports)?
        } else {
            serde_json::to_string(reports)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &ImageReport) -> Result<()> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        if let Some(batch) = pending.as_mut() {
            batch.push(report.clone());
            return Ok(());
        }
        drop(pending);

        let json = serde_json::to_string(report)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let batch = self
            .pending
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .take();
        if let Some(batch) = batch {
            self.write_array(&batch)?;
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
