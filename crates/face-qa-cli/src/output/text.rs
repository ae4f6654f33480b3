//! Human-readable report output.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use face_qa_core::{CheckResult, ImageReport, ResultOutput};

/// Writes one block per image: a PASS/FAIL line per check and a verdict.
pub struct TextOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextOutput {
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

/// Renders a report as text.
pub fn render(report: &ImageReport) -> String {
    let mut out = format!(
        "{} ({}x{}, {} bytes, {})\n",
        report.path,
        report.image.width,
        report.image.height,
        report.image.byte_size,
        report.image.color_mode
    );

    if report.report.face_count > 1 {
        out.push_str(&format!(
            "  note: {} faces detected, only the first is evaluated\n",
            report.report.face_count
        ));
    }

    for check in &report.report.checks {
        out.push_str(&render_check(check));
        out.push('\n');
    }

    out.push_str(if report.report.overall_pass {
        "All checks PASS"
    } else {
        "There is a failing check"
    });
    out.push('\n');
    out
}

fn render_check(check: &CheckResult) -> String {
    let status = if check.passed { "PASS" } else { "FAIL" };
    let measured = check
        .measured
        .iter()
        .map(|m| format!("{}={}", m.label, m.value))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "  {status}  {:<5} {:<26} {measured} [{}]",
        check.clause, check.name, check.threshold_text
    )
}

impl ResultOutput for TextOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &ImageReport) -> Result<()> {
        let text = render(report);
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{text}")?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
