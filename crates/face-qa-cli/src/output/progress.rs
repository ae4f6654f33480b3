//! Batch progress reporting on stderr.
//!
//! With a bar, every image advances it and the final tally lands in the bar
//! message. Without one, only rejections and skips are reported, one line
//! each, so piped runs stay readable.

use face_qa_core::{ImageReport, ProgressEvent, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

enum Mode {
    Silent,
    Lines,
    Bar(ProgressBar),
}

/// Renders [`ProgressEvent`]s for an interactive or piped terminal.
pub struct BatchProgress {
    mode: Mode,
}

impl BatchProgress {
    /// No output at all.
    #[must_use]
    pub const fn silent() -> Self {
        Self { mode: Mode::Silent }
    }

    /// One stderr line per rejected or skipped image.
    #[must_use]
    pub const fn lines() -> Self {
        Self { mode: Mode::Lines }
    }

    /// An indicatif bar sized to `total`, or a spinner when the count is unknown.
    #[must_use]
    pub fn bar(total: Option<usize>) -> Self {
        let bar = total.map_or_else(ProgressBar::new_spinner, |t| ProgressBar::new(t as u64));
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self {
            mode: Mode::Bar(bar),
        }
    }

    fn report_rejection(report: &ImageReport) {
        let failing: Vec<_> = report
            .report
            .failed()
            .map(|c| c.id.clause())
            .collect();
        eprintln!(
            "{}: rejected, {} failing check(s) [{}]",
            report.path,
            failing.len(),
            failing.join(", ")
        );
    }
}

impl ProgressSink for BatchProgress {
    fn on_event(&self, event: ProgressEvent) {
        match (&self.mode, event) {
            (Mode::Silent, _) => {}
            (Mode::Bar(bar), ProgressEvent::Started { path, index, total }) => {
                if let Some(total) = total {
                    bar.set_length(total as u64);
                }
                bar.set_position(index as u64);
                bar.set_message(path);
            }
            (Mode::Bar(bar), ProgressEvent::Completed { .. }) => bar.inc(1),
            (Mode::Lines, ProgressEvent::Completed { report }) => {
                if !report.report.overall_pass {
                    Self::report_rejection(&report);
                }
            }
            (mode, ProgressEvent::Skipped { path, reason }) => {
                if let Mode::Bar(bar) = mode {
                    bar.inc(1);
                }
                eprintln!("WARN: Skipping {path}: {reason}");
            }
            (
                Mode::Bar(bar),
                ProgressEvent::Finished {
                    processed,
                    skipped,
                    rejected,
                },
            ) => bar.finish_with_message(format!(
                "Done: {processed} evaluated, {rejected} rejected, {skipped} skipped"
            )),
            (Mode::Lines, _) => {}
        }
    }
}
