//! Check command - evaluate photos against the conformance checks.

use std::collections::HashMap;
use std::io::{Cursor, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use face_qa_adapters::{CacheKey, CachedResponseProvider, FsImageSource, ResponseCache};
use face_qa_core::{
    FaceAttributeProvider, ImageInfo, ImageReport, ImageSource, ProgressEvent, ProgressSink,
    QualityEvaluator, ResultOutput, ThresholdConfig, ThresholdParam,
};
use tracing::{debug, info, warn};

use super::{parse_override, ExitCode};
use crate::config::AppConfig;
use crate::output::{BatchProgress, JsonOutput, TextOutput};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
    /// Human-readable PASS/FAIL listing
    Text,
}

fn parse_cache_key(s: &str) -> Result<CacheKey, String> {
    s.parse()
}

/// Shared arguments for photo evaluation.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// Image files or directories to evaluate
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Override a threshold (repeatable), e.g. --set conf_smile=75
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(ThresholdParam, f64)>,

    /// Directory of cached face-detection responses (default: beside each image)
    #[arg(long, value_name = "DIR")]
    pub responses_dir: Option<PathBuf>,

    /// How responses are matched to images: file_name or content_hash
    #[arg(long, value_name = "KEY", value_parser = parse_cache_key)]
    pub cache_key: Option<CacheKey>,

    /// Include EXIF metadata in output
    #[arg(long)]
    pub exif: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Threshold overrides from config files (populated by `with_config`).
    #[arg(skip)]
    config_overrides: Vec<(ThresholdParam, f64)>,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.config_overrides = config.threshold_overrides();

        if args.responses_dir.is_none() {
            args.responses_dir.clone_from(&config.provider.responses_dir);
        }
        args.cache_key = args.cache_key.or_else(|| config.cache_key());

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| OutputFormat::from_str(s, true).ok());
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.exif {
            args.exif = config.output.exif.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    /// Builds the threshold snapshot: defaults, then config, then `--set`.
    ///
    /// # Errors
    ///
    /// Returns an error if a resulting value is invalid for its parameter.
    pub fn thresholds(&self) -> Result<ThresholdConfig> {
        let thresholds = self
            .config_overrides
            .iter()
            .chain(&self.overrides)
            .fold(ThresholdConfig::builder(), |b, &(param, value)| {
                b.set(param, value)
            })
            .build()?;
        Ok(thresholds)
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn response_cache(&self) -> ResponseCache {
        ResponseCache::new(self.responses_dir.clone(), self.cache_key.unwrap_or_default())
    }
}

/// Result of running the check command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of images evaluated.
    pub processed: usize,
    /// Number of images that could not be evaluated.
    pub skipped: usize,
    /// Number of evaluated images that were rejected.
    pub rejected: usize,
}

impl CheckSummary {
    /// Error if anything was skipped, otherwise rejected if anything failed.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        if self.skipped > 0 {
            ExitCode::Error
        } else if self.rejected > 0 {
            ExitCode::Rejected
        } else {
            ExitCode::Success
        }
    }
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CheckArgs) -> Result<CheckSummary> {
    info!("Running check command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let evaluator = QualityEvaluator::new(args.thresholds()?);
    let cache = args.response_cache();
    debug!(
        responses_dir = ?args.responses_dir,
        key = %cache.key(),
        "Using cached face-detection responses"
    );
    let provider = CachedResponseProvider::new(cache);

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let progress = if args.quiet {
        BatchProgress::silent()
    } else if args.progress || std::io::stderr().is_terminal() {
        BatchProgress::bar(total)
    } else {
        BatchProgress::lines()
    };

    let output: Box<dyn ResultOutput> = match args.format() {
        OutputFormat::Jsonl => Box::new(JsonOutput::stdout_lines()),
        OutputFormat::Json => Box::new(JsonOutput::stdout_array(args.pretty)),
        OutputFormat::Text => Box::new(TextOutput::stdout()),
    };

    process_images(
        &source,
        &provider,
        &evaluator,
        output.as_ref(),
        &progress,
        args.exif,
    )
}

/// Evaluate every image from `source` and emit reports and progress events.
///
/// Images that fail to load, have no usable provider response, or carry an
/// incomplete face record are skipped with a reason; they never count as
/// rejected.
pub fn process_images(
    source: &dyn ImageSource,
    provider: &dyn FaceAttributeProvider,
    evaluator: &QualityEvaluator,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    with_exif: bool,
) -> Result<CheckSummary> {
    let total = source.count_hint();
    let mut summary = CheckSummary {
        processed: 0,
        skipped: 0,
        rejected: 0,
    };

    for (index, image_result) in source.images().enumerate() {
        let image = match image_result {
            Ok(img) => img,
            Err(e) => {
                warn!("Could not load {}: {:#}", e.path, e.reason);
                progress.on_event(ProgressEvent::Skipped {
                    path: e.path,
                    reason: format!("{:#}", e.reason),
                });
                summary.skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            path: image.path.clone(),
            index,
            total,
        });

        let report = match evaluate_image(&image, provider, evaluator, with_exif) {
            Ok(report) => report,
            Err(e) => {
                warn!("Could not evaluate {}: {e:#}", image.path);
                progress.on_event(ProgressEvent::Skipped {
                    path: image.path,
                    reason: format!("{e:#}"),
                });
                summary.skipped += 1;
                continue;
            }
        };

        if !report.report.overall_pass {
            summary.rejected += 1;
        }
        output.write(&report)?;
        progress.on_event(ProgressEvent::Completed {
            report: Box::new(report),
        });
        summary.processed += 1;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished {
        processed: summary.processed,
        skipped: summary.skipped,
        rejected: summary.rejected,
    });

    Ok(summary)
}

fn evaluate_image(
    image: &ImageInfo,
    provider: &dyn FaceAttributeProvider,
    evaluator: &QualityEvaluator,
    with_exif: bool,
) -> Result<ImageReport> {
    let faces = provider.faces(image)?;
    if faces.len() > 1 {
        warn!(
            path = %image.path,
            faces = faces.len(),
            "Multiple faces detected; only the first is evaluated"
        );
    }

    let report = evaluator.evaluate(&image.meta, &faces)?;
    debug!(
        path = %image.path,
        provider = provider.name(),
        accepted = report.overall_pass,
        "Evaluated image"
    );

    Ok(ImageReport {
        path: image.path.clone(),
        timestamp: iso_timestamp(),
        image: image.meta,
        report,
        exif: if with_exif {
            extract_exif(&image.bytes)
        } else {
            None
        },
    })
}

/// Extract EXIF metadata from encoded image bytes.
fn extract_exif(bytes: &[u8]) -> Option<HashMap<String, String>> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;

    let map: HashMap<_, _> = exif
        .fields()
        .map(|field| {
            (
                field.tag.to_string(),
                field.display_value().with_unit(&exif).to_string(),
            )
        })
        .collect();

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use face_qa_core::CheckId;
    use face_qa_test_support::{
        FaceAttributesBuilder, MockFaceProvider, MockImageSource, MockProgressSink,
        MockResultOutput, SyntheticImageBuilder,
    };

    fn named(path: &str) -> ImageInfo {
        let mut info = SyntheticImageBuilder::noise_rgb(640, 640);
        info.path = path.into();
        info
    }

    fn run_batch(
        images: Vec<ImageInfo>,
        provider: &MockFaceProvider,
    ) -> (CheckSummary, MockResultOutput, MockProgressSink) {
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();
        let summary = process_images(
            &MockImageSource::new(images),
            provider,
            &QualityEvaluator::default(),
            &output,
            &progress,
            false,
        )
        .unwrap();
        (summary, output, progress)
    }

    #[test]
    fn test_accepted_batch() {
        let provider = MockFaceProvider::always(vec![FaceAttributesBuilder::compliant().build()]);
        let (summary, output, progress) = run_batch(vec![named("a.png"), named("b.png")], &provider);

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.exit_code(), ExitCode::Success);
        assert_eq!(output.reports().len(), 2);
        assert_eq!(output.flush_count(), 1);
        assert_eq!(progress.started_count(), 2);
        assert_eq!(progress.completed_count(), 2);
        assert_eq!(progress.finished_counts(), Some((2, 0, 0)));
    }

    #[test]
    fn test_rejected_image_sets_exit_code() {
        let provider = MockFaceProvider::always(vec![FaceAttributesBuilder::compliant().build()])
            .with(
                "smiling.png",
                vec![FaceAttributesBuilder::compliant().smile(true, 85.0).build()],
            );
        let (summary, output, _) = run_batch(vec![named("ok.png"), named("smiling.png")], &provider);

        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.exit_code(), ExitCode::Rejected);
        let smiling = &output.reports()[1];
        assert!(!smiling.report.check(CheckId::NoSmile).unwrap().passed);
    }

    #[test]
    fn test_provider_failure_skips_image() {
        let provider = MockFaceProvider::failing()
            .with("known.png", vec![FaceAttributesBuilder::compliant().build()]);
        let (summary, output, progress) =
            run_batch(vec![named("known.png"), named("unknown.png")], &provider);

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.exit_code(), ExitCode::Error);
        assert_eq!(output.reports().len(), 1);
        assert_eq!(progress.skipped_count(), 1);
    }

    #[test]
    fn test_incomplete_record_skips_image() {
        let provider = MockFaceProvider::always(vec![FaceAttributesBuilder::compliant()
            .without_eye_direction()
            .build()]);
        let (summary, _, progress) = run_batch(vec![named("a.png")], &provider);

        assert_eq!(summary.skipped, 1);
        let reason = progress
            .events()
            .into_iter()
            .find_map(|e| match e {
                ProgressEvent::Skipped { reason, .. } => Some(reason),
                _ => None,
            })
            .unwrap();
        assert!(reason.contains("EyeDirection"));
    }

    #[test]
    fn test_unreadable_image_skipped_under_its_path() {
        let provider = MockFaceProvider::always(vec![FaceAttributesBuilder::compliant().build()]);
        let source = MockImageSource::new(vec![named("good.png")]).with_unreadable("bad.jpg");
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let summary = process_images(
            &source,
            &provider,
            &QualityEvaluator::default(),
            &output,
            &progress,
            false,
        )
        .unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        let skipped = progress
            .events()
            .into_iter()
            .find_map(|e| match e {
                ProgressEvent::Skipped { path, reason } => Some((path, reason)),
                _ => None,
            })
            .unwrap();
        assert_eq!(skipped.0, "bad.jpg");
        assert_eq!(skipped.1, "unreadable test image");
    }

    #[test]
    fn test_no_faces_is_rejection_not_error() {
        let provider = MockFaceProvider::always(vec![]);
        let (summary, output, _) = run_batch(vec![named("empty.png")], &provider);

        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.exit_code(), ExitCode::Rejected);
        assert!(!output.reports()[0].report.face_detected);
    }

    #[test]
    fn test_thresholds_layering() {
        let mut args = CheckArgs {
            paths: vec![],
            recursive: false,
            overrides: vec![(ThresholdParam::MinBrightness, 50.0)],
            responses_dir: None,
            cache_key: None,
            exif: false,
            progress: false,
            quiet: true,
            format: None,
            pretty: false,
            config_overrides: vec![],
        };
        let config: AppConfig = toml::from_str(
            r"
[thresholds]
min_brightness = 60
min_sharpness = 60
",
        )
        .unwrap();
        args = CheckArgs::with_config(args, &config);

        let thresholds = args.thresholds().unwrap();
        assert!((thresholds.min_brightness() - 50.0).abs() < f64::EPSILON);
        assert!((thresholds.min_sharpness() - 60.0).abs() < f64::EPSILON);
        assert!((thresholds.smile_confidence() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exit_code_precedence() {
        let summary = CheckSummary {
            processed: 3,
            skipped: 1,
            rejected: 2,
        };
        assert_eq!(summary.exit_code(), ExitCode::Error);
    }
}
