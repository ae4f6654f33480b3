//! Configuration file support for face-qa.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/face-qa/config.toml` (lowest priority)
//! - Project-local: `.face-qa.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use face_qa_adapters::CacheKey;
use face_qa_core::{ThresholdConfig, ThresholdParam};
use serde::Deserialize;
use tracing::{debug, info, warn};

const PROJECT_CONFIG_NAME: &str = ".face-qa.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Threshold overrides keyed by parameter name.
    pub thresholds: BTreeMap<String, f64>,
    /// Where face-detection responses come from.
    pub provider: ProviderConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Face-detection response cache settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Directory holding cached responses; beside each image when unset.
    pub responses_dir: Option<PathBuf>,
    /// Cache key: "file_name" or "content_hash".
    pub key: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "jsonl", "json" or "text".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Include EXIF metadata.
    pub exif: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Reads the XDG file, then the nearest `.face-qa.toml`, later layers
    /// overriding earlier ones.
    ///
    /// Absent files are skipped. Unreadable or malformed files and invalid
    /// values only produce warnings; the run continues with what loaded.
    pub fn load() -> Self {
        let layers = [
            ("XDG", xdg_config_path()),
            ("project", find_project_config()),
        ];

        let mut config = Self::default();
        for (layer, path) in layers {
            let Some(path) = path else { continue };
            if !path.is_file() {
                debug!(layer, path = %path.display(), "Config file absent");
                continue;
            }
            info!(layer, path = %path.display(), "Loading config");
            match load_file(&path) {
                Ok(layer_config) => config.merge(layer_config),
                Err(e) => warn!("{e:#}"),
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        for name in self.thresholds.keys() {
            if name.parse::<ThresholdParam>().is_err() {
                return Err(format!("thresholds.{name} is not a known threshold"));
            }
        }

        let mut builder = ThresholdConfig::builder();
        for (param, value) in self.threshold_overrides() {
            builder = builder.set(param, value);
        }
        if let Err(e) = builder.build() {
            return Err(format!("thresholds: {e}"));
        }

        if let Some(ref f) = self.output.format {
            if !matches!(f.as_str(), "json" | "jsonl" | "text") {
                return Err(format!(
                    "output.format must be 'json', 'jsonl' or 'text', got '{f}'"
                ));
            }
        }

        if let Some(ref key) = self.provider.key {
            key.parse::<CacheKey>()
                .map_err(|e| format!("provider.key: {e}"))?;
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.thresholds.extend(other.thresholds);

        self.provider.responses_dir = other
            .provider
            .responses_dir
            .or_else(|| self.provider.responses_dir.take());
        self.provider.key = other.provider.key.or_else(|| self.provider.key.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.exif = other.output.exif.or(self.output.exif);
        self.output.progress = other.output.progress.or(self.output.progress);
    }

    /// Threshold overrides with recognized names, in parameter order.
    ///
    /// Unknown names are skipped; [`AppConfig::load`] already warned about them.
    pub fn threshold_overrides(&self) -> Vec<(ThresholdParam, f64)> {
        let mut overrides: Vec<_> = self
            .thresholds
            .iter()
            .filter_map(|(name, value)| match name.parse::<ThresholdParam>() {
                Ok(param) => Some((param, *value)),
                Err(_) => {
                    warn!("Ignoring unknown threshold `{name}`");
                    None
                }
            })
            .collect();
        overrides.sort_by_key(|(param, _)| *param);
        overrides
    }

    /// Parsed cache key, if a valid one is configured.
    pub fn cache_key(&self) -> Option<CacheKey> {
        self.provider.key.as_deref().and_then(|k| k.parse().ok())
    }
}

fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("face-qa").join("config.toml"))
}

fn find_project_config() -> Option<PathBuf> {
    find_config_in_parents(&std::env::current_dir().ok()?)
}

/// Nearest `.face-qa.toml` in `start` or one of its ancestors.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_NAME))
        .find(|candidate| candidate.is_file())
}

fn load_file(path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
