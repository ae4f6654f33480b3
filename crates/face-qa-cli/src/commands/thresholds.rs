//! Thresholds command - print the effective threshold configuration.

use anyhow::{Context, Result};
use clap::Args;
use face_qa_core::{ThresholdConfig, ThresholdParam};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::info;

use super::parse_override;
use crate::config::AppConfig;

/// Arguments for the thresholds command.
#[derive(Args, Clone)]
pub struct ThresholdsArgs {
    /// Print built-in defaults, ignoring config files and overrides
    #[arg(long)]
    pub defaults: bool,

    /// Override a threshold (repeatable), e.g. --set min_brightness=60
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(ThresholdParam, f64)>,
}

/// Run the thresholds command.
pub fn run(args: &ThresholdsArgs, config: &AppConfig) -> Result<()> {
    let thresholds = if args.defaults {
        info!("Printing default thresholds");
        ThresholdConfig::default()
    } else {
        config
            .threshold_overrides()
            .into_iter()
            .chain(args.overrides.iter().copied())
            .fold(ThresholdConfig::builder(), |b, (param, value)| {
                b.set(param, value)
            })
            .build()?
    };

    print!("{}", to_toml(&thresholds)?);
    Ok(())
}

#[derive(Serialize)]
struct ThresholdsFile<'a> {
    thresholds: Entries<'a>,
}

/// Serializes as a table in parameter order rather than by name.
struct Entries<'a>(&'a ThresholdConfig);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ThresholdParam::ALL.len()))?;
        for (param, value) in self.0.entries() {
            map.serialize_entry(param.name(), &toml_number(param, value))?;
        }
        map.end()
    }
}

/// Whole-number parameters print as TOML integers while they fit in one.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn toml_number(param: ThresholdParam, value: f64) -> toml::Value {
    if param.is_integral() && value < i64::MAX as f64 {
        toml::Value::Integer(value as i64)
    } else {
        toml::Value::Float(value)
    }
}

/// Renders thresholds as a `[thresholds]` TOML table in parameter order.
///
/// # Errors
///
/// Returns an error if the table cannot be serialized.
pub fn to_toml(thresholds: &ThresholdConfig) -> Result<String> {
    toml::to_string(&ThresholdsFile {
        thresholds: Entries(thresholds),
    })
    .context("Failed to render thresholds as TOML")
}
