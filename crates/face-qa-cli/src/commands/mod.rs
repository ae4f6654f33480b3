//! CLI command definitions and handlers.

pub mod check;
pub mod thresholds;

use clap::{Parser, Subcommand};
use face_qa_core::ThresholdParam;

/// Face QA - passport-photo conformance checks
#[derive(Parser)]
#[command(name = "face-qa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared check arguments (paths, thresholds, flags).
    #[command(flatten)]
    pub check: check::CheckArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate photos against the conformance checks
    Check(check::CheckArgs),
    /// Print the effective thresholds as TOML
    Thresholds(thresholds::ThresholdsArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every evaluated photo was accepted.
    Success = 0,
    /// At least one photo was rejected.
    Rejected = 1,
    /// Invalid input, configuration or an image that could not be evaluated.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Parses a `NAME=VALUE` threshold override.
///
/// The value must be a finite number; `true`, `false` and other text are
/// rejected.
pub fn parse_override(s: &str) -> Result<(ThresholdParam, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("'{s}' is not of the form NAME=VALUE"))?;
    let param: ThresholdParam = name.trim().parse().map_err(|e| format!("{e}"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("{value} is not a finite number"));
    }
    Ok((param, value))
}
