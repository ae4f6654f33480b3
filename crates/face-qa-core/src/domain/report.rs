//! Evaluation output types.

use serde::{Deserialize, Serialize};

use super::ImageMeta;
use crate::checks::CheckId;

/// A value measured by a check, kept for display and audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasuredValue {
    /// A classification outcome.
    Flag(bool),
    /// A count, size or pixel dimension.
    Integer(u64),
    /// A score, angle or coordinate.
    Number(f64),
    /// A symbolic value such as a color mode.
    Text(String),
}

impl std::fmt::Display for MeasuredValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for MeasuredValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<u32> for MeasuredValue {
    fn from(v: u32) -> Self {
        Self::Integer(u64::from(v))
    }
}

impl From<u64> for MeasuredValue {
    fn from(v: u64) -> Self {
        Self::Integer(v)
    }
}

impl From<usize> for MeasuredValue {
    fn from(v: usize) -> Self {
        Self::Integer(v as u64)
    }
}

impl From<f64> for MeasuredValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for MeasuredValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// One labelled measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Label, e.g. `brightness`.
    pub label: String,
    /// Measured value.
    pub value: MeasuredValue,
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Which check produced this result.
    pub id: CheckId,
    /// Clause label of the conformance rule, e.g. `3a`.
    pub clause: String,
    /// Human-readable check name.
    pub name: String,
    /// Whether the subject satisfied the check.
    pub passed: bool,
    /// Values the decision was based on, in display order.
    pub measured: Vec<Measurement>,
    /// Description of the bound that was applied.
    pub threshold_text: String,
}

impl CheckResult {
    /// Creates a result with no measurements and an empty threshold text.
    #[must_use]
    pub fn new(id: CheckId, passed: bool) -> Self {
        Self {
            id,
            clause: id.clause().to_string(),
            name: id.title().to_string(),
            passed,
            measured: Vec::new(),
            threshold_text: String::new(),
        }
    }

    /// Appends a measurement.
    #[must_use]
    pub fn measure(mut self, label: &str, value: impl Into<MeasuredValue>) -> Self {
        self.measured.push(Measurement {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }

    /// Sets the threshold description.
    #[must_use]
    pub fn threshold(mut self, text: impl Into<String>) -> Self {
        self.threshold_text = text.into();
        self
    }

    /// Looks up a measurement by label.
    #[must_use]
    pub fn measurement(&self, label: &str) -> Option<&MeasuredValue> {
        self.measured
            .iter()
            .find(|m| m.label == label)
            .map(|m| &m.value)
    }
}

/// Ordered check results and the overall verdict for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Results in execution order.
    pub checks: Vec<CheckResult>,
    /// True only if every executed check passed and the face gate passed.
    pub overall_pass: bool,
    /// True only if a primary face existed and cleared the confidence gate.
    pub face_detected: bool,
    /// Number of face records the provider returned; only the first is evaluated.
    pub face_count: usize,
}

impl EvaluationReport {
    /// Returns the result for a check, if it ran.
    #[must_use]
    pub fn check(&self, id: CheckId) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.id == id)
    }

    /// Iterates over the checks that failed.
    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Evaluation output for one image file, as written by result outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageReport {
    /// Path to the evaluated image.
    pub path: String,
    /// Timestamp of evaluation (RFC 3339).
    pub timestamp: String,
    /// Image metadata the checks saw.
    pub image: ImageMeta,
    /// Check results and verdict.
    pub report: EvaluationReport,
    /// Optional EXIF metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<std::collections::HashMap<String, String>>,
}
