//! Error types for evaluation inputs.
//!
//! A failed check is not an error: it is reported as `passed = false` in the
//! [`EvaluationReport`](crate::EvaluationReport). The variants here describe
//! inputs the caller must fix before an evaluation can run.

use thiserror::Error;

use crate::checks::CheckId;

/// Malformed or incomplete input to an evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// A face record lacks an attribute that a check needs.
    #[error("missing attribute `{field}` required by check {} ({check})", .check.number())]
    MissingAttribute {
        /// Provider attribute path, e.g. `Quality` or `Quality.Sharpness`.
        field: String,
        /// The check that needed it.
        check: CheckId,
    },

    /// A threshold override is not an acceptable number.
    #[error("invalid value for threshold `{name}`: {reason}")]
    InvalidConfigValue {
        /// Parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A threshold override names a parameter that does not exist.
    #[error("unknown threshold parameter `{0}`")]
    UnknownParameter(String),
}

/// Result alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvaluationError>;
