//! Error types for PathSwitch

use crate::PathId;
use thiserror::Error;

/// Decision engine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Weights, margin or interval out of the accepted range
    #[error("config error: {0}")]
    Configuration(String),

    /// Telemetry source failed or timed out for a path
    #[error("telemetry unavailable for {path}: {reason}")]
    TelemetryUnavailable {
        /// Path that could not be measured
        path: PathId,
        /// Failure description
        reason: String,
    },

    /// Path label outside the closed path set
    #[error("unknown path id: {0}")]
    UnknownPathId(String),
}

/// Result type for the decision engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Profile store error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// No profile with this id
    #[error("profile not found: {0}")]
    NotFound(u64),

    /// A profile field failed validation
    #[error("invalid {field}: {message}")]
    Validation {
        /// Offending field (wire name)
        field: String,
        /// What was wrong with it
        message: String,
    },
}

impl ProfileError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;
