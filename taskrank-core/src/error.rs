//! Error types for the scoring core.
//!
//! Only batch-level shape problems become errors. Field-level problems inside
//! a task are absorbed by the sanitizer and never reach this type.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The top-level request has the wrong shape (e.g. `tasks` missing).
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Caller-supplied custom weights are structurally unusable.
    #[error("invalid custom weights: {message}")]
    InvalidCustomWeights { message: String },

    /// A configured urgency scale breaks range or monotonicity rules.
    #[error("invalid urgency scale: {message}")]
    InvalidUrgencyScale { message: String },

    /// Not an IANA timezone name.
    #[error("invalid timezone: {name}")]
    InvalidTimezone { name: String },
}

impl CoreError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn invalid_weights(message: impl Into<String>) -> Self {
        Self::InvalidCustomWeights {
            message: message.into(),
        }
    }

    /// Short machine-readable tag, used by the HTTP boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidRequest { .. } => "invalid_request",
            CoreError::InvalidCustomWeights { .. } => "invalid_custom_weights",
            CoreError::InvalidUrgencyScale { .. } => "invalid_urgency_scale",
            CoreError::InvalidTimezone { .. } => "invalid_timezone",
        }
    }
}
