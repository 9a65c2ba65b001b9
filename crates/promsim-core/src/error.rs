//! Shared error type across promsim crates.

use thiserror::Error;

/// Stable error codes, used in logs and asserted by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Two descriptors share a metric name.
    DuplicateName,
    /// Counter asked to decrease.
    InvalidDelta,
    /// Label values do not match the descriptor's label names.
    InvalidLabels,
    /// Malformed metric name, label name, or bucket layout.
    InvalidDescriptor,
    /// A collector could not produce its samples.
    Collection,
    /// Configuration failed to parse or validate.
    BadConfig,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateName => "DUPLICATE_NAME",
            ErrorCode::InvalidDelta => "INVALID_DELTA",
            ErrorCode::InvalidLabels => "INVALID_LABELS",
            ErrorCode::InvalidDescriptor => "INVALID_DESCRIPTOR",
            ErrorCode::Collection => "COLLECTION",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PromError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum PromError {
    #[error("duplicate metric name: {0}")]
    DuplicateName(String),
    #[error("counter delta must be finite and non-negative, got {0}")]
    InvalidDelta(f64),
    #[error("metric {metric} expects {expected} label values, got {got}")]
    InvalidLabels {
        metric: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("collection failed ({owner}): {reason}")]
    Collection { owner: String, reason: String },
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PromError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PromError::DuplicateName(_) => ErrorCode::DuplicateName,
            PromError::InvalidDelta(_) => ErrorCode::InvalidDelta,
            PromError::InvalidLabels { .. } => ErrorCode::InvalidLabels,
            PromError::InvalidDescriptor(_) => ErrorCode::InvalidDescriptor,
            PromError::Collection { .. } => ErrorCode::Collection,
            PromError::BadConfig(_) => ErrorCode::BadConfig,
            PromError::Internal(_) => ErrorCode::Internal,
        }
    }
}
