//! Shared error type across labelgate crates.

use thiserror::Error;

/// Stable error codes (used in logs, metrics labels, and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Inbound review could not be decoded.
    MalformedEnvelope,
    /// A rule could not interpret the object it was given.
    InternalFault,
    /// Configuration rejected at load time.
    InvalidConfig,
    /// Unsupported config or protocol version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedEnvelope => "MALFORMED_ENVELOPE",
            ErrorCode::InternalFault => "INTERNAL_FAULT",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AdmissionError>;

/// Unified error type used by core and webhook.
///
/// A policy violation is deliberately absent: a denial is a successful
/// evaluation and is carried by `Verdict`, never by this type.
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("malformed admission review: {0}")]
    MalformedEnvelope(String),
    #[error("internal evaluation fault: {0}")]
    InternalFault(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AdmissionError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AdmissionError::MalformedEnvelope(_) => ErrorCode::MalformedEnvelope,
            AdmissionError::InternalFault(_) => ErrorCode::InternalFault,
            AdmissionError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            AdmissionError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            AdmissionError::Internal(_) => ErrorCode::Internal,
        }
    }
}
