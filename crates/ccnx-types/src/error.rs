//! Shared error types for the CCNx control plane.

use thiserror::Error;

/// Top-level error type for recoverable failures.
///
/// Contract violations (empty component names, reuse of consumed values)
/// are panics, not variants of this enum.
#[derive(Error, Debug)]
pub enum CcnxError {
    /// A required key was absent from a structured document.
    #[error("Missing key '{0}'")]
    MissingKey(String),

    /// A key was present but held the wrong kind of value.
    #[error("Key '{key}' has wrong type, expected {expected}")]
    WrongKind {
        /// The offending key.
        key: String,
        /// The JSON kind that was expected.
        expected: &'static str,
    },

    /// A filename exceeded its fixed storage bound.
    #[error("Filename is {len} bytes, maximum is {max}")]
    FilenameTooLong {
        /// Length of the rejected filename in bytes.
        len: usize,
        /// Maximum accepted length in bytes.
        max: usize,
    },

    /// An address did not hold the payload its type tag promises.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A configuration document or setting was malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization/deserialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for Result with CcnxError.
pub type CcnxResult<T> = Result<T, CcnxError>;
