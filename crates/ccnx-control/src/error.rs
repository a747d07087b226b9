//! Errors from the control plane layer.

use ccnx_types::CcnxError;
use thiserror::Error;

/// Why a CPI document could not be built or read.
///
/// Every variant describes malformed input from a peer or caller. Unknown
/// operation names are not errors.
#[derive(Debug, Error)]
pub enum CpiError {
    #[error("Not a CPI message: none of CPI_REQUEST, CPI_RESPONSE, CPI_ACK present")]
    NotCpi,
    #[error("Ambiguous CPI message: more than one of CPI_REQUEST, CPI_RESPONSE, CPI_ACK present")]
    AmbiguousType,
    #[error("Missing envelope key '{0}'")]
    MissingEnvelope(&'static str),
    #[error("Value of '{0}' is not a JSON object")]
    NotAnObject(String),
    #[error("Missing SEQUENCE")]
    MissingSequence,
    #[error("SEQUENCE is not an unsigned integer")]
    InvalidSequence,
    #[error("No operation in envelope")]
    MissingOperation,
    #[error("Malformed ack: {0}")]
    InvalidAck(&'static str),
    #[error("Expected a {expected} message, got {actual}")]
    UnexpectedType {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Ccnx(#[from] CcnxError),
}

/// Alias for control plane results.
pub type CpiResult<T> = Result<T, CpiError>;
