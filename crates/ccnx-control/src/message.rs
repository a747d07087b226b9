//! The control message facade.

use crate::envelope;
use crate::error::CpiResult;
use crate::operation::{CpiOperation, MessageType};
use serde_json::Value;
use std::fmt;

/// A control message exchanged with the forwarder.
///
/// Wraps any JSON document. Documents shaped as CPI envelopes answer the
/// accessor methods; anything else reports an error from them and `false`
/// from [`ControlMessage::is_cpi`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMessage {
    json: Value,
}

impl ControlMessage {
    /// Wraps a document.
    pub fn from_json(json: Value) -> Self {
        Self { json }
    }

    /// Parses a document from text.
    pub fn parse(text: &str) -> CpiResult<Self> {
        Ok(Self::from_json(serde_json::from_str(text)?))
    }

    /// Returns true if the document is exactly one of request, response, or ack.
    pub fn is_cpi(&self) -> bool {
        envelope::message_type(&self.json).is_ok()
    }

    /// Request, response, or ack.
    pub fn message_type(&self) -> CpiResult<MessageType> {
        envelope::message_type(&self.json)
    }

    /// The classified operation.
    pub fn operation(&self) -> CpiResult<CpiOperation> {
        envelope::classify_operation(&self.json)
    }

    /// The operation name as carried on the wire.
    pub fn operation_name(&self) -> CpiResult<&str> {
        envelope::operation_name(&self.json)
    }

    /// The correlation sequence number.
    pub fn sequence_number(&self) -> CpiResult<u64> {
        envelope::sequence_number(&self.json)
    }

    /// The underlying document.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Consumes the message, returning its document.
    pub fn into_json(self) -> Value {
        self.json
    }

    /// Single-line rendering with no whitespace.
    pub fn to_compact_string(&self) -> String {
        self.json.to_string()
    }
}

impl From<Value> for ControlMessage {
    fn from(json: Value) -> Self {
        Self::from_json(json)
    }
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.json.fmt(f)
    }
}
