//! CPI envelopes: building and reading requests, responses, and acks.
//!
//! Every control message is a JSON document with one outer key naming its
//! type and an inner object carrying a sequence number and one operation:
//!
//! ```text
//! {"CPI_REQUEST":  {"SEQUENCE": 7, "CPI_PAUSE": {}}}
//! {"CPI_RESPONSE": {"SEQUENCE": 7, "CPI_PAUSE": {...}}}
//! {"CPI_ACK":      {"SEQUENCE": 7, "RETURN": "ACK", "REQUEST": {...}}}
//! ```
//!
//! A request takes a fresh number from a [`SequenceCounter`]. A response or
//! ack copies the number of the request it answers, which is how the sender
//! correlates them.

use crate::error::{CpiError, CpiResult};
use crate::operation::{CpiOperation, MessageType};
use crate::sequence::SequenceCounter;
use serde_json::{Map, Value};
use tracing::trace;

/// Outer key of a request.
pub const CPI_REQUEST: &str = "CPI_REQUEST";
/// Outer key of a response.
pub const CPI_RESPONSE: &str = "CPI_RESPONSE";
/// Outer key of an acknowledgement.
pub const CPI_ACK: &str = "CPI_ACK";
/// Inner key of the sequence number.
pub const SEQUENCE: &str = "SEQUENCE";

const ACK_RETURN: &str = "RETURN";
const ACK_REQUEST: &str = "REQUEST";
const ACK_MESSAGE: &str = "MESSAGE";

/// Builds requests, numbering each from its counter.
#[derive(Debug, Clone)]
pub struct CpiEncoder {
    counter: SequenceCounter,
}

impl CpiEncoder {
    /// An encoder drawing from `counter`.
    pub fn new(counter: SequenceCounter) -> Self {
        Self { counter }
    }

    /// An encoder drawing from the process-wide counter.
    pub fn process() -> Self {
        Self::new(SequenceCounter::process())
    }

    /// The counter this encoder draws from.
    pub fn counter(&self) -> &SequenceCounter {
        &self.counter
    }

    /// Wraps `payload` as operation `operation` in a new request.
    ///
    /// # Panics
    ///
    /// Panics if `operation` is empty or is the reserved `SEQUENCE` key.
    pub fn create_request(&self, operation: &str, payload: Value) -> Value {
        assert!(
            !operation.is_empty() && operation != SEQUENCE,
            "invalid CPI operation name '{operation}'"
        );
        let sequence = self.counter.next();
        trace!(sequence, operation, "Created CPI request");
        wrap(CPI_REQUEST, sequence, operation, payload)
    }
}

fn wrap(outer: &str, sequence: u64, operation: &str, payload: Value) -> Value {
    let mut inner = Map::new();
    inner.insert(SEQUENCE.to_string(), Value::from(sequence));
    inner.insert(operation.to_string(), payload);
    let mut envelope = Map::new();
    envelope.insert(outer.to_string(), Value::Object(inner));
    Value::Object(envelope)
}

fn inner<'a>(envelope: &'a Value, key: &'static str) -> CpiResult<&'a Map<String, Value>> {
    envelope
        .get(key)
        .ok_or(CpiError::MissingEnvelope(key))?
        .as_object()
        .ok_or_else(|| CpiError::NotAnObject(key.to_string()))
}

fn sequence_of(inner: &Map<String, Value>) -> CpiResult<u64> {
    inner
        .get(SEQUENCE)
        .ok_or(CpiError::MissingSequence)?
        .as_u64()
        .ok_or(CpiError::InvalidSequence)
}

/// The first key other than `SEQUENCE`. Envelopes carry exactly one.
fn operation_of(inner: &Map<String, Value>) -> CpiResult<(&str, &Value)> {
    inner
        .iter()
        .find(|(key, _)| key.as_str() != SEQUENCE)
        .map(|(key, value)| (key.as_str(), value))
        .ok_or(CpiError::MissingOperation)
}

fn parse<'a>(envelope: &'a Value, key: &'static str) -> CpiResult<(&'a str, &'a Value)> {
    let inner = inner(envelope, key)?;
    sequence_of(inner)?;
    operation_of(inner)
}

/// Answers `request` with `payload`, copying its sequence number and
/// operation name.
pub fn create_response(request: &Value, payload: Value) -> CpiResult<Value> {
    let inner = inner(request, CPI_REQUEST)?;
    let sequence = sequence_of(inner)?;
    let (operation, _) = operation_of(inner)?;
    trace!(sequence, operation, "Created CPI response");
    Ok(wrap(CPI_RESPONSE, sequence, operation, payload))
}

/// The operation name and body of a request.
pub fn parse_request(envelope: &Value) -> CpiResult<(&str, &Value)> {
    parse(envelope, CPI_REQUEST)
}

/// The operation name and body of a response.
pub fn parse_response(envelope: &Value) -> CpiResult<(&str, &Value)> {
    parse(envelope, CPI_RESPONSE)
}

/// Which of request, response, or ack `envelope` is.
///
/// Fails if none or more than one of the outer keys is present.
pub fn message_type(envelope: &Value) -> CpiResult<MessageType> {
    let object = envelope.as_object().ok_or(CpiError::NotCpi)?;
    let mut found = [MessageType::Request, MessageType::Response, MessageType::Ack]
        .into_iter()
        .filter(|kind| object.contains_key(kind.key()));
    match (found.next(), found.next()) {
        (Some(kind), None) => Ok(kind),
        (None, _) => Err(CpiError::NotCpi),
        (Some(_), Some(_)) => Err(CpiError::AmbiguousType),
    }
}

/// The sequence number of a request, response, or ack.
pub fn sequence_number(envelope: &Value) -> CpiResult<u64> {
    let kind = message_type(envelope)?;
    sequence_of(inner(envelope, kind.key())?)
}

/// The operation name carried by a request, response, or ack.
///
/// For an ack this is the operation of the request it acknowledges.
pub fn operation_name(envelope: &Value) -> CpiResult<&str> {
    match message_type(envelope)? {
        MessageType::Request => parse_request(envelope).map(|(name, _)| name),
        MessageType::Response => parse_response(envelope).map(|(name, _)| name),
        MessageType::Ack => {
            let request = parse_ack(envelope)?.request;
            operation_of(request).map(|(name, _)| name)
        }
    }
}

/// Classifies the operation of a request, response, or ack.
///
/// Well-formed envelopes with unrecognised operation names classify as
/// [`CpiOperation::Unknown`].
pub fn classify_operation(envelope: &Value) -> CpiResult<CpiOperation> {
    operation_name(envelope).map(CpiOperation::from_name)
}

/// Contents of an ack or nack.
#[derive(Debug, Clone, PartialEq)]
pub struct AckInfo<'a> {
    /// Sequence number of the acknowledged request.
    pub sequence: u64,
    /// True for an ack, false for a nack.
    pub success: bool,
    /// Explanation attached to a nack.
    pub message: Option<&'a str>,
    /// Inner object of the acknowledged request.
    pub request: &'a Map<String, Value>,
}

/// Acknowledges `request` as successful.
pub fn create_ack(request: &Value) -> CpiResult<Value> {
    acknowledge(request, true, None)
}

/// Acknowledges `request` as failed, with a reason.
pub fn create_nack(request: &Value, reason: &str) -> CpiResult<Value> {
    acknowledge(request, false, Some(reason))
}

fn acknowledge(request: &Value, success: bool, reason: Option<&str>) -> CpiResult<Value> {
    let request_inner = inner(request, CPI_REQUEST)?;
    let sequence = sequence_of(request_inner)?;
    operation_of(request_inner)?;

    let mut ack = Map::new();
    ack.insert(SEQUENCE.to_string(), Value::from(sequence));
    let status = if success { "ACK" } else { "NACK" };
    ack.insert(ACK_RETURN.to_string(), Value::from(status));
    ack.insert(
        ACK_REQUEST.to_string(),
        Value::Object(request_inner.clone()),
    );
    if let Some(reason) = reason {
        ack.insert(ACK_MESSAGE.to_string(), Value::from(reason));
    }
    let mut envelope = Map::new();
    envelope.insert(CPI_ACK.to_string(), Value::Object(ack));
    Ok(Value::Object(envelope))
}

/// Reads an ack or nack.
pub fn parse_ack(envelope: &Value) -> CpiResult<AckInfo<'_>> {
    let ack = inner(envelope, CPI_ACK)?;
    let sequence = sequence_of(ack)?;
    let success = match ack.get(ACK_RETURN).and_then(Value::as_str) {
        Some("ACK") => true,
        Some("NACK") => false,
        Some(_) => return Err(CpiError::InvalidAck("RETURN is neither ACK nor NACK")),
        None => return Err(CpiError::InvalidAck("missing RETURN")),
    };
    let request = ack
        .get(ACK_REQUEST)
        .ok_or(CpiError::InvalidAck("missing REQUEST"))?
        .as_object()
        .ok_or_else(|| CpiError::NotAnObject(ACK_REQUEST.to_string()))?;
    Ok(AckInfo {
        sequence,
        success,
        message: ack.get(ACK_MESSAGE).and_then(Value::as_str),
        request,
    })
}
