//! Answering requests on the forwarder side.

use crate::envelope;
use crate::error::{CpiError, CpiResult};
use crate::message::ControlMessage;
use crate::operation::{CpiOperation, MessageType};
use serde_json::Value;
use tracing::{debug, warn};

/// Handles the operations of incoming requests.
///
/// `name` is the operation as carried on the wire, so handlers can still
/// act on operations that classify as [`CpiOperation::Unknown`]. An `Err`
/// is sent back to the requester as a nack carrying the message.
pub trait CpiDispatcher {
    fn handle(&self, operation: CpiOperation, name: &str, body: &Value) -> Result<Value, String>;
}

impl<F> CpiDispatcher for F
where
    F: Fn(CpiOperation, &str, &Value) -> Result<Value, String>,
{
    fn handle(&self, operation: CpiOperation, name: &str, body: &Value) -> Result<Value, String> {
        self(operation, name, body)
    }
}

/// Runs `request` through `dispatcher` and builds the reply.
///
/// Success becomes a response with the handler's payload; failure becomes a
/// nack. Both carry the request's sequence number. Fails only when
/// `request` is not a well-formed request.
pub fn respond(request: &ControlMessage, dispatcher: &dyn CpiDispatcher) -> CpiResult<ControlMessage> {
    let kind = request.message_type()?;
    if kind != MessageType::Request {
        return Err(CpiError::UnexpectedType {
            expected: MessageType::Request.as_str(),
            actual: kind.as_str(),
        });
    }

    let (name, body) = envelope::parse_request(request.json())?;
    let operation = CpiOperation::from_name(name);
    let sequence = request.sequence_number()?;

    let reply = match dispatcher.handle(operation, name, body) {
        Ok(payload) => {
            debug!(sequence, operation = name, "CPI request handled");
            envelope::create_response(request.json(), payload)?
        }
        Err(reason) => {
            warn!(sequence, operation = name, %reason, "CPI request rejected");
            envelope::create_nack(request.json(), &reason)?
        }
    };
    Ok(ControlMessage::from_json(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{parse_ack, parse_response, CpiEncoder};
    use crate::sequence::SequenceCounter;
    use serde_json::json;

    struct Echo;

    impl CpiDispatcher for Echo {
        fn handle(&self, operation: CpiOperation, _name: &str, body: &Value) -> Result<Value, String> {
            match operation {
                CpiOperation::Unknown => Err("unsupported".to_string()),
                _ => Ok(body.clone()),
            }
        }
    }

    fn encoder() -> CpiEncoder {
        CpiEncoder::new(SequenceCounter::starting_at(100))
    }

    #[test]
    fn test_respond_success() {
        let request = encoder().interface_up_request(6);
        let reply = respond(&request, &Echo).unwrap();
        assert_eq!(reply.message_type().unwrap(), MessageType::Response);
        assert_eq!(reply.sequence_number().unwrap(), 100);
        let (name, body) = parse_response(reply.json()).unwrap();
        assert_eq!(name, "CPI_IF_UP");
        assert_eq!(body, &json!({"IFIDX": 6}));
    }

    #[test]
    fn test_respond_failure_is_nack() {
        let request =
            ControlMessage::from_json(encoder().create_request("CPI_FUTURE", json!({})));
        let reply = respond(&request, &Echo).unwrap();
        assert_eq!(reply.message_type().unwrap(), MessageType::Ack);
        let info = parse_ack(reply.json()).unwrap();
        assert!(!info.success);
        assert_eq!(info.sequence, 100);
        assert_eq!(info.message, Some("unsupported"));
    }

    #[test]
    fn test_closure_dispatcher_sees_wire_name() {
        let request =
            ControlMessage::from_json(encoder().create_request("CPI_FUTURE", json!({"v": 1})));
        let dispatcher = |operation: CpiOperation, name: &str, _body: &Value| -> Result<Value, String> {
            assert_eq!(operation, CpiOperation::Unknown);
            Ok(json!({ "seen": name }))
        };
        let reply = respond(&request, &dispatcher).unwrap();
        let (_, body) = parse_response(reply.json()).unwrap();
        assert_eq!(body, &json!({"seen": "CPI_FUTURE"}));
    }

    #[test]
    fn test_respond_rejects_response() {
        let request = encoder().flush_request();
        let reply = respond(&request, &Echo).unwrap();
        assert!(matches!(
            respond(&reply, &Echo),
            Err(CpiError::UnexpectedType {
                expected: "request",
                actual: "response"
            })
        ));
        assert!(respond(&ControlMessage::from_json(json!({})), &Echo).is_err());
    }
}
