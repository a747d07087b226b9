//! Integration tests for the request / reply exchange.
//!
//! A mock forwarder answers requests through the real dispatcher. Messages
//! cross between the two sides as text, the way they would on a socket,
//! and the application side matches replies to its outstanding requests by
//! sequence number.

use ccnx_control::envelope::{self, parse_ack};
use ccnx_control::requests::{
    interface_list_response, parse_interface_index, parse_interface_list, parse_route,
};
use ccnx_control::{
    respond, ControlMessage, CpiDispatcher, CpiEncoder, CpiOperation, MessageType, RouteEntry,
    SequenceCounter,
};
use ccnx_types::{AddressDescriptor, AddressList, InterfaceDescriptor, InterfaceState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Mock forwarder
// ---------------------------------------------------------------------------

struct MockForwarder {
    interfaces: Mutex<Vec<InterfaceDescriptor>>,
    routes: Mutex<Vec<RouteEntry>>,
}

impl MockForwarder {
    fn new() -> Self {
        let interfaces = (1..=2)
            .map(|index| {
                InterfaceDescriptor::new(
                    index,
                    AddressList::new().append(AddressDescriptor::from_interface(index)),
                )
            })
            .collect();
        Self {
            interfaces: Mutex::new(interfaces),
            routes: Mutex::new(Vec::new()),
        }
    }

    fn set_state(&self, body: &Value, state: InterfaceState) -> Result<Value, String> {
        let ifidx = parse_interface_index(body).map_err(|e| e.to_string())?;
        let mut interfaces = self.interfaces.lock().unwrap();
        let iface = interfaces
            .iter_mut()
            .find(|iface| iface.index() == ifidx)
            .ok_or_else(|| format!("no interface {ifidx}"))?;
        iface.set_state(state);
        Ok(json!({}))
    }

    /// Handles one message of text and returns the reply as text.
    fn receive(&self, text: &str) -> String {
        let request = ControlMessage::parse(text).unwrap();
        let reply = if request.operation().unwrap() == CpiOperation::InterfaceList {
            let interfaces = self.interfaces.lock().unwrap().clone();
            interface_list_response(&request, &interfaces).unwrap()
        } else {
            respond(&request, self).unwrap()
        };
        reply.to_compact_string()
    }
}

impl CpiDispatcher for MockForwarder {
    fn handle(&self, operation: CpiOperation, name: &str, body: &Value) -> Result<Value, String> {
        match operation {
            CpiOperation::InterfaceUp => self.set_state(body, InterfaceState::Up),
            CpiOperation::InterfaceDown => self.set_state(body, InterfaceState::Down),
            CpiOperation::AddRoute => {
                let route = parse_route(body).map_err(|e| e.to_string())?;
                self.routes.lock().unwrap().push(route);
                Ok(json!({}))
            }
            CpiOperation::PauseInput | CpiOperation::ResumeInput | CpiOperation::Flush => {
                Ok(json!({}))
            }
            _ => Err(format!("unsupported operation {name}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Application side
// ---------------------------------------------------------------------------

struct Application {
    encoder: CpiEncoder,
    pending: HashMap<u64, ControlMessage>,
}

impl Application {
    fn new() -> Self {
        Self {
            encoder: CpiEncoder::new(SequenceCounter::new()),
            pending: HashMap::new(),
        }
    }

    fn send(&mut self, request: ControlMessage) -> String {
        let sequence = request.sequence_number().unwrap();
        let text = request.to_compact_string();
        self.pending.insert(sequence, request);
        text
    }

    /// Matches a reply to its request and removes the request from the
    /// outstanding set.
    fn complete(&mut self, text: &str) -> (ControlMessage, ControlMessage) {
        let reply = ControlMessage::parse(text).unwrap();
        let request = self
            .pending
            .remove(&reply.sequence_number().unwrap())
            .expect("reply for an unknown request");
        (request, reply)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_interface_up_round_trip() {
    let forwarder = MockForwarder::new();
    let mut app = Application::new();

    let text = app.send(app.encoder.interface_up_request(2));
    let reply_text = forwarder.receive(&text);
    let (request, reply) = app.complete(&reply_text);

    assert_eq!(reply.message_type().unwrap(), MessageType::Response);
    assert_eq!(reply.operation().unwrap(), CpiOperation::InterfaceUp);
    assert_eq!(reply.operation_name().unwrap(), request.operation_name().unwrap());
    assert_eq!(
        forwarder.interfaces.lock().unwrap()[1].state(),
        InterfaceState::Up
    );
    assert!(app.pending.is_empty());
}

#[test]
fn test_replies_out_of_order_still_correlate() {
    let forwarder = MockForwarder::new();
    let mut app = Application::new();

    let first = app.send(app.encoder.pause_input_request());
    let second = app.send(
        app.encoder
            .add_route_request(&RouteEntry::new("lci:/foo", 1))
            .unwrap(),
    );
    let third = app.send(app.encoder.resume_input_request());

    for text in [third, first, second] {
        let reply_text = forwarder.receive(&text);
        let (request, reply) = app.complete(&reply_text);
        assert_eq!(
            request.sequence_number().unwrap(),
            reply.sequence_number().unwrap()
        );
        assert_eq!(request.operation().unwrap(), reply.operation().unwrap());
    }
    assert!(app.pending.is_empty());
    assert_eq!(forwarder.routes.lock().unwrap().len(), 1);
}

#[test]
fn test_interface_list_exchange() {
    let forwarder = MockForwarder::new();
    let mut app = Application::new();

    let up = app.send(app.encoder.interface_up_request(1));
    app.complete(&forwarder.receive(&up));

    let list = app.send(app.encoder.interface_list_request());
    let (_, reply) = app.complete(&forwarder.receive(&list));
    let (_, body) = envelope::parse_response(reply.json()).unwrap();
    let interfaces = parse_interface_list(body).unwrap();

    assert_eq!(interfaces.len(), 2);
    assert_eq!(interfaces[0].state(), InterfaceState::Up);
    assert_eq!(interfaces[1].state(), InterfaceState::Unknown);
    assert_eq!(interfaces[1].addresses().len(), 1);
}

#[test]
fn test_unknown_operation_is_nacked() {
    let forwarder = MockForwarder::new();
    let mut app = Application::new();

    let request = ControlMessage::from_json(
        app.encoder
            .create_request("CPI_SOMETHING_NEW", json!({"version": 2})),
    );
    assert_eq!(request.operation().unwrap(), CpiOperation::Unknown);

    let text = app.send(request);
    let (request, reply) = app.complete(&forwarder.receive(&text));

    assert_eq!(reply.message_type().unwrap(), MessageType::Ack);
    assert_eq!(reply.operation_name().unwrap(), "CPI_SOMETHING_NEW");
    let info = parse_ack(reply.json()).unwrap();
    assert!(!info.success);
    assert_eq!(info.sequence, request.sequence_number().unwrap());
    assert_eq!(
        info.message,
        Some("unsupported operation CPI_SOMETHING_NEW")
    );
}

#[test]
fn test_handler_error_is_nacked() {
    let forwarder = MockForwarder::new();
    let mut app = Application::new();

    let text = app.send(app.encoder.interface_down_request(9));
    let (_, reply) = app.complete(&forwarder.receive(&text));

    let info = parse_ack(reply.json()).unwrap();
    assert!(!info.success);
    assert_eq!(info.message, Some("no interface 9"));
    assert_eq!(reply.operation().unwrap(), CpiOperation::InterfaceDown);
}
