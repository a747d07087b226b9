//! Ready-made requests and the payloads they carry.
//!
//! Each builder fills in a fixed operation name and a minimal payload, then
//! delegates to [`CpiEncoder::create_request`].

use crate::envelope::{self, CpiEncoder};
use crate::error::{CpiError, CpiResult};
use crate::message::ControlMessage;
use crate::operation::names;
use ccnx_transport::TransmitStatisticsCommand;
use ccnx_types::{InterfaceDescriptor, Shared};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const IFIDX: &str = "IFIDX";
const PERIOD: &str = "PERIOD";
const PERIOD_SEC: &str = "SEC";
const PERIOD_USEC: &str = "USEC";
const FILENAME: &str = "FILENAME";
const INTERFACES: &str = "INTERFACES";

/// A route from a name prefix to an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Name prefix, e.g. `lci:/foo/bar`.
    #[serde(rename = "PREFIX")]
    pub prefix: String,
    /// Outbound interface index.
    #[serde(rename = "INTERFACE")]
    pub interface: u32,
    /// Route cost.
    #[serde(rename = "COST", default = "default_cost")]
    pub cost: u16,
}

fn default_cost() -> u16 {
    1
}

impl RouteEntry {
    /// A route with the default cost.
    pub fn new(prefix: impl Into<String>, interface: u32) -> Self {
        Self {
            prefix: prefix.into(),
            interface,
            cost: default_cost(),
        }
    }
}

impl CpiEncoder {
    fn request(&self, operation: &str, payload: Value) -> ControlMessage {
        ControlMessage::from_json(self.create_request(operation, payload))
    }

    /// Stop reading from the forwarder.
    pub fn pause_input_request(&self) -> ControlMessage {
        self.request(names::PAUSE_INPUT, json!({}))
    }

    /// Resume reading from the forwarder.
    pub fn resume_input_request(&self) -> ControlMessage {
        self.request(names::RESUME_INPUT, json!({}))
    }

    /// Drain everything queued in the stack.
    pub fn flush_request(&self) -> ControlMessage {
        self.request(names::FLUSH, json!({}))
    }

    /// Bring an interface up.
    pub fn interface_up_request(&self, ifidx: u32) -> ControlMessage {
        self.request(names::INTERFACE_UP, json!({ IFIDX: ifidx }))
    }

    /// Take an interface down.
    pub fn interface_down_request(&self, ifidx: u32) -> ControlMessage {
        self.request(names::INTERFACE_DOWN, json!({ IFIDX: ifidx }))
    }

    /// Ask for the forwarder's interfaces.
    pub fn interface_list_request(&self) -> ControlMessage {
        self.request(names::INTERFACE_LIST, json!({}))
    }

    /// Add a route.
    pub fn add_route_request(&self, route: &RouteEntry) -> CpiResult<ControlMessage> {
        Ok(self.request(names::ADD_ROUTE, serde_json::to_value(route)?))
    }

    /// Remove a route.
    pub fn remove_route_request(&self, route: &RouteEntry) -> CpiResult<ControlMessage> {
        Ok(self.request(names::REMOVE_ROUTE, serde_json::to_value(route)?))
    }

    /// Start periodic statistics output.
    pub fn transmit_statistics_request(&self, command: &TransmitStatisticsCommand) -> ControlMessage {
        let (seconds, microseconds) = command.period_parts();
        self.request(
            names::TRANSMIT_STATISTICS,
            json!({
                PERIOD: { PERIOD_SEC: seconds, PERIOD_USEC: microseconds },
                FILENAME: command.filename(),
            }),
        )
    }
}

fn require<'a>(body: &'a Value, key: &str) -> CpiResult<&'a Value> {
    body.get(key)
        .ok_or_else(|| ccnx_types::CcnxError::MissingKey(key.to_string()).into())
}

fn require_u64(body: &Value, key: &str) -> CpiResult<u64> {
    require(body, key)?.as_u64().ok_or_else(|| {
        ccnx_types::CcnxError::WrongKind {
            key: key.to_string(),
            expected: "unsigned integer",
        }
        .into()
    })
}

/// The interface index of an interface up/down body.
pub fn parse_interface_index(body: &Value) -> CpiResult<u32> {
    let ifidx = require_u64(body, IFIDX)?;
    u32::try_from(ifidx).map_err(|_| {
        ccnx_types::CcnxError::WrongKind {
            key: IFIDX.to_string(),
            expected: "32-bit interface index",
        }
        .into()
    })
}

/// The route of an add/remove route body.
pub fn parse_route(body: &Value) -> CpiResult<RouteEntry> {
    Ok(RouteEntry::deserialize(body)?)
}

/// Rebuilds the command carried by a transmit statistics body.
pub fn parse_transmit_statistics(body: &Value) -> CpiResult<Shared<TransmitStatisticsCommand>> {
    let period = require(body, PERIOD)?;
    let seconds = require_u64(period, PERIOD_SEC)?;
    let microseconds = require_u64(period, PERIOD_USEC)?;
    let filename = require(body, FILENAME)?.as_str().ok_or_else(|| {
        CpiError::from(ccnx_types::CcnxError::WrongKind {
            key: FILENAME.to_string(),
            expected: "string",
        })
    })?;
    let period = TransmitStatisticsCommand::period_from_parts(seconds, microseconds)?;
    Ok(TransmitStatisticsCommand::create(period, filename)?)
}

/// Answers an interface list request.
pub fn interface_list_response(
    request: &ControlMessage,
    interfaces: &[InterfaceDescriptor],
) -> CpiResult<ControlMessage> {
    let payload = json!({ INTERFACES: serde_json::to_value(interfaces)? });
    Ok(ControlMessage::from_json(envelope::create_response(
        request.json(),
        payload,
    )?))
}

/// The interfaces carried by an interface list response body.
pub fn parse_interface_list(body: &Value) -> CpiResult<Vec<InterfaceDescriptor>> {
    Ok(Vec::<InterfaceDescriptor>::deserialize(require(body, INTERFACES)?)?)
}
