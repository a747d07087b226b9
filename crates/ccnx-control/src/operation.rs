//! CPI message types and operation codes.

use std::fmt;

/// Outer shape of a CPI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// `{"CPI_REQUEST": {...}}`
    Request,
    /// `{"CPI_RESPONSE": {...}}`
    Response,
    /// `{"CPI_ACK": {...}}`
    Ack,
}

impl MessageType {
    /// The outer key carrying this type.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Request => crate::envelope::CPI_REQUEST,
            Self::Response => crate::envelope::CPI_RESPONSE,
            Self::Ack => crate::envelope::CPI_ACK,
        }
    }

    /// Lower-case name for logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Ack => "ack",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a CPI message asks the forwarder to do.
///
/// Names a peer sends that are not in the table map to
/// [`CpiOperation::Unknown`], so newer peers can add operations without
/// breaking older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpiOperation {
    InterfaceUp,
    InterfaceDown,
    InterfaceList,
    PauseInput,
    ResumeInput,
    Flush,
    CancelFlow,
    AddRoute,
    RemoveRoute,
    PrefixRegistry,
    TransmitStatistics,
    Address,
    Unknown,
}

/// Wire names of the known operations.
pub mod names {
    pub const INTERFACE_UP: &str = "CPI_IF_UP";
    pub const INTERFACE_DOWN: &str = "CPI_IF_DOWN";
    pub const INTERFACE_LIST: &str = "CPI_INTERFACE_LIST";
    pub const PAUSE_INPUT: &str = "CPI_PAUSE";
    pub const RESUME_INPUT: &str = "CPI_RESUME";
    pub const FLUSH: &str = "CPI_FLUSH";
    pub const CANCEL_FLOW: &str = "CPI_CANCEL_FLOW";
    pub const ADD_ROUTE: &str = "REGISTER_PREFIX";
    pub const REMOVE_ROUTE: &str = "UNREGISTER_PREFIX";
    pub const PREFIX_REGISTRY: &str = "CPI_PREFIX_REGISTRY";
    pub const TRANSMIT_STATISTICS: &str = "CPI_TRANSMIT_STATS";
    pub const ADDRESS: &str = "CPI_ADDRESS";
}

const OPERATION_TABLE: &[(&str, CpiOperation)] = &[
    (names::INTERFACE_UP, CpiOperation::InterfaceUp),
    (names::INTERFACE_DOWN, CpiOperation::InterfaceDown),
    (names::INTERFACE_LIST, CpiOperation::InterfaceList),
    (names::PAUSE_INPUT, CpiOperation::PauseInput),
    (names::RESUME_INPUT, CpiOperation::ResumeInput),
    (names::FLUSH, CpiOperation::Flush),
    (names::CANCEL_FLOW, CpiOperation::CancelFlow),
    (names::ADD_ROUTE, CpiOperation::AddRoute),
    (names::REMOVE_ROUTE, CpiOperation::RemoveRoute),
    (names::PREFIX_REGISTRY, CpiOperation::PrefixRegistry),
    (names::TRANSMIT_STATISTICS, CpiOperation::TransmitStatistics),
    (names::ADDRESS, CpiOperation::Address),
];

impl CpiOperation {
    /// Classifies an operation name. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Self {
        OPERATION_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, op)| *op)
            .unwrap_or(Self::Unknown)
    }

    /// The wire name of a known operation.
    pub fn name(&self) -> Option<&'static str> {
        OPERATION_TABLE
            .iter()
            .find(|(_, op)| op == self)
            .map(|(name, _)| *name)
    }

    /// Every known operation, in table order.
    pub fn known() -> impl Iterator<Item = CpiOperation> {
        OPERATION_TABLE.iter().map(|(_, op)| *op)
    }
}

impl fmt::Display for CpiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("UNKNOWN"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_round_trip() {
        for op in CpiOperation::known() {
            let name = op.name().unwrap();
            assert_eq!(CpiOperation::from_name(name), op);
        }
        assert_eq!(CpiOperation::known().count(), 12);
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(CpiOperation::from_name("looney"), CpiOperation::Unknown);
        assert_eq!(CpiOperation::from_name("cpi_pause"), CpiOperation::Unknown);
        assert_eq!(CpiOperation::Unknown.name(), None);
        assert_eq!(CpiOperation::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_message_type_keys() {
        assert_eq!(MessageType::Request.key(), "CPI_REQUEST");
        assert_eq!(MessageType::Response.key(), "CPI_RESPONSE");
        assert_eq!(MessageType::Ack.key(), "CPI_ACK");
    }
}
