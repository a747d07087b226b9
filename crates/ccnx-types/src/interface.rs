//! Network interface descriptors.
//!
//! An [`InterfaceDescriptor`] names one interface of the forwarder by its
//! index and carries its addresses. The index and address list are fixed at
//! construction; only the state changes afterwards. The index is the lookup
//! key wherever interfaces are collected.

use crate::address::AddressList;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative state of an interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterfaceState {
    /// State has not been reported.
    #[default]
    Unknown,
    /// Interface is up.
    Up,
    /// Interface is down.
    Down,
}

impl InterfaceState {
    /// The wire token for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One network interface: index, state, and addresses.
///
/// `Clone` is a deep copy. Equality compares index, state, and the ordered
/// address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    #[serde(rename = "IFIDX")]
    index: u32,
    #[serde(rename = "STATE", default)]
    state: InterfaceState,
    #[serde(rename = "ADDRS", default)]
    addresses: AddressList,
}

impl InterfaceDescriptor {
    /// Creates a descriptor in the `Unknown` state, taking ownership of `addresses`.
    pub fn new(index: u32, addresses: AddressList) -> Self {
        Self {
            index,
            state: InterfaceState::Unknown,
            addresses,
        }
    }

    /// The interface index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The interface addresses, in the order supplied at construction.
    pub fn addresses(&self) -> &AddressList {
        &self.addresses
    }

    /// The current state.
    pub fn state(&self) -> InterfaceState {
        self.state
    }

    /// Replaces the state.
    pub fn set_state(&mut self, state: InterfaceState) {
        self.state = state;
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ .ifidx={} .state={} .addrs={} }}",
            self.index, self.state, self.addresses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressDescriptor;

    fn two_address_list() -> AddressList {
        AddressList::new()
            .append(AddressDescriptor::from_interface(1))
            .append(AddressDescriptor::from_interface(2))
    }

    #[test]
    fn test_create_defaults_to_unknown() {
        let iface = InterfaceDescriptor::new(1, AddressList::new());
        assert_eq!(iface.index(), 1);
        assert_eq!(iface.state(), InterfaceState::Unknown);
        assert!(iface.addresses().is_empty());
    }

    #[test]
    fn test_get_addresses_matches_input() {
        let list = two_address_list();
        let iface = InterfaceDescriptor::new(1, list.clone());
        assert_eq!(iface.addresses(), &list);
    }

    #[test]
    fn test_set_state() {
        let mut iface = InterfaceDescriptor::new(1, two_address_list());
        iface.set_state(InterfaceState::Up);
        assert_eq!(iface.state(), InterfaceState::Up);
        iface.set_state(InterfaceState::Down);
        assert_eq!(iface.state(), InterfaceState::Down);
    }

    #[test]
    fn test_copy_is_equal_and_independent() {
        let original = InterfaceDescriptor::new(1, two_address_list());
        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert_eq!(copy.addresses(), original.addresses());

        copy.set_state(InterfaceState::Up);
        assert_ne!(copy, original);
        assert_eq!(original, original.clone());
        assert_eq!(original.state(), InterfaceState::Unknown);
    }

    #[test]
    fn test_equality_requires_same_index() {
        let a = InterfaceDescriptor::new(1, two_address_list());
        let b = InterfaceDescriptor::new(2, two_address_list());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_is_idempotent() {
        let iface = InterfaceDescriptor::new(1, two_address_list());
        let first = iface.to_string();
        let second = iface.to_string();
        assert_eq!(first, second);
        assert_eq!(first, "{ .ifidx=1 .state=UNKNOWN .addrs=[IFACE 1, IFACE 2] }");
    }

    #[test]
    fn test_json_form() {
        let mut iface = InterfaceDescriptor::new(3, two_address_list());
        iface.set_state(InterfaceState::Up);
        let json = serde_json::to_value(&iface).unwrap();
        assert_eq!(json["IFIDX"], 3);
        assert_eq!(json["STATE"], "UP");
        assert_eq!(json["ADDRS"].as_array().unwrap().len(), 2);
        let back: InterfaceDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, iface);
    }
}
