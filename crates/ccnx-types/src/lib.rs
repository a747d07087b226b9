//! Core value types for the CCNx control plane.
//!
//! This crate defines the data structures shared by the transport
//! configuration layer and the Control Plane Interface (CPI): network
//! addresses, interface descriptors, the counted [`shared::Shared`] handle,
//! and the common error type. It contains no protocol logic.

pub mod address;
pub mod error;
pub mod interface;
pub mod shared;

pub use address::{AddressDescriptor, AddressList, AddressType};
pub use error::{CcnxError, CcnxResult};
pub use interface::{InterfaceDescriptor, InterfaceState};
pub use shared::Shared;

/// Validity check shared by every configuration entity.
///
/// Implemented for `Option<&T>` as well, so an absent value is never valid.
pub trait Validate {
    /// Returns true if the value is structurally well-formed.
    fn is_valid(&self) -> bool;
}

impl<T: Validate> Validate for Option<&T> {
    fn is_valid(&self) -> bool {
        self.is_some_and(|value| value.is_valid())
    }
}

impl<T: Validate> Validate for Shared<T> {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }
}
