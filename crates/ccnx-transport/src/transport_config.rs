//! The pairing of one stack configuration and one connection configuration.
//!
//! A [`TransportConfig`] is the complete descriptor handed to the pipeline
//! builder. Ownership of its two halves is asymmetric, and the signature of
//! [`TransportConfig::new`] spells it out:
//!
//! - the stack configuration is *shared*: many transport configs may be built
//!   from one stack description, so the constructor borrows a
//!   [`Shared<StackConfig>`] and acquires its own reference;
//! - the connection configuration is *consumed*: it is moved in, and the
//!   caller has nothing left to reuse or drop.
//!
//! Dropping a `TransportConfig` releases the stack reference and drops the
//! connection configuration.

use crate::registry::{ConnectionConfig, StackConfig};
use ccnx_types::{Shared, Validate};
use std::fmt;

/// A complete pipeline descriptor.
#[derive(Debug)]
pub struct TransportConfig {
    stack: Shared<StackConfig>,
    connection: ConnectionConfig,
}

impl TransportConfig {
    /// Pairs a shared stack configuration with a connection configuration.
    pub fn new(stack: &Shared<StackConfig>, connection: ConnectionConfig) -> Self {
        debug_assert!(stack.is_valid(), "stack config is invalid");
        debug_assert!(connection.is_valid(), "connection config is invalid");
        Self {
            stack: stack.acquire(),
            connection,
        }
    }

    /// The stack configuration.
    pub fn stack_config(&self) -> &Shared<StackConfig> {
        &self.stack
    }

    /// The connection configuration.
    pub fn connection_config(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Splits the descriptor back into its two halves.
    pub fn into_parts(self) -> (Shared<StackConfig>, ConnectionConfig) {
        (self.stack, self.connection)
    }
}

impl Validate for TransportConfig {
    fn is_valid(&self) -> bool {
        self.stack.is_valid() && self.connection.is_valid()
    }
}

/// A deep copy: the copy gets its own stack configuration rather than
/// another reference to the original's.
impl Clone for TransportConfig {
    fn clone(&self) -> Self {
        Self {
            stack: Shared::new((*self.stack).clone()),
            connection: self.connection.clone(),
        }
    }
}

impl PartialEq for TransportConfig {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.stack == other.stack && self.connection == other.connection)
    }
}

impl Eq for TransportConfig {}

impl fmt::Display for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"stack\":{},\"connection\":{}}}", self.stack, self.connection)
    }
}
