//! Protocol stack components and the fragments they contribute.
//!
//! Each component has a name unique within a stack. Building a pipeline
//! description means asking every component to add its fragment to the
//! stack configuration and to the connection configuration:
//!
//! ```
//! use ccnx_transport::components::{ApiConnector, MetisForwarder, ProtocolStack, TlvCodec};
//!
//! let config = ProtocolStack::new()
//!     .with(ApiConnector)
//!     .with(TlvCodec)
//!     .with(MetisForwarder::default())
//!     .transport_config();
//! assert!(config.stack_config().contains("FWD_METIS"));
//! ```

use crate::registry::{ConnectionConfig, StackConfig};
use crate::transport_config::TransportConfig;
use ccnx_types::Shared;
use serde_json::{json, Value};
use tracing::debug;

/// Stack-config key holding the ordered component list.
pub const PROTOCOL_STACK_NAME: &str = "STACK";

/// Key of the component list inside the [`PROTOCOL_STACK_NAME`] fragment.
pub const COMPONENTS_KEY: &str = "COMPONENTS";

/// The IANA assigned port for the CCN forwarder.
pub const METIS_DEFAULT_PORT: u16 = 9695;

/// Connection-config key of the Metis port.
pub const METIS_PORT_KEY: &str = "port";

/// Connection-config key of the local forwarder socket path.
pub const LOCAL_PATH_KEY: &str = "path";

/// A component that can appear in a protocol stack.
pub trait ProtocolComponent: Send + Sync {
    /// The name this component's fragments are stored under.
    fn name(&self) -> &'static str;

    /// Adds this component's fragment to the stack configuration.
    fn stack_config(&self, stack: &mut StackConfig) {
        stack.add(self.name(), json!({}));
    }

    /// Adds this component's fragment to the connection configuration.
    fn connection_config(&self, connection: &mut ConnectionConfig) {
        connection.add(self.name(), json!({}));
    }
}

/// The connector between the user API and the stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiConnector;

impl ProtocolComponent for ApiConnector {
    fn name(&self) -> &'static str {
        "API_CONNECTOR"
    }
}

/// The Vegas flow controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct VegasFlowController;

impl ProtocolComponent for VegasFlowController {
    fn name(&self) -> &'static str {
        "FC_VEGAS"
    }
}

/// The TLV wire codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlvCodec;

impl ProtocolComponent for TlvCodec {
    fn name(&self) -> &'static str {
        "CODEC_TLV"
    }
}

/// Connector to a Metis forwarder over TCP.
#[derive(Debug, Clone, Copy)]
pub struct MetisForwarder {
    /// Forwarder port.
    pub port: u16,
}

impl MetisForwarder {
    /// Stack name of the Metis connector.
    pub const NAME: &'static str = "FWD_METIS";

    /// A connector on the given port.
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

impl Default for MetisForwarder {
    fn default() -> Self {
        Self {
            port: METIS_DEFAULT_PORT,
        }
    }
}

impl ProtocolComponent for MetisForwarder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn connection_config(&self, connection: &mut ConnectionConfig) {
        connection.add(Self::NAME, json!({ METIS_PORT_KEY: self.port }));
    }
}

/// Reads the Metis port from a connection configuration.
///
/// Falls back to [`METIS_DEFAULT_PORT`] when the fragment is absent or the
/// port is not a valid `u16`.
pub fn metis_port_from_config(connection: &ConnectionConfig) -> u16 {
    connection
        .get(MetisForwarder::NAME)
        .and_then(|fragment| fragment.get(METIS_PORT_KEY))
        .and_then(Value::as_u64)
        .and_then(|port| u16::try_from(port).ok())
        .unwrap_or(METIS_DEFAULT_PORT)
}

/// Connector to an in-process forwarder over a unix socket.
#[derive(Debug, Clone)]
pub struct LocalForwarder {
    /// Socket path.
    pub path: String,
}

impl LocalForwarder {
    /// Stack name of the local connector.
    pub const NAME: &'static str = "FWD_LOCAL";

    /// A connector on the given socket path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl ProtocolComponent for LocalForwarder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn connection_config(&self, connection: &mut ConnectionConfig) {
        connection.add(Self::NAME, json!({ LOCAL_PATH_KEY: self.path }));
    }
}

/// An ordered list of components, from the API side down to the forwarder.
#[derive(Default)]
pub struct ProtocolStack {
    components: Vec<Box<dyn ProtocolComponent>>,
}

impl ProtocolStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a component below those already added.
    pub fn with(mut self, component: impl ProtocolComponent + 'static) -> Self {
        self.components.push(Box::new(component));
        self
    }

    /// Component names in pipeline order.
    pub fn names(&self) -> Vec<&'static str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Builds the stack configuration: every component's fragment plus the
    /// ordered component list under [`PROTOCOL_STACK_NAME`].
    pub fn stack_config(&self) -> StackConfig {
        let mut stack = StackConfig::new();
        write_components(&mut stack, &self.names());
        for component in &self.components {
            component.stack_config(&mut stack);
        }
        stack
    }

    /// Builds the connection configuration.
    pub fn connection_config(&self) -> ConnectionConfig {
        let mut connection = ConnectionConfig::new();
        for component in &self.components {
            component.connection_config(&mut connection);
        }
        connection
    }

    /// Builds both halves and pairs them.
    pub fn transport_config(&self) -> TransportConfig {
        let stack = Shared::new(self.stack_config());
        debug!(components = ?self.names(), "Built protocol stack description");
        TransportConfig::new(&stack, self.connection_config())
    }
}

/// Writes `{"STACK": {"COMPONENTS": [names...]}}` into a stack configuration.
pub fn write_components(stack: &mut StackConfig, names: &[&str]) {
    stack.add(PROTOCOL_STACK_NAME, json!({ COMPONENTS_KEY: names }));
}

/// Reads the ordered component list back out of a stack configuration.
pub fn read_components(stack: &StackConfig) -> Option<Vec<String>> {
    stack
        .get(PROTOCOL_STACK_NAME)?
        .get(COMPONENTS_KEY)?
        .as_array()?
        .iter()
        .map(|name| name.as_str().map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccnx_types::Validate;

    #[test]
    fn test_metis_fragments() {
        let mut stack = StackConfig::new();
        let mut conn = ConnectionConfig::new();
        let metis = MetisForwarder::default();
        metis.stack_config(&mut stack);
        metis.connection_config(&mut conn);

        assert_eq!(stack.get("FWD_METIS"), Some(&json!({})));
        assert_eq!(conn.get("FWD_METIS"), Some(&json!({"port": 9695})));
        assert_eq!(metis_port_from_config(&conn), 9695);
    }

    #[test]
    fn test_metis_port_from_config() {
        let mut conn = ConnectionConfig::new();
        MetisForwarder::with_port(10000).connection_config(&mut conn);
        assert_eq!(metis_port_from_config(&conn), 10000);
    }

    #[test]
    fn test_metis_port_defaults_when_malformed() {
        assert_eq!(metis_port_from_config(&ConnectionConfig::new()), 9695);

        let mut conn = ConnectionConfig::new();
        conn.add("FWD_METIS", json!({"port": 70000}));
        assert_eq!(metis_port_from_config(&conn), 9695);

        conn.add("FWD_METIS", json!({"port": "9000"}));
        assert_eq!(metis_port_from_config(&conn), 9695);
    }

    #[test]
    fn test_local_forwarder_fragment() {
        let mut conn = ConnectionConfig::new();
        LocalForwarder::new("/tmp/fwd.sock").connection_config(&mut conn);
        assert_eq!(conn.get("FWD_LOCAL"), Some(&json!({"path": "/tmp/fwd.sock"})));
    }

    #[test]
    fn test_stack_lists_components_in_order() {
        let stack = ProtocolStack::new()
            .with(ApiConnector)
            .with(VegasFlowController)
            .with(TlvCodec)
            .with(MetisForwarder::default());
        let config = stack.stack_config();
        assert_eq!(
            read_components(&config).unwrap(),
            vec!["API_CONNECTOR", "FC_VEGAS", "CODEC_TLV", "FWD_METIS"]
        );
        let names: Vec<_> = config.component_names().collect();
        assert_eq!(
            names,
            vec!["STACK", "API_CONNECTOR", "FC_VEGAS", "CODEC_TLV", "FWD_METIS"]
        );
    }

    #[test]
    fn test_transport_config_from_stack() {
        let config = ProtocolStack::new()
            .with(ApiConnector)
            .with(TlvCodec)
            .with(MetisForwarder::with_port(9000))
            .transport_config();
        assert!(config.is_valid());
        assert_eq!(metis_port_from_config(config.connection_config()), 9000);
        assert_eq!(config.stack_config().reference_count(), 1);
    }

    #[test]
    fn test_read_components_missing() {
        assert!(read_components(&StackConfig::new()).is_none());
    }
}
