//! Protocol stack and connection configuration for the CCNx transport.
//!
//! Components contribute named fragments to a [`StackConfig`] and a
//! [`ConnectionConfig`]; the two are paired into a [`TransportConfig`] and
//! handed to the pipeline builder. This crate produces the description only.
//!
//! ## Architecture
//!
//! - **registry**: the two component registries
//! - **transport_config**: the shared-stack / owned-connection pairing
//! - **components**: the standard components and their fragments
//! - **settings**: file and environment driven stack selection
//! - **commands**: reference-counted transport commands

pub mod commands;
pub mod components;
pub mod registry;
pub mod settings;
pub mod transport_config;

pub use commands::{CreateProtocolStackCommand, TransmitStatisticsCommand, TransportCommand};
pub use components::{ProtocolComponent, ProtocolStack};
pub use registry::{ComponentConfig, ConnectionConfig, StackConfig};
pub use settings::{load_settings, ForwarderKind, TransportSettings};
pub use transport_config::TransportConfig;
