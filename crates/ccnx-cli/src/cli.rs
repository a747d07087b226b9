//! Clap CLI definitions for ccnx.

use ccnx_transport::ForwarderKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const AFTER_HELP: &str = "\
\x1b[1;36mExamples:\x1b[0m
  ccnx config                       Show the transport config for the current settings
  ccnx config --forwarder local     Same, with a local forwarder
  ccnx cpi pause                    Print a pause input request
  ccnx cpi interface-up 3           Print an interface up request
  ccnx cpi raw CPI_FLUSH --body {}  Print a request for any operation
  ccnx inspect '<json>'             Describe a CPI message (reads stdin if omitted)";

/// ccnx: CCNx transport configuration and control plane tool.
#[derive(Parser)]
#[command(name = "ccnx", version, about, after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to the transport settings file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the stack and connection configuration the settings produce.
    Config {
        /// Forwarder connector to use (metis or local).
        #[arg(long)]
        forwarder: Option<ForwarderKind>,
        /// Metis forwarder port.
        #[arg(long)]
        port: Option<u16>,
        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Build a control plane request [*].
    #[command(subcommand)]
    Cpi(CpiCommands),
    /// Describe a CPI message.
    Inspect {
        /// The message text. Read from stdin when omitted.
        message: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CpiCommands {
    /// Stop reading from the forwarder.
    Pause,
    /// Resume reading from the forwarder.
    Resume,
    /// Drain queued messages.
    Flush,
    /// Bring an interface up.
    InterfaceUp { ifidx: u32 },
    /// Take an interface down.
    InterfaceDown { ifidx: u32 },
    /// List the forwarder's interfaces.
    InterfaceList,
    /// Register a route.
    AddRoute {
        prefix: String,
        ifidx: u32,
        #[arg(long, default_value_t = 1)]
        cost: u16,
    },
    /// Unregister a route.
    RemoveRoute {
        prefix: String,
        ifidx: u32,
        #[arg(long, default_value_t = 1)]
        cost: u16,
    },
    /// Start periodic statistics output to a file.
    Stats {
        /// Period in seconds.
        seconds: u64,
        filename: String,
    },
    /// A request for any operation name.
    Raw {
        operation: String,
        /// JSON payload.
        #[arg(long, default_value = "{}")]
        body: String,
    },
}
