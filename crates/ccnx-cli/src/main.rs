//! ccnx CLI: inspect transport configuration and build control plane messages.
//!
//! Every command runs locally and prints to stdout. Nothing is sent to a
//! forwarder.

mod cli;

use crate::cli::*;
use ccnx_control::envelope::{self, parse_ack};
use ccnx_control::{ControlMessage, CpiEncoder, MessageType, RouteEntry};
use ccnx_transport::{load_settings, TransmitStatisticsCommand};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

fn init_tracing_stderr() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing_stderr();

    match cli.command {
        Commands::Config {
            forwarder,
            port,
            compact,
        } => cmd_config(cli.config, forwarder, port, compact),
        Commands::Cpi(sub) => cmd_cpi(sub),
        Commands::Inspect { message } => cmd_inspect(message),
    }
}

fn cmd_config(
    config: Option<PathBuf>,
    forwarder: Option<ccnx_transport::ForwarderKind>,
    port: Option<u16>,
    compact: bool,
) {
    let mut settings = load_settings(config.as_deref());
    if let Some(forwarder) = forwarder {
        settings.forwarder = forwarder;
    }
    if let Some(port) = port {
        settings.metis_port = port;
    }
    tracing::debug!(forwarder = %settings.forwarder, port = settings.metis_port, "Building transport config");

    let transport = settings.build_transport_config();
    let (stack, connection) = (transport.stack_config(), transport.connection_config());
    if compact {
        println!("{stack}");
        println!("{connection}");
    } else {
        println!("Stack:");
        println!("{}", stack.to_pretty_string());
        println!("Connection:");
        println!("{}", connection.to_pretty_string());
    }
}

fn cmd_cpi(sub: CpiCommands) {
    let encoder = CpiEncoder::process();
    let request = match sub {
        CpiCommands::Pause => encoder.pause_input_request(),
        CpiCommands::Resume => encoder.resume_input_request(),
        CpiCommands::Flush => encoder.flush_request(),
        CpiCommands::InterfaceUp { ifidx } => encoder.interface_up_request(ifidx),
        CpiCommands::InterfaceDown { ifidx } => encoder.interface_down_request(ifidx),
        CpiCommands::InterfaceList => encoder.interface_list_request(),
        CpiCommands::AddRoute {
            prefix,
            ifidx,
            cost,
        } => {
            let route = RouteEntry {
                prefix,
                interface: ifidx,
                cost,
            };
            encoder.add_route_request(&route).unwrap_or_else(|e| {
                eprintln!("Failed to build route request: {e}");
                std::process::exit(1);
            })
        }
        CpiCommands::RemoveRoute {
            prefix,
            ifidx,
            cost,
        } => {
            let route = RouteEntry {
                prefix,
                interface: ifidx,
                cost,
            };
            encoder.remove_route_request(&route).unwrap_or_else(|e| {
                eprintln!("Failed to build route request: {e}");
                std::process::exit(1);
            })
        }
        CpiCommands::Stats { seconds, filename } => {
            let command =
                TransmitStatisticsCommand::create(Duration::from_secs(seconds), &filename)
                    .unwrap_or_else(|e| {
                        eprintln!("Invalid statistics command: {e}");
                        std::process::exit(1);
                    });
            encoder.transmit_statistics_request(&command)
        }
        CpiCommands::Raw { operation, body } => {
            if operation.is_empty() || operation == envelope::SEQUENCE {
                eprintln!("Invalid operation name: '{operation}'");
                std::process::exit(1);
            }
            let payload: serde_json::Value = serde_json::from_str(&body).unwrap_or_else(|e| {
                eprintln!("Invalid JSON body: {e}");
                std::process::exit(1);
            });
            ControlMessage::from_json(encoder.create_request(&operation, payload))
        }
    };
    println!("{}", request.to_compact_string());
}

fn cmd_inspect(message: Option<String>) {
    let text = match message {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("Failed to read stdin: {e}");
                std::process::exit(1);
            }
            buf
        }
    };

    let message = ControlMessage::parse(&text).unwrap_or_else(|e| {
        eprintln!("Invalid message: {e}");
        std::process::exit(1);
    });
    let kind = message.message_type().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    println!("Type:      {kind}");
    match message.sequence_number() {
        Ok(sequence) => println!("Sequence:  {sequence}"),
        Err(e) => println!("Sequence:  <{e}>"),
    }
    match message.operation_name() {
        Ok(name) => println!(
            "Operation: {name} ({})",
            ccnx_control::CpiOperation::from_name(name)
        ),
        Err(e) => println!("Operation: <{e}>"),
    }
    if kind == MessageType::Ack {
        match parse_ack(message.json()) {
            Ok(info) => {
                println!("Result:    {}", if info.success { "ACK" } else { "NACK" });
                if let Some(reason) = info.message {
                    println!("Message:   {reason}");
                }
            }
            Err(e) => println!("Result:    <{e}>"),
        }
    }
}
