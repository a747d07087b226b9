//! Control plane interface (CPI) messages for the CCNx transport.
//!
//! Builds and reads the JSON control documents exchanged between an
//! application stack and its forwarder, and correlates replies with the
//! requests that caused them.
//!
//! ## Architecture
//!
//! - **envelope**: request, response, and ack envelopes
//! - **operation**: message types and the operation table
//! - **sequence**: the request numbering counter
//! - **message**: [`ControlMessage`], the facade over one document
//! - **requests**: ready-made requests and their payload parsers
//! - **dispatch**: answering requests on the forwarder side

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod message;
pub mod operation;
pub mod requests;
pub mod sequence;

pub use dispatch::{respond, CpiDispatcher};
pub use envelope::{AckInfo, CpiEncoder};
pub use error::{CpiError, CpiResult};
pub use message::ControlMessage;
pub use operation::{CpiOperation, MessageType};
pub use requests::RouteEntry;
pub use sequence::SequenceCounter;
