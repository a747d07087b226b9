//! Commands sent to the transport framework.
//!
//! Commands are immutable once built and handed out as [`Shared`] handles:
//! the sender and the transport each hold a reference, and the command is
//! dropped when the last one is released.

use crate::registry::StackConfig;
use ccnx_types::{CcnxError, CcnxResult, Shared};
use std::fmt;
use std::time::Duration;

/// Storage bound for a statistics filename, in bytes.
pub const MAX_FILENAME_LEN: usize = 1024;

/// Asks the transport to write statistics to a file every `period`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitStatisticsCommand {
    period: Duration,
    filename: String,
}

impl TransmitStatisticsCommand {
    /// Builds the command.
    ///
    /// Fails with [`CcnxError::FilenameTooLong`] rather than truncating when
    /// `filename` exceeds [`MAX_FILENAME_LEN`] bytes.
    pub fn create(period: Duration, filename: &str) -> CcnxResult<Shared<Self>> {
        if filename.len() > MAX_FILENAME_LEN {
            return Err(CcnxError::FilenameTooLong {
                len: filename.len(),
                max: MAX_FILENAME_LEN,
            });
        }
        Ok(Shared::new(Self {
            period,
            filename: filename.to_string(),
        }))
    }

    /// Builds a period from a seconds + microseconds pair.
    ///
    /// Microseconds beyond one second carry into the seconds. Fails when the
    /// carried total does not fit in a [`Duration`].
    pub fn period_from_parts(seconds: u64, microseconds: u64) -> CcnxResult<Duration> {
        Duration::from_secs(seconds)
            .checked_add(Duration::from_micros(microseconds))
            .ok_or_else(|| CcnxError::WrongKind {
                key: "PERIOD".to_string(),
                expected: "period that fits in a duration",
            })
    }

    /// The reporting period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The reporting period as whole seconds plus remaining microseconds.
    pub fn period_parts(&self) -> (u64, u32) {
        (self.period.as_secs(), self.period.subsec_micros())
    }

    /// The output filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Asks the transport to instantiate a protocol stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProtocolStackCommand {
    stack_id: u32,
    config: Shared<StackConfig>,
}

impl CreateProtocolStackCommand {
    /// Builds the command, acquiring a reference to `config`.
    pub fn create(stack_id: u32, config: &Shared<StackConfig>) -> Shared<Self> {
        Shared::new(Self {
            stack_id,
            config: config.acquire(),
        })
    }

    /// Identifier of the stack to create.
    pub fn stack_id(&self) -> u32 {
        self.stack_id
    }

    /// The stack description.
    pub fn config(&self) -> &Shared<StackConfig> {
        &self.config
    }
}

/// Every command the transport accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    /// Instantiate a protocol stack.
    CreateProtocolStack(Shared<CreateProtocolStackCommand>),
    /// Tear down a protocol stack by id.
    DestroyProtocolStack(u32),
    /// Start periodic statistics output.
    TransmitStatistics(Shared<TransmitStatisticsCommand>),
    /// Stop the transport.
    Shutdown,
}

impl TransportCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateProtocolStack(_) => "CreateProtocolStack",
            Self::DestroyProtocolStack(_) => "DestroyProtocolStack",
            Self::TransmitStatistics(_) => "TransmitStatistics",
            Self::Shutdown => "Shutdown",
        }
    }
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateProtocolStack(cmd) => write!(f, "{}({})", self.name(), cmd.stack_id()),
            Self::DestroyProtocolStack(id) => write!(f, "{}({id})", self.name()),
            Self::TransmitStatistics(cmd) => {
                write!(f, "{}({:?}, {})", self.name(), cmd.period(), cmd.filename())
            }
            Self::Shutdown => f.write_str(self.name()),
        }
    }
}
