//! Request sequence numbers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// A shared, monotonically increasing sequence number source.
///
/// Clones share one counter. Each call to [`SequenceCounter::next`] is a
/// single atomic fetch-and-add, so values are never handed out twice even
/// when requests are built on several threads.
#[derive(Debug, Clone)]
pub struct SequenceCounter {
    next: Arc<AtomicU64>,
}

static PROCESS_COUNTER: OnceLock<SequenceCounter> = OnceLock::new();

impl SequenceCounter {
    /// A fresh counter whose first value is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// A fresh counter whose first value is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// The counter shared by the whole process. Never reset.
    pub fn process() -> Self {
        PROCESS_COUNTER.get_or_init(Self::new).clone()
    }

    /// Takes the next value.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The value the next call to [`SequenceCounter::next`] will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}
