//! Counted shared-ownership handle.
//!
//! [`Shared`] is the one place reference counting lives. Every entity that is
//! handed out to multiple owners (transport commands, stack configurations)
//! is wrapped in it instead of carrying its own counter. Acquire and release
//! are atomic, and the value is dropped exactly once, by whichever release
//! brings the count to zero.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A reference-counted, immutable handle to a `T`.
pub struct Shared<T> {
    inner: Arc<T>,
}

impl<T> Shared<T> {
    /// Wraps `value` in a new handle with a reference count of one.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Takes another reference to the same value, incrementing the count by one.
    pub fn acquire(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Gives up this reference, decrementing the count by one.
    ///
    /// Returns `true` if this was the last reference and the value has been
    /// dropped.
    pub fn release(self) -> bool {
        Arc::into_inner(self.inner).is_some()
    }

    /// Current number of live references.
    pub fn reference_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns true if both handles refer to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        self.acquire()
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> AsRef<T> for Shared<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

impl<T> From<T> for Shared<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner == *other.inner
    }
}

impl<T: Eq> Eq for Shared<T> {}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("refs", &self.reference_count())
            .field("value", &*self.inner)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}
