//! Identity handles for signature elements.
//!
//! This module provides the [`ElementHandle`] type, an opaque identity used to
//! track a node for selection purposes. Handles never take part in structural
//! equality: two trees with the same content but different handles are equal.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Process-wide counter for handle allocation.
///
/// # Thread Safety
///
/// The counter is atomic, so trees of different artifacts can be built on
/// separate threads.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of one signature element instance.
///
/// Every constructed element receives a fresh handle, and copying a tree
/// allocates fresh handles for the copy.
///
/// # Examples
///
/// ```
/// use sigdoc_core::identifier::ElementHandle;
///
/// let first = ElementHandle::next();
/// let second = ElementHandle::next();
/// assert_ne!(first, second);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    /// Allocates a new, never used handle.
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value of the handle.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_next_is_unique() {
        let handles: HashSet<ElementHandle> = (0..100).map(|_| ElementHandle::next()).collect();
        assert_eq!(handles.len(), 100);
    }

    #[test]
    fn test_next_is_increasing() {
        let first = ElementHandle::next();
        let second = ElementHandle::next();
        assert!(second > first);
    }

    #[test]
    fn test_display_trait() {
        let handle = ElementHandle(42);
        assert_eq!(format!("{}", handle), "#42");
        assert_eq!(handle.value(), 42);
    }

    #[test]
    fn test_copy_trait() {
        let handle1 = ElementHandle::next();
        let handle2 = handle1;

        assert_eq!(handle1, handle2);
    }
}
