#![forbid(unsafe_code)]

//! Unique entry identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for entry ids. Never reset, so ids are never recycled.
static SHEET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for an [`Entry`](crate::Entry).
///
/// Generated when the entry is created and stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(u64);

impl SheetId {
    /// Allocate the next unique id.
    pub(crate) fn next() -> Self {
        Self(SHEET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<SheetId> = (0..1000).map(|_| SheetId::next()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn ids_increase() {
        let a = SheetId::next();
        let b = SheetId::next();
        assert!(b > a);
    }

    #[test]
    fn display_format() {
        let id = SheetId(42);
        assert_eq!(id.to_string(), "sheet-42");
        assert_eq!(id.get(), 42);
    }
}
