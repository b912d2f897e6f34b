#![forbid(unsafe_code)]

//! Errors surfaced by await-style result futures.

use crate::id::SheetId;

/// The awaited result of an entry could not be produced.
#[derive(Debug)]
pub enum ResultError {
    /// The entry left the stack (pop, clear, replacement) without being
    /// resolved.
    Dropped { id: SheetId },
    /// The resolved value did not deserialize into the requested type.
    Decode {
        id: SheetId,
        source: serde_json::Error,
    },
}

impl ResultError {
    /// Id of the entry the error belongs to.
    pub fn id(&self) -> SheetId {
        match self {
            Self::Dropped { id } | Self::Decode { id, .. } => *id,
        }
    }

    /// Whether the entry was discarded without a result.
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped { .. })
    }
}

impl std::fmt::Display for ResultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dropped { id } => write!(f, "{id} was dismissed without a result"),
            Self::Decode { id, source } => write!(f, "result of {id} has the wrong shape: {source}"),
        }
    }
}

impl std::error::Error for ResultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dropped { .. } => None,
            Self::Decode { source, .. } => Some(source),
        }
    }
}
