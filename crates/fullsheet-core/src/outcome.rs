#![forbid(unsafe_code)]

//! Typed form of the common confirm/cancel result.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Result shape used by confirm-style overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOutcome {
    pub confirmed: bool,
    pub cancelled: bool,
}

impl SheetOutcome {
    /// The user confirmed.
    pub const fn confirmed() -> Self {
        Self {
            confirmed: true,
            cancelled: false,
        }
    }

    /// The user dismissed the overlay.
    pub const fn cancelled() -> Self {
        Self {
            confirmed: false,
            cancelled: true,
        }
    }
}

impl From<SheetOutcome> for Value {
    fn from(outcome: SheetOutcome) -> Self {
        json!({
            "confirmed": outcome.confirmed,
            "cancelled": outcome.cancelled,
        })
    }
}

/// Value delivered when an await entry is dismissed by a backdrop click and
/// no explicit backdrop result was configured.
pub fn cancelled_value() -> Value {
    SheetOutcome::cancelled().into()
}
