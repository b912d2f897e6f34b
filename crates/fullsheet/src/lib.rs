#![forbid(unsafe_code)]

//! FullSheet public facade crate.
//!
//! Re-exports the overlay stack types from the internal crates and offers a
//! prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use fullsheet_core::{
    AnimationDirection, Entry, PopOptions, Props, ResultError, SheetFuture, SheetId, SheetOptions,
    SheetOutcome, SheetValue, StackState, Transform, TransitionKind, resolve_transforms,
};

// --- Runtime re-exports ----------------------------------------------------

pub use fullsheet_runtime::{
    PolicyConfigError, SheetController, SheetPolicy, SheetStore, Subscription,
};

// --- Widget re-exports -----------------------------------------------------

pub use fullsheet_widgets::{
    BackdropOutcome, HitRegion, Motion, RenderPhase, SheetAnimation, SheetLayer, SheetRenderer,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for FullSheet hosts.
#[derive(Debug)]
pub enum Error {
    /// An awaited overlay result could not be produced.
    Result(ResultError),
    /// Policy configuration failed to load.
    Config(PolicyConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Result(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Result(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ResultError> for Error {
    fn from(err: ResultError) -> Self {
        Self::Result(err)
    }
}

impl From<PolicyConfigError> for Error {
    fn from(err: PolicyConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for FullSheet APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnimationDirection, BackdropOutcome, Error, HitRegion, PopOptions, Props, Result,
        SheetController, SheetFuture, SheetOptions, SheetOutcome, SheetRenderer,
    };

    pub use crate::{core, runtime, widgets};
}

pub use fullsheet_core as core;
pub use fullsheet_runtime as runtime;
pub use fullsheet_widgets as widgets;
