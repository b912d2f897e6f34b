#![forbid(unsafe_code)]

//! Core data model for the FullSheet overlay stack.
//!
//! This crate has no notion of rendering or subscribers. It provides:
//!
//! - [`Entry`]: one overlay in the stack (view handle, props, options,
//!   optional result channel).
//! - [`StackState`] plus pure transition functions ([`apply_open`],
//!   [`apply_push`], [`apply_pop`], [`apply_go_to`], [`apply_clear`],
//!   [`apply_resolve`]) that compute the next state and the side effects
//!   (result delivery) the caller must run.
//! - [`resolve_transforms`]: the direction resolver mapping a symbolic
//!   [`AnimationDirection`] to an initial/target [`Transform`] pair.
//! - [`Completer`] / [`SheetFuture`]: a one-shot result channel used by
//!   await-style entries.
//!
//! # Invariants
//!
//! - Entry ids are unique for the lifetime of the process and never reused.
//! - When the stack is non-empty exactly one entry is active.
//! - Every transition is total: invalid input produces an unchanged state,
//!   never a panic or an error.

pub mod completer;
pub mod direction;
pub mod entry;
pub mod error;
pub mod id;
pub mod options;
pub mod outcome;
pub mod props;
pub mod state;

pub use completer::{Completer, SheetFuture, SheetValue};
pub use direction::{AnimationDirection, Transform, TransformPair, TransitionKind, resolve_transforms};
pub use entry::Entry;
pub use error::ResultError;
pub use id::SheetId;
pub use options::{BackdropHandler, PopOptions, SheetOptions};
pub use outcome::{SheetOutcome, cancelled_value};
pub use props::Props;
pub use state::{
    CloseIntent, Effect, StackState, Transition, apply_clear, apply_go_to, apply_open, apply_pop,
    apply_push, apply_resolve,
};
