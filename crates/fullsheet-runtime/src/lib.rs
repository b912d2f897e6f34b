#![forbid(unsafe_code)]

//! Runtime for the FullSheet overlay stack.
//!
//! - [`SheetStore`]: the authoritative, observable stack. Applies the pure
//!   transitions from `fullsheet-core`, runs their result effects and
//!   notifies subscribers in dispatch order.
//! - [`SheetController`]: the handle application code uses to open, push,
//!   pop and resolve overlays.
//! - [`SheetPolicy`]: defaults and animation timing, loadable from TOML or
//!   JSON with the `policy-config` feature.

pub mod controller;
pub mod policy;
pub mod store;

pub use controller::SheetController;
pub use policy::{AnimationPolicy, DefaultsPolicy, PolicyConfigError, SheetPolicy};
pub use store::{SheetOp, SheetStore, Subscription};
