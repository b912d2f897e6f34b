#![forbid(unsafe_code)]

//! Rendering side of the FullSheet overlay stack.
//!
//! [`SheetRenderer`] keeps a lagging snapshot of the stack so departing
//! overlays can play their exit animation, and exposes the result as
//! [`SheetLayer`]s for the host to draw. [`SheetAnimation`] is the
//! frame-driven slide used for enter and exit.
//!
//! Enable the `tracing` feature for `sheet_observe` spans and stale
//! completion events.

pub mod animation;
pub mod renderer;

pub use animation::{SheetAnimation, ease_out_cubic};
pub use renderer::{BackdropOutcome, HitRegion, Motion, RenderPhase, SheetLayer, SheetRenderer};
