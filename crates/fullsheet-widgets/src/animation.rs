#![forbid(unsafe_code)]

//! Frame-driven slide animation for one overlay.
//!
//! A [`SheetAnimation`] interpolates the transform pair produced by
//! [`resolve_transforms`] with an ease-out cubic curve. Hosts either call
//! [`SheetAnimation::tick`] every frame, or run their own animation and
//! report completion to the renderer.
//!
//! # Invariants
//!
//! - Progress is always in `[0.0, 1.0]` and never decreases.
//! - A finished animation stays finished; further ticks are ignored.
//!
//! # Failure Modes
//!
//! - Zero-duration animations complete on the first tick.

use std::time::Duration;

use fullsheet_core::{AnimationDirection, SheetId, Transform, TransformPair, TransitionKind, resolve_transforms};
use web_time::Instant;

/// Ease-out cubic: fast start, gentle landing.
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// In-flight enter or exit animation, keyed by entry id.
#[derive(Debug, Clone)]
pub struct SheetAnimation {
    id: SheetId,
    kind: TransitionKind,
    direction: AnimationDirection,
    transforms: TransformPair,
    duration: Duration,
    progress: f64,
    started_at: Instant,
}

impl SheetAnimation {
    /// Start an animation for entry `id`.
    pub fn new(
        id: SheetId,
        kind: TransitionKind,
        direction: AnimationDirection,
        duration: Duration,
    ) -> Self {
        Self {
            id,
            kind,
            direction,
            transforms: resolve_transforms(direction, kind),
            duration,
            progress: 0.0,
            started_at: Instant::now(),
        }
    }

    #[inline]
    pub fn id(&self) -> SheetId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    #[inline]
    pub fn direction(&self) -> AnimationDirection {
        self.direction
    }

    pub fn transforms(&self) -> TransformPair {
        self.transforms
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Eased progress in `[0, 1]`.
    pub fn eased_progress(&self) -> f64 {
        ease_out_cubic(self.progress)
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Wall-clock time since the animation started.
    pub fn age(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Transform to draw at the current progress.
    pub fn current_transform(&self) -> Transform {
        self.transforms.at(self.eased_progress())
    }

    /// Advance by `delta`. Returns `true` on the tick that finishes the
    /// animation.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.is_finished() {
            return false;
        }
        let total = self.duration.as_secs_f64();
        if total > 0.0 {
            self.progress = (self.progress + delta.as_secs_f64() / total).min(1.0);
        } else {
            self.progress = 1.0;
        }
        self.is_finished()
    }
}
