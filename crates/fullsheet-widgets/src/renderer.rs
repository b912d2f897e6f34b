#![forbid(unsafe_code)]

//! Snapshot renderer for the overlay stack.
//!
//! The renderer never draws the live stack directly. It keeps its own
//! snapshot of entries that lags the store on removal, so an entry that
//! leaves the stack can finish its exit animation before it is unmounted.
//!
//! On every store change the snapshot is reconciled:
//!
//! - **Grow** (a new top entry appeared): the store's stack is copied
//!   verbatim and the new top starts its enter animation. An exit still in
//!   flight is dropped, so its completion signal becomes stale.
//! - **Dismiss** (pop or resolve): the departing entry stays in the
//!   snapshot and starts its exit animation, unless its resolved exit
//!   direction is `None`, in which case it is removed at once.
//! - **Teardown** (clear): the snapshot is emptied synchronously, with no
//!   exit animation for anything.
//!
//! Completion is reported through [`SheetRenderer::animation_finished`] or
//! driven internally by [`SheetRenderer::tick`]. Both are keyed by entry id;
//! signals for an id that is no longer animating are ignored.
//!
//! # Invariants
//!
//! - At most one entry is exiting at a time.
//! - Every entry of the store's stack is present in the snapshot.
//! - The snapshot holds at most one entry the store no longer has, and it is
//!   the exiting one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use fullsheet_core::{
    AnimationDirection, CloseIntent, Entry, SheetId, StackState, Transform, TransitionKind,
};
use fullsheet_runtime::{SheetController, SheetPolicy, Subscription};

use crate::animation::SheetAnimation;

/// What the renderer is currently animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    #[default]
    Idle,
    Entering,
    Exiting,
}

/// Motion state of one rendered layer. Progress is eased, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Static,
    Entering { progress: f64 },
    Exiting { progress: f64 },
}

impl Motion {
    #[inline]
    pub fn is_animating(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// One overlay to draw, bottom to top.
#[derive(Debug)]
pub struct SheetLayer<V> {
    pub entry: Rc<Entry<V>>,
    /// Slot in the snapshot; higher draws on top.
    pub z_index: usize,
    pub is_active: bool,
    pub motion: Motion,
    /// Offset in viewport fractions.
    pub transform: Transform,
}

impl<V> Clone for SheetLayer<V> {
    fn clone(&self) -> Self {
        Self {
            entry: Rc::clone(&self.entry),
            z_index: self.z_index,
            is_active: self.is_active,
            motion: self.motion,
            transform: self.transform,
        }
    }
}

impl<V> SheetLayer<V> {
    #[inline]
    pub fn id(&self) -> SheetId {
        self.entry.id()
    }
}

/// Part of an overlay a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitRegion {
    /// Area outside the overlay's content.
    Backdrop,
    /// The overlay's content.
    Content,
}

/// What a backdrop click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropOutcome {
    /// The click was on content, on an inactive or exiting entry, or the
    /// entry neither handles nor closes on backdrop clicks.
    Ignored,
    /// The entry's handler ran; the entry stays open.
    HandlerOnly,
    /// The await entry was resolved with its backdrop value.
    Resolved,
    /// The stack was closed.
    Closed,
}

struct RendererInner<V> {
    snapshot: Vec<Rc<Entry<V>>>,
    active: Option<SheetId>,
    entering: Option<SheetAnimation>,
    exiting: Option<SheetAnimation>,
    policy: SheetPolicy,
}

impl<V> RendererInner<V> {
    fn position(&self, id: SheetId) -> Option<usize> {
        self.snapshot.iter().position(|e| e.id() == id)
    }

    fn observe(&mut self, state: &StackState<V>) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "sheet_observe",
            depth = state.len(),
            snapshot = self.snapshot.len()
        )
        .entered();

        self.active = state.active_id();

        if state.is_empty() && state.pending_close() == Some(CloseIntent::Teardown) {
            self.teardown();
            return;
        }

        let grew = state.top().is_some_and(|top| self.position(top.id()).is_none());
        if grew {
            self.grow(state);
        } else {
            self.reconcile(state);
        }
    }

    fn teardown(&mut self) {
        self.snapshot.clear();
        self.entering = None;
        self.exiting = None;
    }

    fn grow(&mut self, state: &StackState<V>) {
        self.snapshot = state.entries().to_vec();
        if let Some(_superseded) = self.exiting.take() {
            #[cfg(feature = "tracing")]
            tracing::trace!(id = %_superseded.id(), "exit superseded by push");
        }
        self.entering = state.top().and_then(|top| {
            let direction = top.enter_direction();
            direction.is_animated().then(|| {
                SheetAnimation::new(
                    top.id(),
                    TransitionKind::Enter,
                    direction,
                    self.policy.animation.enter_duration(),
                )
            })
        });
    }

    fn reconcile(&mut self, state: &StackState<V>) {
        if self
            .entering
            .as_ref()
            .is_some_and(|a| !state.contains(a.id()))
        {
            self.entering = None;
        }

        let departing = match state.pending_close() {
            Some(CloseIntent::Dismiss { id, exit_direction })
                if !state.contains(id) && self.exiting.as_ref().map(SheetAnimation::id) != Some(id) =>
            {
                self.position(id).map(|slot| (slot, exit_direction))
            }
            _ => None,
        };

        let mut exiting: Option<(usize, Rc<Entry<V>>)> = None;
        if let Some((slot, override_direction)) = departing {
            // A new dismissal prunes whatever was still exiting.
            self.exiting = None;
            let entry = Rc::clone(&self.snapshot[slot]);
            let direction = self.exit_direction(&entry, override_direction);
            if direction.is_animated() {
                self.exiting = Some(SheetAnimation::new(
                    entry.id(),
                    TransitionKind::Exit,
                    direction,
                    self.policy.animation.exit_duration(),
                ));
                exiting = Some((slot, entry));
            }
        } else if let Some(anim) = &self.exiting {
            exiting = self
                .position(anim.id())
                .map(|slot| (slot, Rc::clone(&self.snapshot[slot])));
        }

        let mut snapshot = state.entries().to_vec();
        if let Some((slot, entry)) = exiting {
            snapshot.insert(slot.min(snapshot.len()), entry);
        }
        self.snapshot = snapshot;
    }

    /// Pop override, then the entry's exit direction, then (when the policy
    /// allows it) the entry's enter direction.
    fn exit_direction(
        &self,
        entry: &Entry<V>,
        override_direction: Option<AnimationDirection>,
    ) -> AnimationDirection {
        if let Some(direction) = override_direction {
            return direction;
        }
        let own = entry.exit_direction();
        if own.is_animated() || !self.policy.animation.exit_falls_back_to_enter {
            return own;
        }
        entry.enter_direction()
    }

    fn finish(&mut self, id: SheetId) -> bool {
        if self.exiting.as_ref().is_some_and(|a| a.id() == id) {
            self.exiting = None;
            if let Some(slot) = self.position(id) {
                self.snapshot.remove(slot);
            }
            return true;
        }
        if self.entering.as_ref().is_some_and(|a| a.id() == id) {
            self.entering = None;
            return true;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%id, "ignoring stale animation completion");
        false
    }

    fn phase(&self) -> RenderPhase {
        if self.exiting.is_some() {
            RenderPhase::Exiting
        } else if self.entering.is_some() {
            RenderPhase::Entering
        } else {
            RenderPhase::Idle
        }
    }

    fn layer(&self, z_index: usize, entry: &Rc<Entry<V>>) -> SheetLayer<V> {
        let id = entry.id();
        let (motion, transform) = match (&self.entering, &self.exiting) {
            (_, Some(a)) if a.id() == id => (
                Motion::Exiting {
                    progress: a.eased_progress(),
                },
                a.current_transform(),
            ),
            (Some(a), _) if a.id() == id => (
                Motion::Entering {
                    progress: a.eased_progress(),
                },
                a.current_transform(),
            ),
            _ => (Motion::Static, Transform::IDENTITY),
        };
        SheetLayer {
            entry: Rc::clone(entry),
            z_index,
            is_active: self.active == Some(id),
            motion,
            transform,
        }
    }
}

/// Renders the overlay stack of one [`SheetController`].
///
/// The renderer subscribes to the controller on construction and stops
/// observing it when dropped.
pub struct SheetRenderer<V> {
    inner: Rc<RefCell<RendererInner<V>>>,
    controller: SheetController<V>,
    _subscription: Subscription,
}

impl<V: 'static> SheetRenderer<V> {
    /// Renderer using the controller's policy.
    pub fn new(controller: &SheetController<V>) -> Self {
        Self::with_policy(controller, controller.policy().clone())
    }

    /// Renderer with its own animation policy.
    ///
    /// Entries already on the stack are mounted without animation.
    pub fn with_policy(controller: &SheetController<V>, policy: SheetPolicy) -> Self {
        let state = controller.state();
        let inner = Rc::new(RefCell::new(RendererInner {
            snapshot: state.entries().to_vec(),
            active: state.active_id(),
            entering: None,
            exiting: None,
            policy,
        }));
        let weak = Rc::downgrade(&inner);
        let subscription = controller.subscribe(move |state| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().observe(state);
            }
        });
        Self {
            inner,
            controller: controller.clone(),
            _subscription: subscription,
        }
    }
}

impl<V> SheetRenderer<V> {
    /// Report that the animation of entry `id` finished.
    ///
    /// Returns `false` for stale ids: entries that are no longer entering
    /// or exiting.
    pub fn animation_finished(&self, id: SheetId) -> bool {
        self.inner.borrow_mut().finish(id)
    }

    /// Advance running animations by `delta`, completing those that reach
    /// the end. Returns the ids that finished on this tick.
    pub fn tick(&self, delta: Duration) -> Vec<SheetId> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let mut finished = Vec::new();
        for anim in [inner.entering.as_mut(), inner.exiting.as_mut()]
            .into_iter()
            .flatten()
        {
            if anim.tick(delta) {
                finished.push(anim.id());
            }
        }
        for &id in &finished {
            inner.finish(id);
        }
        finished
    }

    pub fn phase(&self) -> RenderPhase {
        self.inner.borrow().phase()
    }

    /// Whether anything is mounted.
    pub fn is_visible(&self) -> bool {
        !self.inner.borrow().snapshot.is_empty()
    }

    /// Layers to draw, bottom to top.
    pub fn layers(&self) -> Vec<SheetLayer<V>> {
        let inner = self.inner.borrow();
        inner
            .snapshot
            .iter()
            .enumerate()
            .map(|(z, entry)| inner.layer(z, entry))
            .collect()
    }

    /// Ids in the snapshot, bottom to top.
    pub fn mounted_ids(&self) -> Vec<SheetId> {
        self.inner.borrow().snapshot.iter().map(|e| e.id()).collect()
    }

    /// Entry currently playing its exit animation.
    pub fn exiting_id(&self) -> Option<SheetId> {
        self.inner.borrow().exiting.as_ref().map(SheetAnimation::id)
    }

    /// Entry currently playing its enter animation.
    pub fn entering_id(&self) -> Option<SheetId> {
        self.inner.borrow().entering.as_ref().map(SheetAnimation::id)
    }

    /// Route a click on the overlay of entry `id`.
    ///
    /// Only backdrop clicks on the active entry count. The entry's handler
    /// runs first; then, if the entry closes on backdrop clicks, an await
    /// entry is resolved with its backdrop value and a plain entry closes
    /// the stack.
    pub fn backdrop_click(&self, id: SheetId, region: HitRegion) -> BackdropOutcome {
        if region == HitRegion::Content {
            return BackdropOutcome::Ignored;
        }
        let entry = {
            let inner = self.inner.borrow();
            if inner.active != Some(id) {
                return BackdropOutcome::Ignored;
            }
            match inner.position(id) {
                Some(slot) => Rc::clone(&inner.snapshot[slot]),
                None => return BackdropOutcome::Ignored,
            }
        };

        let options = entry.options();
        let handled = match options.backdrop_handler() {
            Some(handler) => {
                handler(id);
                true
            }
            None => false,
        };

        if !options.closes_on_backdrop_click() {
            return if handled {
                BackdropOutcome::HandlerOnly
            } else {
                BackdropOutcome::Ignored
            };
        }
        if entry.is_awaiting() {
            self.controller.resolve(options.backdrop_value());
            BackdropOutcome::Resolved
        } else {
            self.controller.close();
            BackdropOutcome::Closed
        }
    }

    pub fn controller(&self) -> &SheetController<V> {
        &self.controller
    }
}

impl<V> fmt::Debug for SheetRenderer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SheetRenderer")
            .field("mounted", &inner.snapshot.len())
            .field("active", &inner.active)
            .field("phase", &inner.phase())
            .field("entering", &inner.entering.as_ref().map(SheetAnimation::id))
            .field("exiting", &inner.exiting.as_ref().map(SheetAnimation::id))
            .finish()
    }
}
