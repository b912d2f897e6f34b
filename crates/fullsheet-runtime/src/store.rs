#![forbid(unsafe_code)]

//! Observable overlay stack store.
//!
//! [`SheetStore<V>`] owns the authoritative [`StackState`] and applies the
//! pure transitions from `fullsheet-core`. After every transition that
//! changes the stack it runs the transition's effects (result delivery)
//! and then notifies subscribers with the new state.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 on each state-changing dispatch.
//! 2. Subscribers observe states in dispatch order, even when a subscriber
//!    dispatches from inside its callback.
//! 3. Result effects run before subscribers see the state that caused them.
//!
//! # Failure Modes
//!
//! - **No-op dispatch**: a transition that reports `changed == false` leaves
//!   the version untouched and notifies nobody.
//! - **Subscriber leak**: dropped [`Subscription`] guards leave dead weak
//!   references that are pruned lazily on the next notification.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use fullsheet_core::{StackState, Transition};
use tracing::{debug, info_span, trace};
use web_time::Instant;

type CallbackRc<V> = Rc<dyn Fn(&StackState<V>)>;
type CallbackWeak<V> = Weak<dyn Fn(&StackState<V>)>;

/// Name of the operation being dispatched, recorded on the dispatch span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetOp {
    Open,
    Push,
    Pop,
    GoTo,
    Clear,
    Resolve,
}

impl SheetOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::GoTo => "go_to",
            Self::Clear => "clear",
            Self::Resolve => "resolve",
        }
    }
}

impl fmt::Display for SheetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct StoreInner<V> {
    state: StackState<V>,
    version: u64,
    subscribers: Vec<CallbackWeak<V>>,
    /// States committed but not yet delivered to subscribers.
    pending: VecDeque<StackState<V>>,
    notifying: bool,
}

/// Shared, versioned overlay stack with change notification.
///
/// Cloning a `SheetStore` creates a new handle to the same stack.
pub struct SheetStore<V> {
    inner: Rc<RefCell<StoreInner<V>>>,
}

impl<V> Clone for SheetStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V> Default for SheetStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for SheetStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SheetStore")
            .field("depth", &inner.state.len())
            .field("active", &inner.state.active_index())
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<V> SheetStore<V> {
    /// Create an empty store at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: StackState::new(),
                version: 0,
                subscribers: Vec::new(),
                pending: VecDeque::new(),
                notifying: false,
            })),
        }
    }

    /// Snapshot of the current state. Entries are shared, not deep-copied.
    #[must_use]
    pub fn state(&self) -> StackState<V> {
        self.inner.borrow().state.clone()
    }

    /// Access the current state by reference.
    pub fn with<R>(&self, f: impl FnOnce(&StackState<V>) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Number of state-changing dispatches so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs once per state-changing dispatch. Dropping the
    /// returned guard unsubscribes it.
    pub fn subscribe(&self, callback: impl Fn(&StackState<V>) + 'static) -> Subscription
    where
        V: 'static,
    {
        let strong: CallbackRc<V> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Apply a transition computed from the current state.
    ///
    /// Returns whether the stack changed. Safe to call from inside a
    /// subscriber callback; the nested state is delivered after the one
    /// currently being delivered.
    pub fn dispatch(
        &self,
        op: SheetOp,
        transition: impl FnOnce(&StackState<V>) -> Transition<V>,
    ) -> bool {
        let (effects, depth, version) = {
            let mut inner = self.inner.borrow_mut();
            let Transition {
                state,
                changed,
                effects,
            } = transition(&inner.state);
            if !changed {
                debug!(op = op.as_str(), depth = inner.state.len(), "sheet op was a no-op");
                return false;
            }
            inner.state = state;
            inner.version += 1;
            let snapshot = inner.state.clone();
            inner.pending.push_back(snapshot);
            (effects, inner.state.len(), inner.version)
        };

        let _span = info_span!(
            "fullsheet.dispatch",
            op = op.as_str(),
            depth,
            version,
            effects = effects.len()
        )
        .entered();

        for effect in effects {
            let id = effect.id();
            let settled = effect.run();
            trace!(%id, settled, "result effect");
        }

        self.deliver();
        true
    }

    /// Deliver pending states in order. Re-entrant calls return immediately
    /// and leave their state for the outer loop.
    fn deliver(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                return;
            }
            inner.notifying = true;
        }
        let _reset = NotifyGuard(&self.inner);

        loop {
            let (state, callbacks) = {
                let mut inner = self.inner.borrow_mut();
                let Some(state) = inner.pending.pop_front() else {
                    break;
                };
                inner.subscribers.retain(|w| w.strong_count() > 0);
                let callbacks: Vec<CallbackRc<V>> =
                    inner.subscribers.iter().filter_map(Weak::upgrade).collect();
                (state, callbacks)
            };
            if callbacks.is_empty() {
                continue;
            }

            let start = Instant::now();
            for cb in &callbacks {
                cb(&state);
            }
            let duration_us = start.elapsed().as_micros() as u64;
            debug!(
                subscribers = callbacks.len(),
                depth = state.len(),
                duration_us,
                "sheet state delivered"
            );
        }
    }
}

/// Clears the `notifying` flag even if a subscriber panics.
struct NotifyGuard<'a, V>(&'a Rc<RefCell<StoreInner<V>>>);

impl<V> Drop for NotifyGuard<'_, V> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.notifying = false;
        }
    }
}

/// RAII guard for a store subscriber.
///
/// Dropping it makes the callback unreachable; the dead weak reference is
/// pruned on the next notification.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
