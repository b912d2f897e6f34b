#![forbid(unsafe_code)]

//! Public handle for opening and closing overlays.
//!
//! A [`SheetController`] is cheap to clone and is passed explicitly to any
//! code that needs to drive the overlay stack. Every call translates into one
//! store dispatch; the await variants additionally hand back a
//! [`SheetFuture`] completed by a later [`resolve`](SheetController::resolve).
//!
//! # Example
//!
//! ```rust,ignore
//! let sheets = SheetController::new();
//! sheets.push(Screen::Settings, Props::new(), SheetOptions::new().enter(AnimationDirection::Right));
//! let answer = sheets.push_await(Screen::Confirm, Props::new(), SheetOptions::new());
//! // ... later, from the confirm view:
//! sheets.resolve(SheetOutcome::confirmed());
//! let outcome: SheetOutcome = answer.decode().await?;
//! ```

use std::fmt;
use std::rc::Rc;

use fullsheet_core::{
    Entry, PopOptions, Props, SheetFuture, SheetId, SheetOptions, SheetValue, StackState,
    apply_clear, apply_go_to, apply_open, apply_pop, apply_push, apply_resolve,
};

use crate::policy::SheetPolicy;
use crate::store::{SheetOp, SheetStore, Subscription};

/// Handle to an overlay stack.
///
/// Clones share the same stack and policy.
pub struct SheetController<V> {
    store: SheetStore<V>,
    policy: Rc<SheetPolicy>,
}

impl<V> Clone for SheetController<V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            policy: Rc::clone(&self.policy),
        }
    }
}

impl<V> Default for SheetController<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for SheetController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetController")
            .field("store", &self.store)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<V> SheetController<V> {
    /// Controller over a fresh, empty stack with the default policy.
    pub fn new() -> Self {
        Self::with_policy(SheetPolicy::default())
    }

    /// Controller over a fresh, empty stack.
    pub fn with_policy(policy: SheetPolicy) -> Self {
        Self {
            store: SheetStore::new(),
            policy: Rc::new(policy),
        }
    }

    // --- Operations ---

    /// Replace the whole stack with one new entry.
    pub fn open(&self, view: V, props: Props, options: SheetOptions) -> SheetId {
        let entry = Entry::new(view, props, self.policy.apply_defaults(options));
        let id = entry.id();
        self.store.dispatch(SheetOp::Open, |s| apply_open(s, entry));
        id
    }

    /// Push a new entry on top and make it active.
    pub fn push(&self, view: V, props: Props, options: SheetOptions) -> SheetId {
        let entry = Entry::new(view, props, self.policy.apply_defaults(options));
        let id = entry.id();
        self.store.dispatch(SheetOp::Push, |s| apply_push(s, entry));
        id
    }

    /// Remove the top entry. Popping the last entry empties the stack.
    ///
    /// Returns `false` when the stack was already empty.
    pub fn pop(&self, options: PopOptions) -> bool {
        self.store.dispatch(SheetOp::Pop, |s| apply_pop(s, options))
    }

    /// Make the entry at `index` active without removing anything.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn go_to(&self, index: usize) -> bool {
        self.store.dispatch(SheetOp::GoTo, |s| apply_go_to(s, index))
    }

    /// Empty the stack immediately, skipping exit animations.
    pub fn clear(&self) -> bool {
        self.store.dispatch(SheetOp::Clear, apply_clear)
    }

    /// Alias of [`clear`](Self::clear).
    pub fn close(&self) -> bool {
        self.clear()
    }

    /// Like [`open`](Self::open), returning a future completed by `resolve`.
    pub fn open_await(&self, view: V, props: Props, options: SheetOptions) -> SheetFuture {
        let (entry, future) = Entry::awaiting(view, props, self.policy.apply_defaults(options));
        self.store.dispatch(SheetOp::Open, |s| apply_open(s, entry));
        future
    }

    /// Like [`push`](Self::push), returning a future completed by `resolve`.
    pub fn push_await(&self, view: V, props: Props, options: SheetOptions) -> SheetFuture {
        let (entry, future) = Entry::awaiting(view, props, self.policy.apply_defaults(options));
        self.store.dispatch(SheetOp::Push, |s| apply_push(s, entry));
        future
    }

    /// Deliver `value` to the active entry and remove it.
    ///
    /// Plain entries are removed without delivering anything. Returns
    /// `false` when nothing is active.
    pub fn resolve(&self, value: impl Into<SheetValue>) -> bool {
        let value = value.into();
        self.store
            .dispatch(SheetOp::Resolve, |s| apply_resolve(s, value))
    }

    // --- Queries ---

    /// Whether any entry is on the stack.
    pub fn is_open(&self) -> bool {
        self.store.with(|s| !s.is_empty())
    }

    /// Number of entries on the stack.
    pub fn depth(&self) -> usize {
        self.store.with(StackState::len)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.store.with(StackState::active_index)
    }

    /// The active entry.
    pub fn current(&self) -> Option<Rc<Entry<V>>> {
        self.store.with(|s| s.active().cloned())
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> Vec<Rc<Entry<V>>> {
        self.store.with(|s| s.entries().to_vec())
    }

    /// Snapshot of the full stack state.
    pub fn state(&self) -> StackState<V> {
        self.store.state()
    }

    /// Store version, incremented on every change.
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn policy(&self) -> &SheetPolicy {
        &self.policy
    }

    /// Underlying store, for renderers and other observers.
    pub fn store(&self) -> &SheetStore<V> {
        &self.store
    }

    /// Subscribe to stack changes.
    pub fn subscribe(&self, callback: impl Fn(&StackState<V>) + 'static) -> Subscription
    where
        V: 'static,
    {
        self.store.subscribe(callback)
    }
}
