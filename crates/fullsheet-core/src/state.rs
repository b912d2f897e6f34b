#![forbid(unsafe_code)]

//! Stack state and its pure transition functions.
//!
//! Each `apply_*` function takes the current [`StackState`] by reference and
//! returns a [`Transition`]: the next state, whether anything changed, and the
//! [`Effect`]s (result delivery, result abandonment) the owner must run after
//! committing the new state. Nothing here touches subscribers or renderers.
//!
//! # Invariants
//!
//! - Entry ids are pairwise unique.
//! - `active` is `None` iff `entries` is empty; otherwise it is in range and
//!   exactly one entry is active.
//! - `active` equals `entries.len() - 1` after every transition except
//!   `go_to` to a lower slot and a `resolve` of a non-top entry.
//!
//! # Failure Modes
//!
//! - `pop` / `clear` on an empty stack, `resolve` with no active entry and
//!   `go_to` out of range produce an unchanged transition (no effects).

use std::fmt;
use std::rc::Rc;

use crate::completer::SheetValue;
use crate::direction::AnimationDirection;
use crate::entry::Entry;
use crate::id::SheetId;
use crate::options::PopOptions;

/// Why the last transition removed entries, consumed once by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseIntent {
    /// One entry left gracefully (pop or resolve) and may play its exit.
    Dismiss {
        id: SheetId,
        /// Direction passed to `pop`, overriding the entry's own.
        exit_direction: Option<AnimationDirection>,
    },
    /// Everything was torn down at once, without exit animations.
    Teardown,
}

/// Ordered overlay stack plus the active pointer.
pub struct StackState<V> {
    entries: Vec<Rc<Entry<V>>>,
    active: Option<usize>,
    pending_close: Option<CloseIntent>,
}

impl<V> Clone for StackState<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            active: self.active,
            pending_close: self.pending_close,
        }
    }
}

impl<V> Default for StackState<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> StackState<V> {
    /// An empty stack.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            active: None,
            pending_close: None,
        }
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> &[Rc<Entry<V>>] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the active entry, `None` when empty.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active entry.
    pub fn active(&self) -> Option<&Rc<Entry<V>>> {
        self.active.and_then(|i| self.entries.get(i))
    }

    /// Id of the active entry.
    pub fn active_id(&self) -> Option<SheetId> {
        self.active().map(|e| e.id())
    }

    /// Whether the entry at `index` is the active one.
    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn get(&self, index: usize) -> Option<&Rc<Entry<V>>> {
        self.entries.get(index)
    }

    /// Top entry (last pushed), regardless of which one is active.
    pub fn top(&self) -> Option<&Rc<Entry<V>>> {
        self.entries.last()
    }

    /// Slot of the entry with `id`.
    pub fn position(&self, id: SheetId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: SheetId) -> bool {
        self.position(id).is_some()
    }

    /// Close intent recorded by the last transition, if it removed entries.
    pub fn pending_close(&self) -> Option<CloseIntent> {
        self.pending_close
    }

    /// Describe the first violated invariant, if any.
    pub fn invariant_violation(&self) -> Option<String> {
        for (i, a) in self.entries.iter().enumerate() {
            if self.entries[i + 1..].iter().any(|b| b.id() == a.id()) {
                return Some(format!("duplicate id {} at slot {i}", a.id()));
            }
        }
        match (self.active, self.entries.len()) {
            (None, 0) => None,
            (None, n) => Some(format!("no active entry in a stack of {n}")),
            (Some(i), 0) => Some(format!("active index {i} in an empty stack")),
            (Some(i), n) if i >= n => Some(format!("active index {i} out of range for {n}")),
            _ => None,
        }
    }

    fn with_entries(entries: Vec<Rc<Entry<V>>>, active: Option<usize>) -> Self {
        Self {
            entries,
            active,
            pending_close: None,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for StackState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackState")
            .field("entries", &self.entries)
            .field("active", &self.active)
            .field("pending_close", &self.pending_close)
            .finish()
    }
}

/// Side effect produced by a transition, run by the state owner after the
/// new state is committed.
pub enum Effect<V> {
    /// Deliver `value` to the entry's waiting future.
    Resolve { entry: Rc<Entry<V>>, value: SheetValue },
    /// The entry left without a result; release its future.
    Abandon(Rc<Entry<V>>),
}

impl<V> Effect<V> {
    /// Run the effect. Returns `true` when a future was actually settled.
    pub fn run(self) -> bool {
        match self {
            Self::Resolve { entry, value } => entry.complete(value),
            Self::Abandon(entry) => entry.abandon(),
        }
    }

    /// Entry the effect targets.
    pub fn id(&self) -> SheetId {
        match self {
            Self::Resolve { entry, .. } | Self::Abandon(entry) => entry.id(),
        }
    }
}

impl<V> fmt::Debug for Effect<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve { entry, value } => f
                .debug_struct("Resolve")
                .field("id", &entry.id())
                .field("value", value)
                .finish(),
            Self::Abandon(entry) => f.debug_tuple("Abandon").field(&entry.id()).finish(),
        }
    }
}

/// Result of applying one operation.
pub struct Transition<V> {
    pub state: StackState<V>,
    pub changed: bool,
    pub effects: Vec<Effect<V>>,
}

impl<V> Transition<V> {
    fn unchanged(state: &StackState<V>) -> Self {
        Self {
            state: state.clone(),
            changed: false,
            effects: Vec::new(),
        }
    }

    fn changed(state: StackState<V>, effects: Vec<Effect<V>>) -> Self {
        Self {
            state,
            changed: true,
            effects,
        }
    }
}

impl<V> fmt::Debug for Transition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("len", &self.state.len())
            .field("active", &self.state.active)
            .field("pending_close", &self.state.pending_close)
            .field("changed", &self.changed)
            .field("effects", &self.effects)
            .finish()
    }
}

/// Abandon effects for every awaiting entry in `entries`.
fn abandon_all<'a, V: 'a>(entries: impl IntoIterator<Item = &'a Rc<Entry<V>>>) -> Vec<Effect<V>> {
    entries
        .into_iter()
        .filter(|e| e.has_pending_result())
        .map(|e| Effect::Abandon(Rc::clone(e)))
        .collect()
}

/// Replace the whole stack with `entry`.
pub fn apply_open<V>(state: &StackState<V>, entry: Entry<V>) -> Transition<V> {
    let effects = abandon_all(state.entries.iter());
    Transition::changed(StackState::with_entries(vec![Rc::new(entry)], Some(0)), effects)
}

/// Append `entry` and make it active.
pub fn apply_push<V>(state: &StackState<V>, entry: Entry<V>) -> Transition<V> {
    let mut entries = state.entries.clone();
    entries.push(Rc::new(entry));
    let active = entries.len() - 1;
    Transition::changed(StackState::with_entries(entries, Some(active)), Vec::new())
}

/// Remove the top entry. Popping the last entry empties the stack.
pub fn apply_pop<V>(state: &StackState<V>, options: PopOptions) -> Transition<V> {
    let Some(top) = state.entries.last() else {
        return Transition::unchanged(state);
    };
    let intent = CloseIntent::Dismiss {
        id: top.id(),
        exit_direction: options.exit_direction,
    };
    let effects = abandon_all(std::iter::once(top));

    let mut entries = state.entries.clone();
    entries.pop();
    let active = entries.len().checked_sub(1);
    let mut next = StackState::with_entries(entries, active);
    next.pending_close = Some(intent);
    Transition::changed(next, effects)
}

/// Make the entry at `index` active without removing anything.
pub fn apply_go_to<V>(state: &StackState<V>, index: usize) -> Transition<V> {
    if index >= state.entries.len() {
        return Transition::unchanged(state);
    }
    Transition::changed(
        StackState::with_entries(state.entries.clone(), Some(index)),
        Vec::new(),
    )
}

/// Empty the stack unconditionally.
pub fn apply_clear<V>(state: &StackState<V>) -> Transition<V> {
    // An empty stack may still have an entry playing its exit.
    let exiting = matches!(state.pending_close, Some(CloseIntent::Dismiss { .. }));
    if state.is_empty() && !exiting {
        return Transition::unchanged(state);
    }
    let effects = abandon_all(state.entries.iter());
    let mut next = StackState::new();
    next.pending_close = Some(CloseIntent::Teardown);
    Transition::changed(next, effects)
}

/// Deliver `value` to the active entry (if it awaits one) and remove it.
///
/// The previous slot becomes active, clamped to the bottom of the stack.
pub fn apply_resolve<V>(state: &StackState<V>, value: SheetValue) -> Transition<V> {
    let Some(index) = state.active else {
        return Transition::unchanged(state);
    };
    let Some(target) = state.entries.get(index) else {
        return Transition::unchanged(state);
    };
    let effects = if target.has_pending_result() {
        vec![Effect::Resolve {
            entry: Rc::clone(target),
            value,
        }]
    } else {
        Vec::new()
    };
    let intent = CloseIntent::Dismiss {
        id: target.id(),
        exit_direction: None,
    };

    let mut entries = state.entries.clone();
    entries.remove(index);
    let active = if entries.is_empty() {
        None
    } else {
        Some(index.saturating_sub(1))
    };
    let mut next = StackState::with_entries(entries, active);
    next.pending_close = Some(intent);
    Transition::changed(next, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SheetOptions;
    use crate::props::Props;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        A,
        B,
        C,
    }

    fn entry(view: View) -> Entry<View> {
        Entry::new(view, Props::new(), SheetOptions::new())
    }

    fn commit(t: Transition<View>) -> StackState<View> {
        for effect in t.effects {
            effect.run();
        }
        t.state
    }

    fn views(state: &StackState<View>) -> Vec<View> {
        state.entries().iter().map(|e| *e.view()).collect()
    }

    #[test]
    fn empty_stack() {
        let state = StackState::<View>::new();
        assert!(state.is_empty());
        assert_eq!(state.active_index(), None);
        assert!(state.active().is_none());
        assert!(state.invariant_violation().is_none());
    }

    #[test]
    fn open_replaces_stack() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let s = commit(apply_push(&s, entry(View::B)));
        let s = commit(apply_open(&s, entry(View::C)));
        assert_eq!(views(&s), vec![View::C]);
        assert_eq!(s.active_index(), Some(0));
        assert_eq!(s.pending_close(), None);
    }

    #[test]
    fn push_appends_and_activates() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let s = commit(apply_push(&s, entry(View::B)));
        assert_eq!(views(&s), vec![View::A, View::B]);
        assert_eq!(s.active_index(), Some(1));
        assert!(s.is_active(1));
        assert!(!s.is_active(0));
    }

    #[test]
    fn pop_removes_top_and_records_intent() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let s = commit(apply_push(&s, entry(View::B)));
        let b = s.top().unwrap().id();
        let t = apply_pop(&s, PopOptions::exit(AnimationDirection::Right));
        assert!(t.changed);
        let s = commit(t);
        assert_eq!(views(&s), vec![View::A]);
        assert_eq!(s.active_index(), Some(0));
        assert_eq!(
            s.pending_close(),
            Some(CloseIntent::Dismiss {
                id: b,
                exit_direction: Some(AnimationDirection::Right)
            })
        );
    }

    #[test]
    fn pop_last_entry_empties_stack() {
        let s = commit(apply_open(&StackState::new(), entry(View::A)));
        let s = commit(apply_pop(&s, PopOptions::new()));
        assert!(s.is_empty());
        assert_eq!(s.active_index(), None);
        assert!(matches!(
            s.pending_close(),
            Some(CloseIntent::Dismiss { exit_direction: None, .. })
        ));
    }

    #[test]
    fn pop_empty_is_noop() {
        let t = apply_pop(&StackState::<View>::new(), PopOptions::new());
        assert!(!t.changed);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn go_to_keeps_history() {
        let mut s = StackState::new();
        for v in [View::A, View::B, View::C] {
            s = commit(apply_push(&s, entry(v)));
        }
        let s = commit(apply_go_to(&s, 0));
        assert_eq!(s.len(), 3);
        assert_eq!(s.active_index(), Some(0));
        assert_eq!(*s.active().unwrap().view(), View::A);

        let s = commit(apply_push(&s, entry(View::B)));
        assert_eq!(views(&s), vec![View::A, View::B, View::C, View::B]);
        assert_eq!(s.active_index(), Some(3));
    }

    #[test]
    fn go_to_out_of_range_is_noop() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let t = apply_go_to(&s, 1);
        assert!(!t.changed);
        assert_eq!(t.state.active_index(), Some(0));
    }

    #[test]
    fn clear_empties_with_teardown_intent() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let s = commit(apply_push(&s, entry(View::B)));
        let s = commit(apply_clear(&s));
        assert!(s.is_empty());
        assert_eq!(s.pending_close(), Some(CloseIntent::Teardown));
    }

    #[test]
    fn clear_on_empty_is_noop() {
        assert!(!apply_clear(&StackState::<View>::new()).changed);
    }

    #[test]
    fn clear_after_last_pop_still_tears_down() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let s = commit(apply_pop(&s, PopOptions::new()));
        let t = apply_clear(&s);
        assert!(t.changed);
        assert_eq!(t.state.pending_close(), Some(CloseIntent::Teardown));
        assert!(!apply_clear(&t.state).changed);
    }

    #[test]
    fn resolve_delivers_and_removes_active() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let (confirm, mut fut) = Entry::awaiting(View::B, Props::new(), SheetOptions::new());
        let s = commit(apply_push(&s, confirm));
        let t = apply_resolve(&s, json!({"confirmed": true}));
        assert_eq!(t.effects.len(), 1);
        let s = commit(t);
        assert_eq!(views(&s), vec![View::A]);
        assert_eq!(s.active_index(), Some(0));
        assert_eq!(fut.try_take().unwrap().unwrap(), json!({"confirmed": true}));
    }

    #[test]
    fn resolve_plain_entry_removes_without_effect() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let t = apply_resolve(&s, json!(1));
        assert!(t.changed);
        assert!(t.effects.is_empty());
        assert!(t.state.is_empty());
    }

    #[test]
    fn resolve_non_top_active_entry() {
        let mut s = StackState::new();
        for v in [View::A, View::B, View::C] {
            s = commit(apply_push(&s, entry(v)));
        }
        let s = commit(apply_go_to(&s, 1));
        let s = commit(apply_resolve(&s, json!(null)));
        assert_eq!(views(&s), vec![View::A, View::C]);
        assert_eq!(s.active_index(), Some(0));
    }

    #[test]
    fn resolve_bottom_entry_clamps_to_zero() {
        let mut s = StackState::new();
        for v in [View::A, View::B] {
            s = commit(apply_push(&s, entry(v)));
        }
        let s = commit(apply_go_to(&s, 0));
        let s = commit(apply_resolve(&s, json!(null)));
        assert_eq!(views(&s), vec![View::B]);
        assert_eq!(s.active_index(), Some(0));
    }

    #[test]
    fn resolve_empty_is_noop() {
        let t = apply_resolve(&StackState::<View>::new(), json!(1));
        assert!(!t.changed);
    }

    #[test]
    fn pop_abandons_awaiting_entry() {
        let (confirm, mut fut) = Entry::awaiting(View::A, Props::new(), SheetOptions::new());
        let s = commit(apply_open(&StackState::new(), confirm));
        let t = apply_pop(&s, PopOptions::new());
        assert!(matches!(t.effects.as_slice(), [Effect::Abandon(_)]));
        commit(t);
        assert!(fut.try_take().unwrap().unwrap_err().is_dropped());
    }

    #[test]
    fn open_and_clear_abandon_all_awaiting_entries() {
        let (a, mut fa) = Entry::awaiting(View::A, Props::new(), SheetOptions::new());
        let (b, mut fb) = Entry::awaiting(View::B, Props::new(), SheetOptions::new());
        let s = commit(apply_push(&StackState::new(), a));
        let s = commit(apply_open(&s, b));
        assert!(fa.try_take().unwrap().is_err());
        assert!(fb.try_take().is_none());
        commit(apply_clear(&s));
        assert!(fb.try_take().unwrap().is_err());
    }

    #[test]
    fn second_resolve_does_not_reach_detached_entry() {
        let (a, mut fa) = Entry::awaiting(View::A, Props::new(), SheetOptions::new());
        let s = commit(apply_open(&StackState::new(), a));
        let s = commit(apply_resolve(&s, json!(1)));
        let t = apply_resolve(&s, json!(2));
        assert!(!t.changed);
        assert_eq!(fa.try_take().unwrap().unwrap(), json!(1));
    }

    #[test]
    fn transitions_do_not_mutate_input() {
        let s = commit(apply_push(&StackState::new(), entry(View::A)));
        let _ = apply_pop(&s, PopOptions::new());
        let _ = apply_clear(&s);
        assert_eq!(s.len(), 1);
        assert_eq!(s.active_index(), Some(0));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Open,
        Push,
        PushAwait,
        Pop,
        GoTo(usize),
        Clear,
        Resolve,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            1 => Just(Op::Open),
            3 => Just(Op::Push),
            1 => Just(Op::PushAwait),
            2 => Just(Op::Pop),
            1 => (0usize..6).prop_map(Op::GoTo),
            1 => Just(Op::Clear),
            1 => Just(Op::Resolve),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            let mut state = StackState::new();
            let mut seen: HashSet<SheetId> = HashSet::new();
            for op in ops {
                let before = state.len();
                let t = match op {
                    Op::Open => apply_open(&state, entry(View::A)),
                    Op::Push => apply_push(&state, entry(View::B)),
                    Op::PushAwait => {
                        let (e, _fut) = Entry::awaiting(View::C, Props::new(), SheetOptions::new());
                        apply_push(&state, e)
                    }
                    Op::Pop => apply_pop(&state, PopOptions::new()),
                    Op::GoTo(i) => apply_go_to(&state, i),
                    Op::Clear => apply_clear(&state),
                    Op::Resolve => apply_resolve(&state, json!(null)),
                };
                state = commit(t);

                match op {
                    Op::Push | Op::PushAwait => prop_assert_eq!(state.len(), before + 1),
                    Op::Pop => prop_assert_eq!(state.len(), before.saturating_sub(1)),
                    Op::GoTo(_) => prop_assert_eq!(state.len(), before),
                    Op::Open => prop_assert_eq!(state.len(), 1),
                    Op::Clear => prop_assert_eq!(state.len(), 0),
                    Op::Resolve => prop_assert_eq!(state.len(), before.saturating_sub(1)),
                }

                prop_assert!(state.invariant_violation().is_none(), "{:?}", state.invariant_violation());
                let active_count = (0..state.len()).filter(|&i| state.is_active(i)).count();
                prop_assert_eq!(active_count, usize::from(!state.is_empty()));

                if matches!(op, Op::Open | Op::Push | Op::PushAwait) {
                    let top = state.top().map(|e| e.id());
                    prop_assert!(top.is_some_and(|id| seen.insert(id)), "id reused");
                }
            }
        }
    }
}
