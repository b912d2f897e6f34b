#![forbid(unsafe_code)]

//! A single overlay in the stack.

use std::fmt;

use crate::completer::{Completer, SheetFuture, SheetValue};
use crate::direction::AnimationDirection;
use crate::id::SheetId;
use crate::options::SheetOptions;
use crate::props::Props;

/// One overlay: a view handle plus its props, options and optional result
/// channel.
///
/// `V` is the host's view handle, typically an enum of known screens. The
/// stack never inspects it. Entries are immutable once created; whether an
/// entry is active is derived from the stack it lives in.
pub struct Entry<V> {
    id: SheetId,
    view: V,
    props: Props,
    options: SheetOptions,
    completer: Option<Completer>,
}

impl<V> Entry<V> {
    /// Create a plain entry with a fresh id.
    pub fn new(view: V, props: Props, options: SheetOptions) -> Self {
        Self {
            id: SheetId::next(),
            view,
            props,
            options,
            completer: None,
        }
    }

    /// Create an await-style entry and the future its resolution completes.
    pub fn awaiting(view: V, props: Props, options: SheetOptions) -> (Self, SheetFuture) {
        let id = SheetId::next();
        let (completer, future) = Completer::channel(id);
        let entry = Self {
            id,
            view,
            props,
            options,
            completer: Some(completer),
        };
        (entry, future)
    }

    #[inline]
    pub fn id(&self) -> SheetId {
        self.id
    }

    #[inline]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[inline]
    pub fn props(&self) -> &Props {
        &self.props
    }

    #[inline]
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Whether this entry was opened with `open_await` / `push_await`.
    pub fn is_awaiting(&self) -> bool {
        self.completer.is_some()
    }

    /// Whether the entry still has an undelivered result.
    pub fn has_pending_result(&self) -> bool {
        self.completer.as_ref().is_some_and(|c| !c.is_spent())
    }

    pub fn enter_direction(&self) -> AnimationDirection {
        self.options.enter_direction()
    }

    pub fn exit_direction(&self) -> AnimationDirection {
        self.options.exit_direction()
    }

    /// Deliver a result. No-op (returns `false`) for plain entries and for
    /// entries that already delivered.
    pub(crate) fn complete(&self, value: SheetValue) -> bool {
        self.completer.as_ref().is_some_and(|c| c.complete(value))
    }

    /// Release the result channel without a value.
    pub(crate) fn abandon(&self) -> bool {
        self.completer.as_ref().is_some_and(Completer::abandon)
    }
}

impl<V: fmt::Debug> fmt::Debug for Entry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("view", &self.view)
            .field("props", &self.props)
            .field("options", &self.options)
            .field("awaiting", &self.is_awaiting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        Settings,
        Confirm,
    }

    #[test]
    fn plain_entry_has_no_result_channel() {
        let entry = Entry::new(View::Settings, Props::new(), SheetOptions::new());
        assert!(!entry.is_awaiting());
        assert!(!entry.has_pending_result());
        assert!(!entry.complete(json!(1)));
        assert_eq!(*entry.view(), View::Settings);
    }

    #[test]
    fn awaiting_entry_links_future() {
        let (entry, mut fut) = Entry::awaiting(View::Confirm, Props::new(), SheetOptions::new());
        assert_eq!(fut.id(), entry.id());
        assert!(entry.has_pending_result());
        assert!(entry.complete(json!("ok")));
        assert!(!entry.has_pending_result());
        assert!(!entry.complete(json!("again")));
        assert_eq!(fut.try_take().unwrap().unwrap(), json!("ok"));
    }

    #[test]
    fn entries_get_distinct_ids() {
        let a = Entry::new(View::Settings, Props::new(), SheetOptions::new());
        let b = Entry::new(View::Settings, Props::new(), SheetOptions::new());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn directions_come_from_options() {
        let entry = Entry::new(
            View::Settings,
            Props::new(),
            SheetOptions::new()
                .enter(AnimationDirection::Down)
                .exit(AnimationDirection::Right),
        );
        assert_eq!(entry.enter_direction(), AnimationDirection::Down);
        assert_eq!(entry.exit_direction(), AnimationDirection::Right);
    }
}
