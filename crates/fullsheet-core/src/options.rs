#![forbid(unsafe_code)]

//! Per-entry options and pop options.

use std::fmt;
use std::rc::Rc;

use crate::completer::SheetValue;
use crate::direction::AnimationDirection;
use crate::id::SheetId;
use crate::outcome::cancelled_value;

/// Callback invoked when an entry's backdrop is clicked.
pub type BackdropHandler = Rc<dyn Fn(SheetId)>;

/// Options recognised for each entry.
///
/// Directions and the backdrop-close flag are optional so that a runtime
/// policy can supply defaults; when neither sets them an entry has no
/// animation and backdrop clicks do not close it.
#[derive(Clone)]
pub struct SheetOptions {
    enter_direction: Option<AnimationDirection>,
    exit_direction: Option<AnimationDirection>,
    close_on_backdrop_click: Option<bool>,
    backdrop_handler: Option<BackdropHandler>,
    backdrop_result: Option<SheetValue>,
    preserve_state: bool,
    preserve_scroll: bool,
    keep_mounted: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            enter_direction: None,
            exit_direction: None,
            close_on_backdrop_click: None,
            backdrop_handler: None,
            backdrop_result: None,
            preserve_state: true,
            preserve_scroll: true,
            keep_mounted: true,
        }
    }
}

impl SheetOptions {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction the entry slides in from.
    pub fn enter(mut self, direction: AnimationDirection) -> Self {
        self.enter_direction = Some(direction);
        self
    }

    /// Set the direction the entry slides out towards.
    pub fn exit(mut self, direction: AnimationDirection) -> Self {
        self.exit_direction = Some(direction);
        self
    }

    /// Set whether a backdrop click dismisses the entry.
    pub fn close_on_backdrop_click(mut self, close: bool) -> Self {
        self.close_on_backdrop_click = Some(close);
        self
    }

    /// Set a callback run on every backdrop click.
    pub fn on_backdrop_click(mut self, handler: impl Fn(SheetId) + 'static) -> Self {
        self.backdrop_handler = Some(Rc::new(handler));
        self
    }

    /// Set the value an await entry resolves with when dismissed by a
    /// backdrop click.
    pub fn backdrop_result(mut self, value: impl Into<SheetValue>) -> Self {
        self.backdrop_result = Some(value.into());
        self
    }

    /// Hint that the view's state should survive while it is inactive.
    pub fn preserve_state(mut self, preserve: bool) -> Self {
        self.preserve_state = preserve;
        self
    }

    /// Hint that the view's scroll position should survive while inactive.
    pub fn preserve_scroll(mut self, preserve: bool) -> Self {
        self.preserve_scroll = preserve;
        self
    }

    /// Hint that the view should stay mounted while covered.
    pub fn keep_mounted(mut self, keep: bool) -> Self {
        self.keep_mounted = keep;
        self
    }

    /// Fill unset directions and backdrop behaviour from defaults.
    pub fn with_fallbacks(
        mut self,
        enter: AnimationDirection,
        exit: AnimationDirection,
        close_on_backdrop_click: bool,
    ) -> Self {
        self.enter_direction = self.enter_direction.or(Some(enter));
        self.exit_direction = self.exit_direction.or(Some(exit));
        self.close_on_backdrop_click = self
            .close_on_backdrop_click
            .or(Some(close_on_backdrop_click));
        self
    }

    // --- Accessors ---

    /// Entrance direction (`None` when unset).
    pub fn enter_direction(&self) -> AnimationDirection {
        self.enter_direction.unwrap_or_default()
    }

    /// Exit direction (`None` when unset).
    pub fn exit_direction(&self) -> AnimationDirection {
        self.exit_direction.unwrap_or_default()
    }

    /// Whether a backdrop click dismisses the entry.
    pub fn closes_on_backdrop_click(&self) -> bool {
        self.close_on_backdrop_click.unwrap_or(false)
    }

    /// Backdrop click callback, if any.
    pub fn backdrop_handler(&self) -> Option<&BackdropHandler> {
        self.backdrop_handler.as_ref()
    }

    /// Value used when a backdrop click resolves an await entry.
    ///
    /// Falls back to the `{ confirmed: false, cancelled: true }` sentinel.
    pub fn backdrop_value(&self) -> SheetValue {
        self.backdrop_result.clone().unwrap_or_else(cancelled_value)
    }

    pub fn preserves_state(&self) -> bool {
        self.preserve_state
    }

    pub fn preserves_scroll(&self) -> bool {
        self.preserve_scroll
    }

    pub fn keeps_mounted(&self) -> bool {
        self.keep_mounted
    }
}

impl fmt::Debug for SheetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetOptions")
            .field("enter_direction", &self.enter_direction)
            .field("exit_direction", &self.exit_direction)
            .field("close_on_backdrop_click", &self.close_on_backdrop_click)
            .field("backdrop_handler", &self.backdrop_handler.is_some())
            .field("backdrop_result", &self.backdrop_result)
            .field("preserve_state", &self.preserve_state)
            .field("preserve_scroll", &self.preserve_scroll)
            .field("keep_mounted", &self.keep_mounted)
            .finish()
    }
}

/// Options accepted by `pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopOptions {
    /// Overrides the departing entry's own exit direction.
    pub exit_direction: Option<AnimationDirection>,
}

impl PopOptions {
    /// Pop with the entry's configured exit direction.
    pub const fn new() -> Self {
        Self {
            exit_direction: None,
        }
    }

    /// Pop with an explicit exit direction.
    pub const fn exit(direction: AnimationDirection) -> Self {
        Self {
            exit_direction: Some(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn defaults_have_no_animation_and_no_backdrop_close() {
        let opts = SheetOptions::default();
        assert_eq!(opts.enter_direction(), AnimationDirection::None);
        assert_eq!(opts.exit_direction(), AnimationDirection::None);
        assert!(!opts.closes_on_backdrop_click());
        assert!(opts.backdrop_handler().is_none());
        assert!(opts.preserves_state());
        assert!(opts.preserves_scroll());
        assert!(opts.keeps_mounted());
    }

    #[test]
    fn default_backdrop_value_is_cancelled_sentinel() {
        let opts = SheetOptions::default();
        assert_eq!(
            opts.backdrop_value(),
            json!({"confirmed": false, "cancelled": true})
        );
        let opts = SheetOptions::new().backdrop_result(json!("dismissed"));
        assert_eq!(opts.backdrop_value(), json!("dismissed"));
    }

    #[test]
    fn fallbacks_only_fill_unset_fields() {
        let opts = SheetOptions::new()
            .enter(AnimationDirection::Right)
            .with_fallbacks(AnimationDirection::Down, AnimationDirection::Left, true);
        assert_eq!(opts.enter_direction(), AnimationDirection::Right);
        assert_eq!(opts.exit_direction(), AnimationDirection::Left);
        assert!(opts.closes_on_backdrop_click());

        let explicit = SheetOptions::new()
            .close_on_backdrop_click(false)
            .with_fallbacks(AnimationDirection::None, AnimationDirection::None, true);
        assert!(!explicit.closes_on_backdrop_click());
    }

    #[test]
    fn backdrop_handler_is_callable() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let opts = SheetOptions::new().on_backdrop_click(move |_| counter.set(counter.get() + 1));
        let handler = opts.backdrop_handler().cloned().unwrap();
        handler(SheetId::next());
        handler(SheetId::next());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn pop_options_constructors() {
        assert_eq!(PopOptions::new().exit_direction, None);
        assert_eq!(
            PopOptions::exit(AnimationDirection::Right).exit_direction,
            Some(AnimationDirection::Right)
        );
    }
}
