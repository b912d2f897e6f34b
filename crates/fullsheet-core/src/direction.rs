#![forbid(unsafe_code)]

//! Animation direction resolver.
//!
//! Maps a symbolic [`AnimationDirection`] to the pair of transforms an
//! overlay moves between. Transforms are viewport fractions: `x = 1.0` is one
//! full viewport width to the right, `y = -1.0` is one full viewport height
//! above.
//!
//! | Direction | Enter (initial → target) | Exit (initial → target) |
//! |-----------|--------------------------|-------------------------|
//! | `Left`    | `(-1, 0)` → `(0, 0)`     | `(0, 0)` → `(-1, 0)`    |
//! | `Right`   | `(1, 0)` → `(0, 0)`      | `(0, 0)` → `(1, 0)`     |
//! | `Up`      | `(0, -1)` → `(0, 0)`     | `(0, 0)` → `(0, -1)`    |
//! | `Down`    | `(0, 1)` → `(0, 0)`      | `(0, 0)` → `(0, 1)`     |
//! | `None`    | identity                 | identity                |

use serde::{Deserialize, Serialize};

/// Direction an overlay slides in from, or slides out towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationDirection {
    /// No animation: appear or disappear instantly.
    #[default]
    None,
    /// Towards / from the top edge.
    #[serde(alias = "top")]
    Up,
    /// Towards / from the bottom edge.
    #[serde(alias = "bottom")]
    Down,
    /// Towards / from the left edge.
    Left,
    /// Towards / from the right edge.
    Right,
}

impl AnimationDirection {
    /// Whether this direction produces any motion.
    #[inline]
    pub fn is_animated(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Off-screen offset for this direction.
    pub fn offset(self) -> Transform {
        match self {
            Self::None => Transform::IDENTITY,
            Self::Up => Transform::new(0.0, -1.0),
            Self::Down => Transform::new(0.0, 1.0),
            Self::Left => Transform::new(-1.0, 0.0),
            Self::Right => Transform::new(1.0, 0.0),
        }
    }
}

/// Whether a transform pair describes an entrance or an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Overlay is being mounted.
    Enter,
    /// Overlay is being removed.
    Exit,
}

/// Translation of an overlay in viewport fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// Horizontal offset (1.0 = one viewport width).
    pub x: f32,
    /// Vertical offset (1.0 = one viewport height).
    pub y: f32,
}

impl Transform {
    /// Resting position.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0 };

    /// Create a transform.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `target`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, target: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0) as f32;
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }

    /// Whether this is the resting position.
    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

/// Initial and target transform of one animation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformPair {
    pub initial: Transform,
    pub target: Transform,
}

impl TransformPair {
    /// Transform at the given progress in `[0, 1]`.
    pub fn at(self, progress: f64) -> Transform {
        self.initial.lerp(self.target, progress)
    }
}

/// Resolve the transform pair for `direction` and `kind`.
///
/// Exits run from the resting position towards the off-screen offset, the
/// inverse of the matching entrance. `None` resolves to an identity pair.
pub fn resolve_transforms(direction: AnimationDirection, kind: TransitionKind) -> TransformPair {
    let offset = direction.offset();
    match kind {
        TransitionKind::Enter => TransformPair {
            initial: offset,
            target: Transform::IDENTITY,
        },
        TransitionKind::Exit => TransformPair {
            initial: Transform::IDENTITY,
            target: offset,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_direction_is_none() {
        assert_eq!(AnimationDirection::default(), AnimationDirection::None);
        assert!(!AnimationDirection::None.is_animated());
        assert!(AnimationDirection::Left.is_animated());
    }

    #[test]
    fn enter_right_starts_offscreen_right() {
        let pair = resolve_transforms(AnimationDirection::Right, TransitionKind::Enter);
        assert_eq!(pair.initial, Transform::new(1.0, 0.0));
        assert!(pair.target.is_identity());
    }

    #[test]
    fn exit_is_inverse_of_enter() {
        for dir in [
            AnimationDirection::Up,
            AnimationDirection::Down,
            AnimationDirection::Left,
            AnimationDirection::Right,
        ] {
            let enter = resolve_transforms(dir, TransitionKind::Enter);
            let exit = resolve_transforms(dir, TransitionKind::Exit);
            assert_eq!(enter.initial, exit.target, "{dir:?}");
            assert_eq!(enter.target, exit.initial, "{dir:?}");
        }
    }

    #[test]
    fn up_and_down_move_vertically() {
        let up = resolve_transforms(AnimationDirection::Up, TransitionKind::Exit);
        assert_eq!(up.target, Transform::new(0.0, -1.0));
        let down = resolve_transforms(AnimationDirection::Down, TransitionKind::Enter);
        assert_eq!(down.initial, Transform::new(0.0, 1.0));
    }

    #[test]
    fn none_is_identity_both_ways() {
        for kind in [TransitionKind::Enter, TransitionKind::Exit] {
            let pair = resolve_transforms(AnimationDirection::None, kind);
            assert!(pair.initial.is_identity());
            assert!(pair.target.is_identity());
        }
    }

    #[test]
    fn pair_interpolates_and_clamps() {
        let pair = resolve_transforms(AnimationDirection::Left, TransitionKind::Exit);
        assert_eq!(pair.at(0.0), Transform::IDENTITY);
        assert_eq!(pair.at(0.5), Transform::new(-0.5, 0.0));
        assert_eq!(pair.at(2.0), Transform::new(-1.0, 0.0));
        assert_eq!(pair.at(-1.0), Transform::IDENTITY);
    }

    #[test]
    fn serde_accepts_edge_aliases() {
        let top: AnimationDirection = serde_json::from_str("\"top\"").unwrap();
        let bottom: AnimationDirection = serde_json::from_str("\"bottom\"").unwrap();
        let right: AnimationDirection = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(top, AnimationDirection::Up);
        assert_eq!(bottom, AnimationDirection::Down);
        assert_eq!(right, AnimationDirection::Right);
        assert_eq!(
            serde_json::to_string(&AnimationDirection::Up).unwrap(),
            "\"up\""
        );
    }
}
