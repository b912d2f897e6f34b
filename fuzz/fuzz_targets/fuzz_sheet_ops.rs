#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use fullsheet_core::{AnimationDirection, PopOptions, Props, SheetOptions};
use fullsheet_runtime::SheetController;
use fullsheet_widgets::{HitRegion, SheetRenderer};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Dir {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl From<Dir> for AnimationDirection {
    fn from(d: Dir) -> Self {
        match d {
            Dir::None => AnimationDirection::None,
            Dir::Up => AnimationDirection::Up,
            Dir::Down => AnimationDirection::Down,
            Dir::Left => AnimationDirection::Left,
            Dir::Right => AnimationDirection::Right,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Open { enter: Dir, exit: Dir },
    Push { enter: Dir, exit: Dir, close_on_backdrop: bool },
    PushAwait { exit: Dir },
    Pop(Option<Dir>),
    GoTo(u8),
    Clear,
    Resolve(bool),
    Tick(u16),
    FinishExiting,
    FinishEntering,
    Backdrop(bool),
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 {
        return;
    }
    let sheets = SheetController::<u8>::new();
    let renderer = SheetRenderer::new(&sheets);
    let mut futures = Vec::new();

    for (n, op) in ops.into_iter().enumerate() {
        let view = n as u8;
        let depth = sheets.depth();
        match op {
            Op::Open { enter, exit } => {
                sheets.open(view, Props::new(), SheetOptions::new().enter(enter.into()).exit(exit.into()));
                assert_eq!(sheets.depth(), 1);
            }
            Op::Push { enter, exit, close_on_backdrop } => {
                let options = SheetOptions::new()
                    .enter(enter.into())
                    .exit(exit.into())
                    .close_on_backdrop_click(close_on_backdrop);
                sheets.push(view, Props::new(), options);
                assert_eq!(sheets.depth(), depth + 1);
            }
            Op::PushAwait { exit } => {
                let options = SheetOptions::new().exit(exit.into()).close_on_backdrop_click(true);
                futures.push(sheets.push_await(view, Props::new(), options));
            }
            Op::Pop(dir) => {
                let options = dir.map_or(PopOptions::new(), |d| PopOptions::exit(d.into()));
                sheets.pop(options);
                assert_eq!(sheets.depth(), depth.saturating_sub(1));
            }
            Op::GoTo(i) => {
                sheets.go_to(usize::from(i));
            }
            Op::Clear => {
                sheets.clear();
                assert!(!renderer.is_visible());
            }
            Op::Resolve(confirmed) => {
                sheets.resolve(serde_json::json!({ "confirmed": confirmed }));
            }
            Op::Tick(ms) => {
                renderer.tick(Duration::from_millis(u64::from(ms)));
            }
            Op::FinishExiting => {
                if let Some(id) = renderer.exiting_id() {
                    assert!(renderer.animation_finished(id));
                    assert!(!renderer.animation_finished(id));
                }
            }
            Op::FinishEntering => {
                if let Some(id) = renderer.entering_id() {
                    assert!(renderer.animation_finished(id));
                }
            }
            Op::Backdrop(on_content) => {
                if let Some(entry) = sheets.current() {
                    let region = if on_content { HitRegion::Content } else { HitRegion::Backdrop };
                    renderer.backdrop_click(entry.id(), region);
                }
            }
        }

        let state = sheets.state();
        assert!(state.invariant_violation().is_none());
        let mounted = renderer.mounted_ids();
        for entry in state.entries() {
            assert!(mounted.contains(&entry.id()));
        }
        assert!(mounted.len() <= state.len() + 1);
        let active = renderer.layers().iter().filter(|l| l.is_active).count();
        assert_eq!(active, usize::from(!state.is_empty()));
    }

    let state = sheets.state();
    for mut fut in futures {
        let settled = fut.try_take().is_some();
        assert_eq!(settled, !state.contains(fut.id()));
    }
});
