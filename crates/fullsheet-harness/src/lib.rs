#![forbid(unsafe_code)]

//! Test harness and reference fixtures for FullSheet.
//!
//! Provides a catalogue of demo screens modelled on a sign-up and
//! measurement flow, plus a text rendering of [`SheetRenderer`] output so
//! scenario tests can assert whole frames at once.
//!
//! A frame line looks like:
//!
//! ```text
//! z1 signup-password * exiting 0.88 (+0.88,+0.00)
//! ```
//!
//! `*` marks the active entry, the number after the motion is eased
//! progress, the pair is the transform in viewport fractions.

use std::fmt::Write as _;

use fullsheet::prelude::*;
use fullsheet::{Motion, SheetLayer};

/// Demo screens hosted in overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    SignupEmail,
    SignupPassword,
    SignupName,
    SignupBirth,
    SignupGender,
    MeasurementList,
    MeasurementDetail,
    Confirm,
}

impl Screen {
    /// Every screen, in flow order.
    pub const ALL: [Screen; 8] = [
        Screen::SignupEmail,
        Screen::SignupPassword,
        Screen::SignupName,
        Screen::SignupBirth,
        Screen::SignupGender,
        Screen::MeasurementList,
        Screen::MeasurementDetail,
        Screen::Confirm,
    ];

    /// Sign-up steps, first to last.
    pub const SIGNUP: [Screen; 5] = [
        Screen::SignupEmail,
        Screen::SignupPassword,
        Screen::SignupName,
        Screen::SignupBirth,
        Screen::SignupGender,
    ];

    pub const fn slug(self) -> &'static str {
        match self {
            Self::SignupEmail => "signup-email",
            Self::SignupPassword => "signup-password",
            Self::SignupName => "signup-name",
            Self::SignupBirth => "signup-birth",
            Self::SignupGender => "signup-gender",
            Self::MeasurementList => "measurement-list",
            Self::MeasurementDetail => "measurement-detail",
            Self::Confirm => "confirm",
        }
    }

    /// Options the demo app uses when pushing this screen.
    ///
    /// The first sign-up step slides in from the right; later steps appear
    /// instantly and slide out to the right when backed out of.
    pub fn options(self) -> SheetOptions {
        match self {
            Self::SignupEmail | Self::MeasurementList | Self::MeasurementDetail => SheetOptions::new()
                .enter(AnimationDirection::Right)
                .exit(AnimationDirection::Right),
            Self::SignupPassword | Self::SignupName | Self::SignupBirth | Self::SignupGender => {
                SheetOptions::new()
                    .enter(AnimationDirection::None)
                    .exit(AnimationDirection::Right)
            }
            Self::Confirm => SheetOptions::new()
                .enter(AnimationDirection::Down)
                .exit(AnimationDirection::Down)
                .close_on_backdrop_click(true),
        }
    }

    /// Next sign-up step, if any.
    pub fn next_step(self) -> Option<Screen> {
        let i = Self::SIGNUP.iter().position(|s| *s == self)?;
        Self::SIGNUP.get(i + 1).copied()
    }
}

/// Push the next sign-up step after the active one, or the first step on an
/// empty stack. Returns the pushed screen.
pub fn advance_signup(sheets: &SheetController<Screen>) -> Option<Screen> {
    let next = match sheets.current() {
        Some(entry) => entry.view().next_step()?,
        None => Screen::SignupEmail,
    };
    sheets.push(next, Props::new(), next.options());
    Some(next)
}

/// Render one layer as a single frame line.
pub fn layer_line(layer: &SheetLayer<Screen>) -> String {
    let mut line = format!("z{} {}", layer.z_index, layer.entry.view().slug());
    if layer.is_active {
        line.push_str(" *");
    }
    match layer.motion {
        Motion::Static => line.push_str(" static"),
        Motion::Entering { progress } => {
            let _ = write!(line, " entering {progress:.2}");
        }
        Motion::Exiting { progress } => {
            let _ = write!(line, " exiting {progress:.2}");
        }
    }
    // Adding zero folds -0.0 into 0.0 so frames stay stable.
    let _ = write!(
        line,
        " ({:+.2},{:+.2})",
        layer.transform.x + 0.0,
        layer.transform.y + 0.0
    );
    line
}

/// Render every mounted layer, bottom to top, one per line.
pub fn frame_text(renderer: &SheetRenderer<Screen>) -> String {
    renderer
        .layers()
        .iter()
        .map(layer_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collects frames across a scenario.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<String>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the renderer's current frame.
    pub fn record(&mut self, renderer: &SheetRenderer<Screen>) -> &str {
        let frame = frame_text(renderer);
        tracing::trace!(frame = self.frames.len(), layers = renderer.layers().len(), "frame recorded");
        self.frames.push(frame);
        self.frames.last().map_or("", String::as_str)
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    /// Frames serialized as a JSON array, for attaching to failure reports.
    pub fn to_json(&self) -> String {
        serde_json::Value::from(self.frames.clone()).to_string()
    }
}
