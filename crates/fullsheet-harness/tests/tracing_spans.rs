#![forbid(unsafe_code)]

//! Dispatch and render spans reach a tracing subscriber.

use std::sync::{Arc, Mutex};

use fullsheet::prelude::*;
use fullsheet_harness::Screen;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone)]
struct SpanRecord {
    name: &'static str,
    op: Option<String>,
}

#[derive(Default)]
struct OpVisitor(Option<String>);

impl Visit for OpVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "op" {
            self.0 = Some(value.to_owned());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

#[derive(Clone, Default)]
struct SpanCapture(Arc<Mutex<Vec<SpanRecord>>>);

impl<S: Subscriber> Layer<S> for SpanCapture {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = OpVisitor::default();
        attrs.record(&mut visitor);
        self.0.lock().unwrap().push(SpanRecord {
            name: attrs.metadata().name(),
            op: visitor.0,
        });
    }
}

fn capture(f: impl FnOnce()) -> Vec<SpanRecord> {
    let layer = SpanCapture::default();
    let records = Arc::clone(&layer.0);
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let out = records.lock().unwrap().clone();
    out
}

#[test]
fn each_change_opens_a_dispatch_span() {
    let spans = capture(|| {
        let sheets = SheetController::new();
        sheets.push(Screen::SignupEmail, Props::new(), SheetOptions::new());
        sheets.go_to(0);
        sheets.go_to(7);
        sheets.pop(PopOptions::new());
    });
    let ops: Vec<_> = spans
        .iter()
        .filter(|s| s.name == "fullsheet.dispatch")
        .filter_map(|s| s.op.clone())
        .collect();
    // The out-of-range go_to is a no-op and opens no span.
    assert_eq!(ops, vec!["push", "go_to", "pop"]);
}

#[test]
fn renderer_observes_inside_dispatch() {
    let spans = capture(|| {
        let sheets = SheetController::new();
        let _renderer = SheetRenderer::new(&sheets);
        sheets.push(Screen::Confirm, Props::new(), Screen::Confirm.options());
    });
    let names: Vec<_> = spans.iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["fullsheet.dispatch", "sheet_observe"]);
}
