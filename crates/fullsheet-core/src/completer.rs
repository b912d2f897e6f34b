#![forbid(unsafe_code)]

//! One-shot result channel for await-style entries.
//!
//! [`Completer::channel`] returns the two halves: the [`Completer`] is stored
//! on the entry, the [`SheetFuture`] goes back to the opener.
//!
//! # Invariants
//!
//! - The completer fires at most once. Later calls to [`Completer::complete`]
//!   or [`Completer::abandon`] are no-ops and return `false`.
//! - An abandoned completer makes the future finish with
//!   [`ResultError::Dropped`] instead of pending forever.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::ResultError;
use crate::id::SheetId;

/// Value an overlay resolves with.
pub type SheetValue = serde_json::Value;

/// Sending half, held by the entry.
pub struct Completer {
    id: SheetId,
    sender: RefCell<Option<oneshot::Sender<SheetValue>>>,
}

impl Completer {
    /// Create a linked completer/future pair for entry `id`.
    pub fn channel(id: SheetId) -> (Self, SheetFuture) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                id,
                sender: RefCell::new(Some(tx)),
            },
            SheetFuture { id, rx },
        )
    }

    /// Deliver `value` to the waiting future.
    ///
    /// Returns `true` only for the first call; the value is dropped silently
    /// when the opener no longer holds the future.
    pub fn complete(&self, value: SheetValue) -> bool {
        match self.sender.borrow_mut().take() {
            Some(tx) => {
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }

    /// Give up without a value. The future resolves to `ResultError::Dropped`.
    pub fn abandon(&self) -> bool {
        self.sender.borrow_mut().take().is_some()
    }

    /// Whether the completer already fired or was abandoned.
    pub fn is_spent(&self) -> bool {
        self.sender.borrow().is_none()
    }

    /// Entry this completer belongs to.
    pub fn id(&self) -> SheetId {
        self.id
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("id", &self.id)
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// Receiving half, returned by `open_await` / `push_await`.
///
/// Resolves to the value passed to `resolve`, or to
/// [`ResultError::Dropped`] when the entry leaves the stack unresolved.
#[must_use = "the result of an await entry is only observable through this future"]
#[derive(Debug)]
pub struct SheetFuture {
    id: SheetId,
    rx: oneshot::Receiver<SheetValue>,
}

impl SheetFuture {
    /// Entry this future belongs to.
    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Non-blocking check for a result.
    ///
    /// Returns `None` while the entry is still on the stack.
    pub fn try_take(&mut self) -> Option<Result<SheetValue, ResultError>> {
        match self.rx.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(ResultError::Dropped { id: self.id })),
        }
    }

    /// Await the result and deserialize it into `T`.
    pub async fn decode<T: DeserializeOwned>(self) -> Result<T, ResultError> {
        let id = self.id;
        let value = self.await?;
        serde_json::from_value(value).map_err(|source| ResultError::Decode { id, source })
    }
}

impl Future for SheetFuture {
    type Output = Result<SheetValue, ResultError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| ResultError::Dropped { id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::SheetOutcome;
    use serde_json::json;

    #[test]
    fn complete_fires_once() {
        let (completer, mut fut) = Completer::channel(SheetId::next());
        assert!(fut.try_take().is_none());
        assert!(completer.complete(json!(1)));
        assert!(!completer.complete(json!(2)));
        assert!(completer.is_spent());
        assert_eq!(fut.try_take().unwrap().unwrap(), json!(1));
    }

    #[test]
    fn abandon_yields_dropped() {
        let id = SheetId::next();
        let (completer, mut fut) = Completer::channel(id);
        assert!(completer.abandon());
        assert!(!completer.abandon());
        assert!(!completer.complete(json!(true)));
        let err = fut.try_take().unwrap().unwrap_err();
        assert!(err.is_dropped());
        assert_eq!(err.id(), id);
    }

    #[test]
    fn dropping_the_future_does_not_break_completion() {
        let (completer, fut) = Completer::channel(SheetId::next());
        drop(fut);
        assert!(completer.complete(json!(null)));
    }

    #[tokio::test]
    async fn await_receives_value() {
        let (completer, fut) = Completer::channel(SheetId::next());
        completer.complete(json!({"confirmed": true}));
        assert_eq!(fut.await.unwrap(), json!({"confirmed": true}));
    }

    #[tokio::test]
    async fn decode_into_outcome() {
        let (completer, fut) = Completer::channel(SheetId::next());
        completer.complete(SheetOutcome::cancelled().into());
        let outcome: SheetOutcome = fut.decode().await.unwrap();
        assert_eq!(outcome, SheetOutcome::cancelled());
    }

    #[tokio::test]
    async fn decode_wrong_shape_reports_error() {
        let (completer, fut) = Completer::channel(SheetId::next());
        completer.complete(json!("not a number"));
        let err = fut.decode::<u32>().await.unwrap_err();
        assert!(matches!(err, ResultError::Decode { .. }));
    }
}
