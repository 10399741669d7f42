//! One-shot handoff between a callback driven native engine and an async
//! caller.
//!
//! The engine side gets a [`Resolver`] and calls it exactly once from its
//! completion callback; the caller awaits the matching [`Pending`].

use std::pin::Pin;
use std::task::{Context, Poll};

use shared::error::{Error, Result};
use tokio::sync::oneshot;

/// Creates a connected resolver/pending pair.
pub fn pending<T>() -> (Resolver<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    (Resolver { tx }, Pending { rx })
}

/// Completes the paired [`Pending`]. Consumed on use, so a result can only be
/// delivered once.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: oneshot::Sender<Result<T>>,
}

impl<T> Resolver<T> {
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    pub fn reject(self, err: Error) {
        let _ = self.tx.send(Err(err));
    }

    pub fn complete(self, result: Result<T>) {
        let _ = self.tx.send(result);
    }
}

/// Future side of the bridge. Fails with `ErrNative` if the resolver is
/// dropped without completing.
#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::ErrNative(
                "callback dropped without completing".to_owned(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
