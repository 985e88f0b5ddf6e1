//! One-shot result delivery.
//!
//! [`channel`] creates a linked [`Resolver`] and [`Promise`]. The resolver is
//! handed to whoever owns the response path and is consumed by
//! [`Resolver::resolve`], so a promise can be resolved at most once. The
//! promise is cheap to clone; every clone observes the same outcome, and
//! reads after resolution return immediately.
//!
//! If the resolver is dropped without resolving, the promise resolves to
//! [`TransportError::Closed`] instead of waiting forever.

use std::fmt;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use serde_json::value::RawValue;
use thiserror::Error;
use transport::{RpcError, TransportError};

/// Why a dispatched call produced no payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The transport failed.
    #[error(transparent)]
    Transport(TransportError),
    /// The backend returned an error object.
    #[error(transparent)]
    Rpc(RpcError),
}

/// The terminal value of a promise: the raw `result` JSON or a failure.
pub type Outcome = Result<Box<RawValue>, Failure>;

/// Create a linked resolver and promise.
pub fn channel() -> (Resolver, Promise) {
    let (tx, rx) = oneshot::channel();
    (Resolver { tx }, Promise { inner: rx.shared() })
}

/// The producing half. Resolving consumes it.
pub struct Resolver {
    tx: oneshot::Sender<Outcome>,
}

impl Resolver {
    /// Deliver the outcome to every holder of the linked promise.
    pub fn resolve(self, outcome: Outcome) {
        if self.tx.send(outcome).is_err() {
            tracing::trace!("promise dropped before resolution; outcome discarded");
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").field("canceled", &self.tx.is_canceled()).finish()
    }
}

/// The consuming half: a shareable handle to one call's outcome.
#[derive(Clone)]
pub struct Promise {
    inner: Shared<oneshot::Receiver<Outcome>>,
}

impl Promise {
    /// A promise that is already resolved with `outcome`.
    pub fn resolved(outcome: Outcome) -> Self {
        let (resolver, promise) = channel();
        resolver.resolve(outcome);
        promise
    }

    /// Wait for the outcome.
    ///
    /// Returns the same outcome on every call, from any clone.
    pub async fn receive(&self) -> Outcome { settle(self.inner.clone().await) }

    /// The outcome, if the promise has already been resolved.
    ///
    /// Returns `None` until some reader has awaited the resolved promise.
    /// Never waits.
    pub fn try_receive(&self) -> Option<Outcome> { self.inner.peek().cloned().map(settle) }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise").field("resolved", &self.inner.peek().is_some()).finish()
    }
}

fn settle(received: Result<Outcome, oneshot::Canceled>) -> Outcome {
    received.unwrap_or(Err(Failure::Transport(TransportError::Closed)))
}
