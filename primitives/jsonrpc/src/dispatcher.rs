//! Command dispatch.
//!
//! The [`Dispatcher`] assigns request ids, builds envelopes, and runs each
//! transport call on its own task so that [`Dispatcher::send_command`]
//! returns without waiting. It owns no decoding logic; [`Pending`] pairs a
//! promise with the decoder of the command that produced it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use registry::{Command, CommandRegistry};
use serde_json::value::RawValue;
use tokio::runtime::Handle;
use transport::{DynTransport, JsonRpcResponse, Transport};

use crate::error::{DecodeError, RpcClientError};
use crate::promise::{self, Failure, Outcome, Promise};
use crate::request::RequestBuilder;

/// Sends registered commands over a transport.
pub struct Dispatcher {
    builder: RequestBuilder,
    transport: DynTransport,
    next_id: AtomicU64,
    runtime: Handle,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoint", &self.transport.endpoint())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher that spawns transport calls on the current tokio
    /// runtime.
    ///
    /// # Errors
    /// Returns [`RpcClientError::NoRuntime`] when called outside a runtime.
    pub fn new(
        registry: Arc<CommandRegistry>,
        transport: DynTransport,
    ) -> Result<Self, RpcClientError> {
        let runtime = Handle::try_current().map_err(|_| RpcClientError::NoRuntime)?;
        Ok(Self::with_runtime(registry, transport, runtime))
    }

    /// Create a dispatcher that spawns transport calls on `runtime`.
    pub fn with_runtime(
        registry: Arc<CommandRegistry>,
        transport: DynTransport,
        runtime: Handle,
    ) -> Self {
        Self { builder: RequestBuilder::new(registry), transport, next_id: AtomicU64::new(1), runtime }
    }

    /// The registry commands are resolved against.
    pub fn registry(&self) -> &CommandRegistry { self.builder.registry() }

    /// The transport's endpoint descriptor.
    pub fn endpoint(&self) -> &str { self.transport.endpoint() }

    /// Build `command` and hand it to the transport.
    ///
    /// Returns as soon as the request is queued. Construction errors are
    /// returned here; everything after that is delivered through the
    /// promise.
    pub fn send_command<C: Command>(&self, command: &C) -> Result<Promise, RpcClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = self.builder.build(id, command)?;
        let body = request.to_bytes()?;
        tracing::debug!(method = request.method, id, endpoint = self.endpoint(), "dispatching");

        let (resolver, promise) = promise::channel();
        let transport = Arc::clone(&self.transport);
        let method = request.method;
        self.runtime.spawn(async move {
            let outcome = deliver(transport.as_ref(), body).await;
            if let Err(failure) = &outcome {
                tracing::debug!(method, id, %failure, "call failed");
            }
            resolver.resolve(outcome);
        });
        Ok(promise)
    }

    /// Send `command` and attach `decode` to its promise.
    pub fn call<C, T, D>(&self, command: &C, decode: D) -> Result<Pending<T>, RpcClientError>
    where
        C: Command,
        D: Fn(&RawValue) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Ok(Pending::new(self.send_command(command)?, decode))
    }
}

async fn deliver(transport: &dyn Transport, body: Vec<u8>) -> Outcome {
    let raw = transport.send(body).await.map_err(Failure::Transport)?;
    let response = JsonRpcResponse::from_slice(&raw).map_err(Failure::Transport)?;
    tracing::trace!(id = %response.id, "response received");
    response.into_result().map_err(Failure::Rpc)
}

type Decoder<T> = Arc<dyn Fn(&RawValue) -> Result<T, DecodeError> + Send + Sync>;

/// A dispatched call together with the decoder for its result.
pub struct Pending<T> {
    promise: Promise,
    decode: Decoder<T>,
}

impl<T> Clone for Pending<T> {
    fn clone(&self) -> Self {
        Self { promise: self.promise.clone(), decode: Arc::clone(&self.decode) }
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("promise", &self.promise).finish()
    }
}

impl<T> Pending<T> {
    /// Pair a promise with a decoder.
    pub fn new<D>(promise: Promise, decode: D) -> Self
    where
        D: Fn(&RawValue) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Self { promise, decode: Arc::new(decode) }
    }

    /// Wait for the response and decode it.
    ///
    /// Each call decodes afresh, so every caller owns its value.
    pub async fn receive(&self) -> Result<T, RpcClientError> {
        let raw = self.promise.receive().await?;
        (self.decode)(&raw).map_err(|err| {
            tracing::warn!(error = %err, "response did not decode");
            RpcClientError::Decode(err)
        })
    }

    /// The underlying promise.
    pub fn promise(&self) -> &Promise { &self.promise }
}
