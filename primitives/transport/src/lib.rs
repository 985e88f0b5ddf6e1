#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `swaprpc-transport`: Wire Boundary for Wallet RPC
//!
//! This crate defines the **transport abstraction** consumed by the typed
//! command framework. A transport moves already-serialized JSON-RPC request
//! bytes to a wallet backend and hands back the raw response body; it knows
//! nothing about commands, ids or result shapes.
//!
//! ## Core Concepts
//!
//! ### `Transport` Trait
//! A single asynchronous operation, `send`, taking request bytes and
//! returning response bytes. Backends such as `swaprpc-http` implement it to
//! perform the actual I/O.
//!
//! ### `TransportError`
//! Enumerates the communication failures a transport can report. These are
//! passed through unchanged to the caller of a command.
//!
//! ### `RpcError`
//! The structured `{code, message}` failure reported by the backend itself,
//! kept distinct from transport and decode failures so that callers can
//! branch on the backend's code.
//!
//! ### `JsonRpcResponse`
//! The response envelope. [`JsonRpcResponse::from_slice`] parses a body and
//! [`JsonRpcResponse::into_result`] splits it into the raw `result` payload
//! or an [`RpcError`].
//!
//! ## Example
//! ```no_run
//! use transport::{DynTransport, JsonRpcResponse, TransportError};
//!
//! async fn demo(transport: DynTransport) -> Result<(), TransportError> {
//!     let body = br#"{"jsonrpc":"1.0","method":"getfeerate","params":[],"id":1}"#;
//!     let raw = transport.send(body.to_vec()).await?;
//!     let response = JsonRpcResponse::from_slice(&raw)?;
//!     println!("{:?}", response.into_result());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Canonical error type for all transport implementations.
///
/// Variants carry rendered messages rather than backend error types so the
/// error stays `Clone`: a single failure is delivered to every reader of a
/// pending call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// An HTTP-level failure (connection refused, timeout, or bad status code).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// Failure to read or write a payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response did not conform to the JSON-RPC envelope format.
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// The response path was torn down before a response was delivered.
    #[error("Transport closed before a response was delivered")]
    Closed,

    /// Any other error not covered by the specific variants above.
    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self { TransportError::Serialization(err.to_string()) }
}

/// Numeric code attached to an [`RpcError`].
///
/// A distinct type keeps backend codes from being mixed up with other
/// integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RpcErrorCode(pub i64);

impl fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A failure reported by the wallet backend in the `error` member of a
/// response.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct RpcError {
    /// Backend-defined error code.
    pub code: RpcErrorCode,
    /// Human readable message from the backend.
    pub message: String,
}

impl RpcError {
    /// Construct an error from a code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code: RpcErrorCode(code), message: message.into() }
    }
}

/// The base transport trait.
///
/// Implementations must answer every call exactly once, with either the
/// response body or a [`TransportError`], including when the connection is
/// lost mid-request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one serialized JSON-RPC request and returns the raw response body.
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>>;

    /// Returns the configured endpoint or connection descriptor.
    ///
    /// For network transports, this is usually the URL.
    /// For mock or in-memory transports, it may be a symbolic name.
    fn endpoint(&self) -> &str;
}

/// Type alias for a shared, dynamically dispatched transport instance.
///
/// ```
/// use transport::DynTransport;
///
/// fn use_transport(t: DynTransport) {
///     println!("Using endpoint: {}", t.endpoint());
/// }
/// ```
pub type DynTransport = Arc<dyn Transport>;

/// A JSON-RPC response envelope.
///
/// `result` is kept as unparsed JSON text; interpreting it is left to the
/// decoder of the command that produced the request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    /// The value returned by the call; the JSON text `null` when absent.
    #[serde(default = "null_payload")]
    pub result: Box<RawValue>,
    /// The error object returned by the server, if any.
    #[serde(default)]
    pub error: Option<Value>,
    /// The identifier correlating request and response.
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcResponse {
    /// Parse a response body.
    ///
    /// A body that is not a JSON-RPC envelope is reported as
    /// [`TransportError::InvalidFormat`] with the body text attached.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            TransportError::InvalidFormat(format!("{} (body: {})", e, String::from_utf8_lossy(body)))
        })
    }

    /// Split the envelope into its raw result or the backend error.
    ///
    /// An error member that is not a `{code, message}` object is still
    /// reported as an [`RpcError`], with code `0` and the member's JSON text
    /// as message.
    pub fn into_result(self) -> std::result::Result<Box<RawValue>, RpcError> {
        match self.error {
            Some(Value::Null) | None => {}
            Some(error) => {
                return Err(serde_json::from_value::<RpcError>(error.clone()).unwrap_or_else(|_| {
                    tracing::debug!(%error, "unstructured error member; reporting as code 0");
                    RpcError::new(0, error.to_string())
                }));
            }
        }
        Ok(self.result)
    }
}

fn null_payload() -> Box<RawValue> { RawValue::NULL.to_owned() }
