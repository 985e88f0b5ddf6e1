#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `swaprpc-jsonrpc`: Typed Command Dispatch
//!
//! This crate ties the command registry to a transport:
//!
//! - [`request`] builds JSON-RPC 1.0 envelopes from registered commands,
//!   applying the positional or named parameter convention.
//! - [`promise`] provides the one-shot, many-reader handle through which a
//!   response is delivered.
//! - [`dispatcher`] assigns ids, hands requests to the transport on a
//!   background task, and pairs promises with result decoders.
//! - [`error`] defines the error taxonomy every call reports through.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use jsonrpc::{Dispatcher, RpcClientError};
//! use registry::{Command, Field, ParamConvention, RegistryBuilder};
//! use transport::DynTransport;
//!
//! struct GetFeeRate;
//!
//! impl Command for GetFeeRate {
//!     fn fields(&self) -> Vec<Field> { Vec::new() }
//! }
//!
//! async fn fee_rate(transport: DynTransport) -> Result<u64, RpcClientError> {
//!     let mut registry = RegistryBuilder::new();
//!     registry.register::<GetFeeRate>("getfeerate", ParamConvention::Positional)?;
//!     let dispatcher = Dispatcher::new(Arc::new(registry.build()), transport)?;
//!
//!     let pending = dispatcher.call(&GetFeeRate, |raw| {
//!         serde_json::from_str::<u64>(raw.get()).map_err(|source| {
//!             jsonrpc::DecodeError::Json { expected: "fee rate", payload: raw.get().into(), source }
//!         })
//!     })?;
//!     pending.receive().await
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod id;
pub mod promise;
pub mod request;

pub use dispatcher::{Dispatcher, Pending};
pub use error::{DecodeError, ErrorKind, RpcClientError};
pub use id::{is_valid_id, validate_id};
pub use promise::{Failure, Outcome, Promise, Resolver};
pub use request::{Request, RequestBuilder, JSONRPC_VERSION};
