//! Request envelope construction.
//!
//! [`RequestBuilder`] turns a registered command value into a JSON-RPC 1.0
//! request. Positional commands are emitted as an array that stops at the
//! first unset optional field, matching how wallet servers read a short
//! parameter list as "remaining parameters omitted". Fields declared after
//! that point are never sent, even when set.

use std::sync::Arc;

use registry::{Command, CommandRegistry, Field, ParamConvention};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RpcClientError;
use crate::id::validate_id;

/// Protocol tag carried by every request.
pub const JSONRPC_VERSION: &str = "1.0";

/// A JSON-RPC 1.0 request envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: &'static str,
    /// Registered method name.
    pub method: &'static str,
    /// Array for positional commands, object for named ones.
    pub params: Value,
    /// Validated request id.
    pub id: Value,
}

impl Request {
    /// Serialize the envelope for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RpcClientError> {
        serde_json::to_vec(self)
            .map_err(|source| RpcClientError::Marshal { field: "envelope", source })
    }
}

/// Builds request envelopes for commands known to a registry.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    registry: Arc<CommandRegistry>,
}

impl RequestBuilder {
    /// Create a builder over a frozen registry.
    pub fn new(registry: Arc<CommandRegistry>) -> Self { Self { registry } }

    /// The registry consulted for method names and conventions.
    pub fn registry(&self) -> &CommandRegistry { &self.registry }

    /// Build the envelope for `command` under `id`.
    ///
    /// # Errors
    /// - [`RpcClientError::InvalidId`] if `id` is not a number, string or null
    /// - [`RpcClientError::Registry`] if the command type is unregistered
    /// - [`RpcClientError::Marshal`] if a field fails to serialize
    pub fn build<C: Command>(
        &self,
        id: impl Into<Value>,
        command: &C,
    ) -> Result<Request, RpcClientError> {
        let id = validate_id(id.into())?;
        let entry = self.registry.lookup(command)?;
        let params = match entry.convention {
            ParamConvention::Positional => positional_params(command.fields())?,
            ParamConvention::Named => named_params(command.fields())?,
        };
        Ok(Request { jsonrpc: JSONRPC_VERSION, method: entry.method, params, id })
    }

    /// Build and serialize the envelope in one step.
    pub fn marshal<C: Command>(
        &self,
        id: impl Into<Value>,
        command: &C,
    ) -> Result<Vec<u8>, RpcClientError> {
        self.build(id, command)?.to_bytes()
    }
}

fn positional_params(fields: Vec<Field>) -> Result<Value, RpcClientError> {
    let mut params = Vec::with_capacity(fields.len());
    for field in fields {
        let name = field.name();
        // An unset optional ends the list; later fields are dropped.
        let Some(value) = field.into_value() else { break };
        params.push(value.map_err(|source| RpcClientError::Marshal { field: name, source })?);
    }
    Ok(Value::Array(params))
}

fn named_params(fields: Vec<Field>) -> Result<Value, RpcClientError> {
    let mut params = Map::with_capacity(fields.len());
    for field in fields {
        let name = field.name();
        if let Some(value) = field.into_value() {
            let value = value.map_err(|source| RpcClientError::Marshal { field: name, source })?;
            params.insert(name.to_string(), value);
        }
    }
    Ok(Value::Object(params))
}
