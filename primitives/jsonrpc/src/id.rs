//! Request id validation.
//!
//! JSON-RPC 1.0 allows any JSON value as an id, but bitcoind and Electrum
//! follow the 2.0 rule for responses, which only echoes numbers, strings and
//! null. Anything else is rejected before a request is built.

use serde_json::Value;

use crate::error::RpcClientError;

/// Whether `id` may be used as a request id.
pub fn is_valid_id(id: &Value) -> bool {
    matches!(id, Value::Null | Value::Number(_) | Value::String(_))
}

/// Accept `id` unchanged, or reject it with [`RpcClientError::InvalidId`]
/// naming its JSON type.
pub fn validate_id(id: Value) -> Result<Value, RpcClientError> {
    match id {
        Value::Bool(_) => Err(RpcClientError::InvalidId("bool")),
        Value::Array(_) => Err(RpcClientError::InvalidId("array")),
        Value::Object(_) => Err(RpcClientError::InvalidId("object")),
        valid => Ok(valid),
    }
}
