//! Error taxonomy for typed wallet calls.
//!
//! A call can fail in five distinct ways and callers are expected to branch
//! on which one happened: see [`ErrorKind`].

use registry::RegistryError;
use thiserror::Error;
use transport::{RpcError, TransportError};

use crate::promise::Failure;

/// The broad class of a [`RpcClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raised before anything was sent: bad id, unregistered command,
    /// marshal failure, no runtime.
    Construction,
    /// The transport could not deliver the request or its response.
    Transport,
    /// The backend answered with an error object.
    Protocol,
    /// The backend answered with a payload the decoder does not understand.
    Decode,
    /// The operation is known to be unsupported by this backend.
    CapabilityGap,
}

/// Errors returned by typed wallet calls.
#[derive(Debug, Error)]
pub enum RpcClientError {
    /// The request id is not a number, string or null.
    #[error("the id of type '{0}' is invalid")]
    InvalidId(&'static str),

    /// The registry rejected a registration or has no entry for the command.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A command field could not be serialized.
    #[error("failed to marshal field '{field}': {source}")]
    Marshal {
        /// Name of the offending field.
        field: &'static str,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// No async runtime was available to run the transport.
    #[error("no tokio runtime available to dispatch requests")]
    NoRuntime,

    /// Passed through unchanged from the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend reported a failure.
    #[error("RPC error {0}")]
    Rpc(#[from] RpcError),

    /// The response payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The operation is not supported by this backend family.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl RpcClientError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcClientError::InvalidId(_)
            | RpcClientError::Registry(_)
            | RpcClientError::Marshal { .. }
            | RpcClientError::NoRuntime => ErrorKind::Construction,
            RpcClientError::Transport(_) => ErrorKind::Transport,
            RpcClientError::Rpc(_) => ErrorKind::Protocol,
            RpcClientError::Decode(_) => ErrorKind::Decode,
            RpcClientError::NotImplemented(_) => ErrorKind::CapabilityGap,
        }
    }

    /// The backend error, if this is a protocol failure.
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            RpcClientError::Rpc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Failure> for RpcClientError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Transport(err) => RpcClientError::Transport(err),
            Failure::Rpc(err) => RpcClientError::Rpc(err),
        }
    }
}

/// A response payload that does not match what the command's decoder
/// expects.
///
/// Every variant carries the offending field or the raw payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not JSON of the expected shape.
    #[error("cannot decode {expected}: {source} (payload: {payload})")]
    Json {
        /// What the decoder was looking for.
        expected: &'static str,
        /// The raw payload text.
        payload: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The payload has the right JSON type but the wrong structure.
    #[error("invalid response shape, expected {expected}: {payload}")]
    InvalidShape {
        /// Description of the expected structure.
        expected: &'static str,
        /// The raw payload text.
        payload: String,
    },

    /// An address failed to parse or belongs to another network.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The address text as received.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A private key failed WIF decoding. The key text is not echoed.
    #[error("invalid WIF private key: {0}")]
    InvalidPrivateKey(String),

    /// A decimal amount failed to parse.
    #[error("invalid amount '{value}' in field '{field}': {reason}")]
    InvalidAmount {
        /// Field the amount came from.
        field: &'static str,
        /// The amount text as received.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A transaction hash failed to parse.
    #[error("invalid hash '{value}' in field '{field}': {reason}")]
    InvalidHash {
        /// Field the hash came from.
        field: &'static str,
        /// The hash text as received.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The transaction hex could not be decoded or deserialized.
    #[error("malformed transaction hex: {0}")]
    MalformedTransactionHex(String),

    /// One element of a list failed; the whole list is rejected.
    #[error("entry {index}: {source}")]
    Entry {
        /// Zero-based position of the failing element.
        index: usize,
        /// What went wrong with it.
        #[source]
        source: Box<DecodeError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(RpcClientError::InvalidId("bool").kind(), ErrorKind::Construction);
        assert_eq!(RpcClientError::NoRuntime.kind(), ErrorKind::Construction);
        assert_eq!(
            RpcClientError::Registry(RegistryError::Unregistered("Foo")).kind(),
            ErrorKind::Construction
        );
        assert_eq!(RpcClientError::from(TransportError::Closed).kind(), ErrorKind::Transport);
        assert_eq!(RpcClientError::from(RpcError::new(-4, "boom")).kind(), ErrorKind::Protocol);
        assert_eq!(
            RpcClientError::from(DecodeError::MalformedTransactionHex("odd".into())).kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            RpcClientError::NotImplemented("sign_raw_transaction").kind(),
            ErrorKind::CapabilityGap
        );
    }

    #[test]
    fn test_rpc_error_is_kept_structured() {
        let err = RpcClientError::from(Failure::Rpc(RpcError::new(-5, "Invalid address")));
        let rpc = err.rpc_error().expect("protocol error");
        assert_eq!(rpc.code.0, -5);
        assert_eq!(rpc.message, "Invalid address");
        assert_eq!(err.to_string(), "RPC error -5: Invalid address");
    }

    #[test]
    fn test_duplicate_registration_message() {
        let err = RpcClientError::from(RegistryError::DuplicateMethod {
            method: "getfeerate",
            existing: "GetFeeRateCmd",
        });
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert_eq!(
            err.to_string(),
            "registry error: method 'getfeerate' is already registered to GetFeeRateCmd"
        );
    }

    #[test]
    fn test_entry_error_names_index() {
        let err = DecodeError::Entry {
            index: 2,
            source: Box::new(DecodeError::InvalidAmount {
                field: "value",
                value: "abc".into(),
                reason: "invalid digit".into(),
            }),
        };
        assert_eq!(err.to_string(), "entry 2: invalid amount 'abc' in field 'value': invalid digit");
    }
}
