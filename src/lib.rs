// SPDX-License-Identifier: CC0-1.0

//! swaprpc umbrella crate.
//!
//! Re-exports the public surface of the workspace member crates so that a
//! swap tool can depend on a single crate. The HTTP backend, configuration
//! and logging crates are kept out of the umbrella; binaries pull them in
//! directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(deprecated_in_future)]
#![doc(test(attr(warn(unused))))]

pub use adapters::{ElectrumClient, WalletBackend};
pub use jsonrpc::{Dispatcher, ErrorKind, Pending, Promise, RpcClientError};
pub use registry::{CommandRegistry, ParamConvention, RegistryBuilder};
pub use transport::{DynTransport, RpcError, Transport, TransportError};
pub use types::{FundedTransaction, ProtocolRevision, UnspentOutput};

/// Miscellaneous metadata about the swaprpc workspace.
pub mod swaprpc_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
