#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Domain Types for Wallet RPC
//!
//! This crate defines the values produced by the wallet command decoders that
//! are not already provided by the `bitcoin` crate, plus the protocol
//! revision selector shared by configuration and the command families.
//! Addresses, amounts, transactions, outpoints and txids are used directly
//! from `bitcoin`.

/// Wallet protocol revisions and their selection.
pub mod revision;
/// Decoded wallet results: unspent outputs and funded transactions.
pub mod wallet;

pub use revision::{ProtocolRevision, RevisionError};
pub use wallet::{FundedTransaction, UnspentOutput};
