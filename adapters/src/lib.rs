#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Wallet Backend Adapters
//!
//! This crate maps wallet backend families onto the typed dispatch layer.
//! Each family contributes its command types, registers them with their
//! method names and parameter conventions, and pairs every command with a
//! decoder for its result. [`WalletBackend`] is the family-neutral surface
//! the swap flow is written against.

/// Electrum wallet daemon commands, decoders and client
pub mod electrum;
pub mod wallet_backend;

pub use electrum::ElectrumClient;
pub use wallet_backend::WalletBackend;
