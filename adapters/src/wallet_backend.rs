//! The wallet surface the swap flow is written against.
//!
//! Bitcoin-Core-style callers expect `getnewaddress`, `dumpprivkey`,
//! `sendrawtransaction` and `signrawtransaction`. [`WalletBackend`] names
//! those operations; each backend family maps them onto its own commands or
//! reports a capability gap.

use bitcoin::{Address, Amount, PrivateKey, Transaction, Txid};
use jsonrpc::RpcClientError;
use types::FundedTransaction;

use crate::electrum::ElectrumClient;

/// Wallet operations needed to run an atomic swap.
#[async_trait::async_trait]
pub trait WalletBackend: Send + Sync {
    /// A fresh receiving address.
    async fn new_address(&self) -> Result<Address, RpcClientError>;

    /// The private key controlling `address`.
    async fn dump_priv_key(&self, address: &Address) -> Result<PrivateKey, RpcClientError>;

    /// Fee rate per kilobyte.
    async fn fee_rate(&self) -> Result<Amount, RpcClientError>;

    /// Fund a transaction paying `amount` to `destination` without signing it.
    async fn fund_transaction(
        &self,
        destination: &Address,
        amount: Amount,
    ) -> Result<FundedTransaction, RpcClientError>;

    /// Relay `tx`.
    async fn send_raw_transaction(
        &self,
        tx: &Transaction,
        allow_high_fees: bool,
    ) -> Result<Txid, RpcClientError>;

    /// Sign the wallet's inputs of `tx`.
    async fn sign_raw_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<FundedTransaction, RpcClientError>;
}

#[async_trait::async_trait]
impl WalletBackend for ElectrumClient {
    async fn new_address(&self) -> Result<Address, RpcClientError> {
        self.get_unused_address().await
    }

    async fn dump_priv_key(&self, address: &Address) -> Result<PrivateKey, RpcClientError> {
        ElectrumClient::dump_priv_key(self, address).await
    }

    async fn fee_rate(&self) -> Result<Amount, RpcClientError> { self.get_fee_rate().await }

    async fn fund_transaction(
        &self,
        destination: &Address,
        amount: Amount,
    ) -> Result<FundedTransaction, RpcClientError> {
        self.pay_to(destination, amount, true).await
    }

    /// Forwards to `broadcast`. Electrum applies its own fee policy, so
    /// `allow_high_fees` has no effect.
    async fn send_raw_transaction(
        &self,
        tx: &Transaction,
        allow_high_fees: bool,
    ) -> Result<Txid, RpcClientError> {
        if allow_high_fees {
            tracing::debug!("allow_high_fees ignored by electrum broadcast");
        }
        self.broadcast(tx).await
    }

    /// Electrum has no method for signing a foreign transaction. Fails
    /// without contacting the server.
    async fn sign_raw_transaction(
        &self,
        _tx: &Transaction,
    ) -> Result<FundedTransaction, RpcClientError> {
        Err(RpcClientError::NotImplemented("sign_raw_transaction"))
    }
}
