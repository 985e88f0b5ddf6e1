//! Typed client for an Electrum wallet daemon.

use std::sync::Arc;

use bitcoin::{Address, Amount, Network, PrivateKey, Transaction, Txid};
use jsonrpc::{Dispatcher, Pending, RpcClientError};
use transport::DynTransport;
use types::{FundedTransaction, ProtocolRevision, UnspentOutput};

use super::commands::{
    BroadcastCmd, GetFeeRateCmd, GetPrivateKeysCmd, GetPrivateKeysListCmd, GetUnusedAddressCmd,
    ListUnspentCmd, PayToCmd,
};
use super::decode;

/// Electrum wallet client.
///
/// Every command comes in two forms: `*_async` dispatches and hands back a
/// [`Pending`] result, the plain form awaits it. Addresses are decoded for
/// the configured network.
///
/// ## Usage
/// ```no_run
/// # async fn demo(transport: transport::DynTransport) -> Result<(), jsonrpc::RpcClientError> {
/// use adapters::ElectrumClient;
/// use bitcoin::Network;
/// use types::ProtocolRevision;
///
/// let client = ElectrumClient::new(transport, Network::Bitcoin, ProtocolRevision::Legacy)?;
/// let fee = client.get_fee_rate_async()?;
/// let address = client.get_unused_address().await?;
/// println!("{address} at {}", fee.receive().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ElectrumClient {
    dispatcher: Dispatcher,
    network: Network,
    revision: ProtocolRevision,
}

impl ElectrumClient {
    /// Create a client over `transport` on the current tokio runtime.
    pub fn new(
        transport: DynTransport,
        network: Network,
        revision: ProtocolRevision,
    ) -> Result<Self, RpcClientError> {
        let registry = super::registry(revision)?;
        let dispatcher = Dispatcher::new(Arc::new(registry), transport)?;
        Ok(Self { dispatcher, network, revision })
    }

    /// Network addresses are checked against.
    pub fn network(&self) -> Network { self.network }

    /// Protocol revision the server speaks.
    pub fn revision(&self) -> ProtocolRevision { self.revision }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher { &self.dispatcher }

    /// Dispatch `getunusedaddress`.
    pub fn get_unused_address_async(&self) -> Result<Pending<Address>, RpcClientError> {
        let network = self.network;
        self.dispatcher.call(&GetUnusedAddressCmd, move |raw| decode::address(raw, network))
    }

    /// An address the wallet has not handed out yet.
    pub async fn get_unused_address(&self) -> Result<Address, RpcClientError> {
        self.get_unused_address_async()?.receive().await
    }

    /// Dispatch `getprivatekeys` for a single address, in the form the
    /// server's revision expects.
    pub fn dump_priv_key_async(
        &self,
        address: &Address,
    ) -> Result<Pending<PrivateKey>, RpcClientError> {
        let addresses = [address.to_string()];
        match self.revision {
            ProtocolRevision::Legacy => {
                self.dispatcher.call(&GetPrivateKeysCmd::new(&addresses), decode::private_key)
            }
            ProtocolRevision::Current => {
                self.dispatcher.call(&GetPrivateKeysListCmd::new(&addresses), decode::private_key)
            }
        }
    }

    /// The private key controlling `address`.
    pub async fn dump_priv_key(&self, address: &Address) -> Result<PrivateKey, RpcClientError> {
        self.dump_priv_key_async(address)?.receive().await
    }

    /// Dispatch `getfeerate`.
    pub fn get_fee_rate_async(&self) -> Result<Pending<Amount>, RpcClientError> {
        self.dispatcher.call(&GetFeeRateCmd, decode::fee_rate)
    }

    /// The wallet's fee rate per kilobyte.
    pub async fn get_fee_rate(&self) -> Result<Amount, RpcClientError> {
        self.get_fee_rate_async()?.receive().await
    }

    /// Dispatch `payto`.
    pub fn pay_to_async(
        &self,
        destination: &Address,
        amount: Amount,
        unsigned: bool,
    ) -> Result<Pending<FundedTransaction>, RpcClientError> {
        self.dispatcher
            .call(&PayToCmd::new(destination, amount, unsigned), decode::funded_transaction)
    }

    /// Build and fund a transaction paying `amount` to `destination`,
    /// leaving it unsigned if asked.
    pub async fn pay_to(
        &self,
        destination: &Address,
        amount: Amount,
        unsigned: bool,
    ) -> Result<FundedTransaction, RpcClientError> {
        self.pay_to_async(destination, amount, unsigned)?.receive().await
    }

    /// Dispatch `listunspent`.
    pub fn list_unspent_async(&self) -> Result<Pending<Vec<UnspentOutput>>, RpcClientError> {
        let network = self.network;
        self.dispatcher.call(&ListUnspentCmd, move |raw| decode::unspent_outputs(raw, network))
    }

    /// Every spendable output of the wallet.
    pub async fn list_unspent(&self) -> Result<Vec<UnspentOutput>, RpcClientError> {
        self.list_unspent_async()?.receive().await
    }

    /// Dispatch `broadcast`.
    pub fn broadcast_async(&self, tx: &Transaction) -> Result<Pending<Txid>, RpcClientError> {
        self.dispatcher.call(&BroadcastCmd::new(tx), decode::broadcast)
    }

    /// Relay `tx` and return its txid as reported by the server.
    pub async fn broadcast(&self, tx: &Transaction) -> Result<Txid, RpcClientError> {
        self.broadcast_async(tx)?.receive().await
    }
}
