//! Decoded wallet results.

use bitcoin::{Address, Amount, OutPoint, Transaction};

/// A spendable output owned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnspentOutput {
    /// Address the output pays to.
    pub address: Address,
    /// Output value.
    pub value: Amount,
    /// Reference to the output: funding txid and output index.
    pub outpoint: OutPoint,
    /// Height of the block that confirmed the funding transaction.
    ///
    /// Wallets report `0` (or a negative value) for unconfirmed outputs.
    pub height: i64,
}

/// A transaction built and funded by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundedTransaction {
    /// The funded transaction.
    pub tx: Transaction,
    /// Whether every input is signed.
    pub complete: bool,
}

impl UnspentOutput {
    /// Whether the funding transaction has been mined.
    pub fn is_confirmed(&self) -> bool { self.height > 0 }
}
