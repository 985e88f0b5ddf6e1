//! Electrum wallet command values.
//!
//! Each type is a plain value carrying the parameters of one wallet method.
//! Method names and conventions are attached in [`super::registry`].

use bitcoin::consensus::encode::serialize_hex;
use bitcoin::{Address, Amount, Denomination, Transaction};
use registry::{Command, Field};

/// `getunusedaddress`: an address the wallet has not handed out yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetUnusedAddressCmd;

impl Command for GetUnusedAddressCmd {
    fn fields(&self) -> Vec<Field> { Vec::new() }
}

/// `getprivatekeys` as legacy servers take it: one comma-joined string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPrivateKeysCmd {
    /// Comma-separated wallet addresses.
    pub addresses: String,
}

impl GetPrivateKeysCmd {
    /// Join `addresses` into the single string legacy servers expect.
    pub fn new<A: AsRef<str>>(addresses: &[A]) -> Self {
        let addresses =
            addresses.iter().map(|a| a.as_ref()).collect::<Vec<_>>().join(",");
        Self { addresses }
    }
}

impl Command for GetPrivateKeysCmd {
    fn fields(&self) -> Vec<Field> { vec![Field::required("addresses", &self.addresses)] }
}

/// `getprivatekeys` as current servers take it: a list of addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPrivateKeysListCmd {
    /// Wallet addresses.
    pub addresses: Vec<String>,
}

impl GetPrivateKeysListCmd {
    /// Command for the given addresses.
    pub fn new<A: AsRef<str>>(addresses: &[A]) -> Self {
        Self { addresses: addresses.iter().map(|a| a.as_ref().to_string()).collect() }
    }
}

impl Command for GetPrivateKeysListCmd {
    fn fields(&self) -> Vec<Field> { vec![Field::required("addresses", &self.addresses)] }
}

/// `getfeerate`: the wallet's current fee rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetFeeRateCmd;

impl Command for GetFeeRateCmd {
    fn fields(&self) -> Vec<Field> { Vec::new() }
}

/// `payto`: build and fund a transaction paying `amount` to `destination`.
///
/// Sent with named parameters. The amount travels as a BTC decimal string so
/// no precision is lost on the way to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayToCmd {
    /// Destination address.
    pub destination: String,
    /// Amount in BTC, as a decimal string.
    pub amount: String,
    /// Ask the wallet not to sign.
    pub unsigned: bool,
}

impl PayToCmd {
    /// Command paying `amount` to `destination`.
    pub fn new(destination: &Address, amount: Amount, unsigned: bool) -> Self {
        Self {
            destination: destination.to_string(),
            amount: amount.to_string_in(Denomination::Bitcoin),
            unsigned,
        }
    }
}

impl Command for PayToCmd {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::required("destination", &self.destination),
            Field::required("amount", &self.amount),
            Field::required("unsigned", &self.unsigned),
        ]
    }
}

/// `listunspent`: every spendable output of the wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListUnspentCmd;

impl Command for ListUnspentCmd {
    fn fields(&self) -> Vec<Field> { Vec::new() }
}

/// `broadcast`: relay a serialized transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastCmd {
    /// Consensus-serialized transaction, hex encoded.
    pub tx: String,
}

impl BroadcastCmd {
    /// Command relaying `tx`.
    pub fn new(tx: &Transaction) -> Self { Self { tx: serialize_hex(tx) } }
}

impl Command for BroadcastCmd {
    fn fields(&self) -> Vec<Field> { vec![Field::required("tx", &self.tx)] }
}

#[cfg(test)]
mod tests {
    use bitcoin::address::NetworkUnchecked;
    use serde_json::json;

    use super::*;

    fn values(command: &impl Command) -> Vec<serde_json::Value> {
        command
            .fields()
            .into_iter()
            .map(|f| f.into_value().expect("set").expect("serializes"))
            .collect()
    }

    #[test]
    fn test_legacy_private_keys_are_comma_joined() {
        let cmd = GetPrivateKeysCmd::new(&["1abc", "1def"]);
        assert_eq!(cmd.addresses, "1abc,1def");
        assert_eq!(values(&cmd), vec![json!("1abc,1def")]);
    }

    #[test]
    fn test_current_private_keys_are_a_list() {
        let cmd = GetPrivateKeysListCmd::new(&["1abc", "1def"]);
        assert_eq!(values(&cmd), vec![json!(["1abc", "1def"])]);
    }

    #[test]
    fn test_pay_to_amount_is_exact_decimal() {
        let dest = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"
            .parse::<Address<NetworkUnchecked>>()
            .expect("valid")
            .assume_checked();
        let cmd = PayToCmd::new(&dest, Amount::from_sat(1_000_000), true);
        assert_eq!(cmd.amount, "0.01");
        let names: Vec<_> = cmd.fields().iter().map(Field::name).collect();
        assert_eq!(names, ["destination", "amount", "unsigned"]);
        assert_eq!(
            values(&cmd),
            vec![json!("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"), json!("0.01"), json!(true)]
        );
    }

    #[test]
    fn test_parameterless_commands() {
        assert!(GetUnusedAddressCmd.fields().is_empty());
        assert!(GetFeeRateCmd.fields().is_empty());
        assert!(ListUnspentCmd.fields().is_empty());
    }
}
