//! Result decoders for the Electrum command family.
//!
//! Every decoder is all-or-nothing: a list with one bad element is rejected
//! as a whole and the error names the element.

use std::str::FromStr;

use bitcoin::address::NetworkUnchecked;
use bitcoin::hex::FromHex;
use bitcoin::{Address, Amount, Denomination, Network, OutPoint, PrivateKey, Transaction, Txid};
use jsonrpc::DecodeError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;
use types::{FundedTransaction, UnspentOutput};

/// Prefix some wallet versions put in front of exported keys.
pub const P2PKH_PREFIX: &str = "p2pkh:";

fn parse<T: DeserializeOwned>(raw: &RawValue, expected: &'static str) -> Result<T, DecodeError> {
    serde_json::from_str(raw.get()).map_err(|source| DecodeError::Json {
        expected,
        payload: raw.get().to_string(),
        source,
    })
}

fn parse_address(text: &str, network: Network) -> Result<Address, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidAddress { address: text.to_string(), reason };
    Address::<NetworkUnchecked>::from_str(text)
        .map_err(|e| invalid(e.to_string()))?
        .require_network(network)
        .map_err(|e| invalid(e.to_string()))
}

/// A bare address string, checked against `network`.
pub fn address(raw: &RawValue, network: Network) -> Result<Address, DecodeError> {
    let text: String = parse(raw, "address string")?;
    parse_address(&text, network)
}

/// A WIF key, with or without the [`P2PKH_PREFIX`].
///
/// Current servers answer a one-element list; the first key is taken.
pub fn private_key(raw: &RawValue) -> Result<PrivateKey, DecodeError> {
    let text = match parse::<Value>(raw, "private key")? {
        Value::String(text) => text,
        Value::Array(keys) => match keys.into_iter().next() {
            Some(Value::String(text)) => text,
            _ => {
                return Err(DecodeError::InvalidShape {
                    expected: "non-empty list of key strings",
                    payload: raw.get().to_string(),
                })
            }
        },
        _ => {
            return Err(DecodeError::InvalidShape {
                expected: "key string",
                payload: raw.get().to_string(),
            })
        }
    };
    let wif = text.strip_prefix(P2PKH_PREFIX).unwrap_or(&text);
    PrivateKey::from_wif(wif).map_err(|e| DecodeError::InvalidPrivateKey(e.to_string()))
}

/// An integer fee rate in satoshis per kilobyte.
pub fn fee_rate(raw: &RawValue) -> Result<Amount, DecodeError> {
    parse::<u64>(raw, "integer fee rate").map(Amount::from_sat)
}

#[derive(Deserialize)]
struct PayToResult {
    #[serde(default)]
    complete: bool,
    hex: String,
}

/// The `{complete, final, hex}` object returned by `payto`.
pub fn funded_transaction(raw: &RawValue) -> Result<FundedTransaction, DecodeError> {
    let result: PayToResult = parse(raw, "payto result")?;
    Ok(FundedTransaction { tx: transaction_from_hex(&result.hex)?, complete: result.complete })
}

/// Deserialize a consensus-encoded transaction from hex.
pub fn transaction_from_hex(hex: &str) -> Result<Transaction, DecodeError> {
    let bytes = Vec::<u8>::from_hex(hex)
        .map_err(|e| DecodeError::MalformedTransactionHex(e.to_string()))?;
    bitcoin::consensus::deserialize(&bytes)
        .map_err(|e| DecodeError::MalformedTransactionHex(e.to_string()))
}

#[derive(Deserialize)]
struct UnspentEntry {
    address: String,
    value: String,
    prevout_n: u32,
    prevout_hash: String,
    height: i64,
    // Checked for type only; outputs do not expose it.
    #[allow(dead_code)]
    coinbase: bool,
}

impl UnspentEntry {
    fn into_output(self, network: Network) -> Result<UnspentOutput, DecodeError> {
        let value = Amount::from_str_in(&self.value, Denomination::Bitcoin).map_err(|e| {
            DecodeError::InvalidAmount { field: "value", value: self.value.clone(), reason: e.to_string() }
        })?;
        let txid = Txid::from_str(&self.prevout_hash).map_err(|e| DecodeError::InvalidHash {
            field: "prevout_hash",
            value: self.prevout_hash.clone(),
            reason: e.to_string(),
        })?;
        Ok(UnspentOutput {
            address: parse_address(&self.address, network)?,
            value,
            outpoint: OutPoint::new(txid, self.prevout_n),
            height: self.height,
        })
    }
}

/// The `listunspent` array.
pub fn unspent_outputs(raw: &RawValue, network: Network) -> Result<Vec<UnspentOutput>, DecodeError> {
    let entries: Vec<Value> = parse(raw, "unspent output list")?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let at = |source: DecodeError| DecodeError::Entry { index, source: Box::new(source) };
            let payload = entry.to_string();
            let entry: UnspentEntry = serde_json::from_value(entry).map_err(|source| {
                at(DecodeError::Json { expected: "unspent output", payload, source })
            })?;
            entry.into_output(network).map_err(at)
        })
        .collect()
}

/// The `[success, txid]` pair returned by `broadcast`.
pub fn broadcast(raw: &RawValue) -> Result<Txid, DecodeError> {
    let shape = || DecodeError::InvalidShape {
        expected: "[success, txid]",
        payload: raw.get().to_string(),
    };
    let reply: Vec<Value> = parse(raw, "broadcast result")?;
    let Some(Value::String(txid)) = reply.get(1) else { return Err(shape()) };
    Txid::from_str(txid).map_err(|e| DecodeError::InvalidHash {
        field: "txid",
        value: txid.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use bitcoin::secp256k1::SecretKey;
    use bitcoin::{absolute, transaction, ScriptBuf, Sequence, TxIn, TxOut, Witness};
    use serde_json::json;

    use super::*;

    const ADDRESS: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
    const TXID: &str = "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16";

    fn raw(value: Value) -> Box<RawValue> {
        RawValue::from_string(value.to_string()).expect("valid json")
    }

    fn wif() -> String {
        let secret = SecretKey::from_slice(&[0x11; 32]).expect("valid secret");
        PrivateKey::new(secret, Network::Bitcoin).to_wif()
    }

    fn sample_tx() -> Transaction {
        let dest = parse_address(ADDRESS, Network::Bitcoin).expect("valid");
        Transaction {
            version: transaction::Version::TWO,
            lock_time: absolute::LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::new(Txid::from_str(TXID).expect("txid"), 1),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: vec![TxOut { value: Amount::from_sat(50_000), script_pubkey: dest.script_pubkey() }],
        }
    }

    fn unspent(address: &str, value: &str, hash: &str) -> Value {
        json!({
            "address": address,
            "value": value,
            "prevout_n": 0,
            "prevout_hash": hash,
            "height": 100,
            "coinbase": false
        })
    }

    #[test]
    fn test_address_checks_network() {
        let addr = address(&raw(json!(ADDRESS)), Network::Bitcoin).expect("mainnet");
        assert_eq!(addr.to_string(), ADDRESS);

        let err = address(&raw(json!(ADDRESS)), Network::Testnet).expect_err("wrong net");
        assert!(matches!(err, DecodeError::InvalidAddress { .. }));
        let err = address(&raw(json!(42)), Network::Bitcoin).expect_err("not a string");
        assert!(matches!(err, DecodeError::Json { .. }));
    }

    #[test]
    fn test_private_key_prefix_is_optional() {
        let wif = wif();
        let bare = private_key(&raw(json!(wif))).expect("bare");
        let prefixed = private_key(&raw(json!(format!("p2pkh:{wif}")))).expect("prefixed");
        let listed = private_key(&raw(json!([format!("p2pkh:{wif}")]))).expect("listed");
        assert_eq!(bare, prefixed);
        assert_eq!(bare, listed);
        assert_eq!(bare.to_wif(), wif);
    }

    #[test]
    fn test_private_key_rejects_garbage() {
        let err = private_key(&raw(json!("p2pkh:notakey"))).expect_err("bad wif");
        assert!(matches!(err, DecodeError::InvalidPrivateKey(_)));
        let err = private_key(&raw(json!([]))).expect_err("empty list");
        assert!(matches!(err, DecodeError::InvalidShape { .. }));
    }

    #[test]
    fn test_fee_rate_is_integer_satoshis() {
        assert_eq!(fee_rate(&raw(json!(1500))).expect("rate"), Amount::from_sat(1500));
        assert!(fee_rate(&raw(json!("1500"))).is_err());
    }

    #[test]
    fn test_funded_transaction_round_trips() {
        let tx = sample_tx();
        let hex = bitcoin::consensus::encode::serialize_hex(&tx);
        let funded =
            funded_transaction(&raw(json!({"complete": false, "final": false, "hex": hex})))
                .expect("decodes");
        assert_eq!(funded.tx, tx);
        assert!(!funded.complete);
        assert_eq!(bitcoin::consensus::encode::serialize_hex(&funded.tx), hex);
    }

    #[test]
    fn test_funded_transaction_bad_hex() {
        for hex in ["zz", "0200", "abc"] {
            let err = funded_transaction(&raw(json!({"complete": true, "hex": hex})))
                .expect_err("malformed");
            assert!(matches!(err, DecodeError::MalformedTransactionHex(_)), "{hex}");
        }
    }

    #[test]
    fn test_unspent_outputs() {
        let list = json!([unspent(ADDRESS, "0.0005", TXID), unspent(ADDRESS, "1.25", TXID)]);
        let outputs = unspent_outputs(&raw(list), Network::Bitcoin).expect("decodes");
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].value, Amount::from_sat(50_000));
        assert_eq!(outputs[1].value, Amount::from_sat(125_000_000));
        assert_eq!(outputs[0].outpoint.txid.to_string(), TXID);
        assert!(outputs[0].is_confirmed());
    }

    #[test]
    fn test_unspent_outputs_reject_the_whole_list() {
        let mut list: Vec<Value> = (0..5).map(|_| unspent(ADDRESS, "0.1", TXID)).collect();
        list[3] = unspent(ADDRESS, "lots", TXID);
        let err = unspent_outputs(&raw(Value::Array(list)), Network::Bitcoin).expect_err("bad");
        match err {
            DecodeError::Entry { index, source } => {
                assert_eq!(index, 3);
                assert!(matches!(*source, DecodeError::InvalidAmount { field: "value", .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let list = json!([unspent(ADDRESS, "0.1", "nothex")]);
        let err = unspent_outputs(&raw(list), Network::Bitcoin).expect_err("bad hash");
        assert!(err.to_string().starts_with("entry 0: invalid hash"));
    }

    #[test]
    fn test_unspent_outputs_check_coinbase_flag() {
        let mut list: Vec<Value> = (0..2).map(|_| unspent(ADDRESS, "0.1", TXID)).collect();
        list[1]["coinbase"] = json!("x");
        let err = unspent_outputs(&raw(Value::Array(list)), Network::Bitcoin).expect_err("bad flag");
        match err {
            DecodeError::Entry { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, DecodeError::Json { expected: "unspent output", .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_broadcast_shapes() {
        let txid = broadcast(&raw(json!([true, TXID]))).expect("decodes");
        assert_eq!(txid.to_string(), TXID);

        for payload in [json!([true]), json!([true, 5]), json!([])] {
            let err = broadcast(&raw(payload.clone())).expect_err("bad shape");
            match err {
                DecodeError::InvalidShape { payload: text, .. } => {
                    assert_eq!(text, payload.to_string())
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert!(matches!(
            broadcast(&raw(json!("txid"))).expect_err("not a list"),
            DecodeError::Json { .. }
        ));
    }
}
