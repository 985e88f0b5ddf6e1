//! Electrum client behaviour against a scripted wallet.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use adapters::{ElectrumClient, WalletBackend};
use bitcoin::address::NetworkUnchecked;
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::secp256k1::SecretKey;
use bitcoin::{
    absolute, transaction, Address, Amount, Network, OutPoint, PrivateKey, ScriptBuf, Sequence,
    Transaction, TxIn, TxOut, Txid, Witness,
};
use jsonrpc::ErrorKind;
use serde_json::{json, Value};
use transport::{Transport, TransportError};
use types::ProtocolRevision;

const ADDRESS: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
const TXID: &str = "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16";

/// Answers each method with a canned `result`, or an error object when the
/// canned value is `{"error": ...}`.
#[derive(Default)]
struct ScriptedWallet {
    replies: HashMap<&'static str, Value>,
    requests: Mutex<Vec<Value>>,
    calls: AtomicUsize,
}

impl ScriptedWallet {
    fn with(mut self, method: &'static str, reply: Value) -> Self {
        self.replies.insert(method, reply);
        self
    }

    fn sent(&self) -> Vec<Value> { self.requests.lock().expect("lock").clone() }
}

#[async_trait::async_trait]
impl Transport for ScriptedWallet {
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request: Value = serde_json::from_slice(&request)?;
        self.requests.lock().expect("lock").push(request.clone());
        let method = request["method"].as_str().unwrap_or_default();
        let response = match self.replies.get(method) {
            Some(Value::Object(obj)) if obj.contains_key("error") => {
                json!({"result": null, "error": obj["error"], "id": request["id"]})
            }
            Some(result) => json!({"result": result, "error": null, "id": request["id"]}),
            None => return Err(TransportError::Http(format!("no reply for {method}"))),
        };
        Ok(serde_json::to_vec(&response)?)
    }

    fn endpoint(&self) -> &str { "scripted://electrum" }
}

fn address() -> Address {
    ADDRESS.parse::<Address<NetworkUnchecked>>().expect("valid").assume_checked()
}

fn wif() -> String {
    let secret = SecretKey::from_slice(&[0x11; 32]).expect("valid secret");
    PrivateKey::new(secret, Network::Bitcoin).to_wif()
}

fn sample_tx() -> Transaction {
    Transaction {
        version: transaction::Version::TWO,
        lock_time: absolute::LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::new(Txid::from_str(TXID).expect("txid"), 0),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::new(),
        }],
        output: vec![TxOut { value: Amount::from_sat(1_000_000), script_pubkey: address().script_pubkey() }],
    }
}

fn client(wallet: Arc<ScriptedWallet>, revision: ProtocolRevision) -> ElectrumClient {
    ElectrumClient::new(wallet, Network::Bitcoin, revision).expect("client")
}

#[tokio::test]
async fn get_unused_address_decodes_for_network() {
    let wallet = Arc::new(ScriptedWallet::default().with("getunusedaddress", json!(ADDRESS)));
    let client = client(Arc::clone(&wallet), ProtocolRevision::Legacy);

    assert_eq!(client.get_unused_address().await.expect("address"), address());
    let sent = wallet.sent();
    assert_eq!(sent[0]["method"], "getunusedaddress");
    assert_eq!(sent[0]["params"], json!([]));
}

#[tokio::test]
async fn dump_priv_key_follows_revision() {
    let wif = wif();
    for (revision, reply, params) in [
        (ProtocolRevision::Legacy, json!(wif), json!([ADDRESS])),
        (ProtocolRevision::Current, json!([format!("p2pkh:{wif}")]), json!([[ADDRESS]])),
    ] {
        let wallet = Arc::new(ScriptedWallet::default().with("getprivatekeys", reply));
        let client = client(Arc::clone(&wallet), revision);
        let key = client.dump_priv_key(&address()).await.expect("key");
        assert_eq!(key.to_wif(), wif);
        assert_eq!(wallet.sent()[0]["params"], params, "{revision}");
    }
}

#[tokio::test]
async fn async_and_plain_forms_agree() {
    let wallet = Arc::new(ScriptedWallet::default().with("getfeerate", json!(2000)));
    let client = client(Arc::clone(&wallet), ProtocolRevision::Legacy);

    let pending = client.get_fee_rate_async().expect("dispatched");
    let direct = client.get_fee_rate().await.expect("rate");
    assert_eq!(pending.receive().await.expect("rate"), direct);
    assert_eq!(direct, Amount::from_sat(2000));
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn pay_to_sends_named_params_and_round_trips_hex() {
    let tx = sample_tx();
    let hex = serialize_hex(&tx);
    let wallet = Arc::new(
        ScriptedWallet::default()
            .with("payto", json!({"complete": false, "final": false, "hex": hex})),
    );
    let client = client(Arc::clone(&wallet), ProtocolRevision::Legacy);

    let funded = client.pay_to(&address(), Amount::from_sat(1_000_000), true).await.expect("funded");
    assert_eq!(funded.tx, tx);
    assert!(!funded.complete);
    assert_eq!(serialize_hex(&funded.tx), hex);
    assert_eq!(
        wallet.sent()[0]["params"],
        json!({"destination": ADDRESS, "amount": "0.01", "unsigned": true})
    );
}

#[tokio::test]
async fn list_unspent_is_atomic() {
    let entry = |value: &str| {
        json!({"address": ADDRESS, "value": value, "prevout_n": 1, "prevout_hash": TXID, "height": 0, "coinbase": false})
    };
    let wallet = Arc::new(
        ScriptedWallet::default()
            .with("listunspent", json!([entry("0.1"), entry("0.2"), entry("0.3"), entry("x"), entry("0.5")])),
    );
    let client = client(wallet, ProtocolRevision::Legacy);

    let err = client.list_unspent().await.expect_err("bad entry");
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().starts_with("entry 3:"), "{err}");
}

#[tokio::test]
async fn list_unspent_decodes_outputs() {
    let wallet = Arc::new(ScriptedWallet::default().with(
        "listunspent",
        json!([{"address": ADDRESS, "value": "0.01", "prevout_n": 1, "prevout_hash": TXID, "height": 0, "coinbase": false}]),
    ));
    let outputs = client(wallet, ProtocolRevision::Legacy).list_unspent().await.expect("outputs");
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].value, Amount::from_sat(1_000_000));
    assert_eq!(outputs[0].outpoint.vout, 1);
    assert!(!outputs[0].is_confirmed());
}

#[tokio::test]
async fn broadcast_and_send_raw_transaction() {
    let tx = sample_tx();
    let wallet = Arc::new(ScriptedWallet::default().with("broadcast", json!([true, TXID])));
    let client = client(Arc::clone(&wallet), ProtocolRevision::Legacy);

    let txid = client.broadcast(&tx).await.expect("txid");
    assert_eq!(txid.to_string(), TXID);
    let via_backend = WalletBackend::send_raw_transaction(&client, &tx, true).await.expect("txid");
    assert_eq!(via_backend, txid);

    let sent = wallet.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1]["method"], "broadcast");
    assert_eq!(sent[1]["params"], json!([serialize_hex(&tx)]));
}

#[tokio::test]
async fn broadcast_short_reply_is_a_decode_error() {
    let wallet = Arc::new(ScriptedWallet::default().with("broadcast", json!([false])));
    let err = client(wallet, ProtocolRevision::Legacy).broadcast(&sample_tx()).await.expect_err("short");
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("[false]"), "{err}");
}

#[tokio::test]
async fn server_errors_are_protocol_errors() {
    let wallet = Arc::new(ScriptedWallet::default().with(
        "payto",
        json!({"error": {"code": 1, "message": "Insufficient funds"}}),
    ));
    let client = client(wallet, ProtocolRevision::Legacy);
    let err = client.pay_to(&address(), Amount::ONE_BTC, false).await.expect_err("rpc");
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.rpc_error().map(|e| e.message.as_str()), Some("Insufficient funds"));
}

#[tokio::test]
async fn sign_raw_transaction_never_reaches_the_wallet() {
    let wallet = Arc::new(ScriptedWallet::default());
    let client = client(Arc::clone(&wallet), ProtocolRevision::Current);

    let err = client.sign_raw_transaction(&sample_tx()).await.expect_err("unsupported");
    assert_eq!(err.kind(), ErrorKind::CapabilityGap);
    assert_eq!(err.to_string(), "sign_raw_transaction is not implemented");
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn backend_trait_object() {
    let wallet = Arc::new(
        ScriptedWallet::default()
            .with("getunusedaddress", json!(ADDRESS))
            .with("getfeerate", json!(1000)),
    );
    let backend: Box<dyn WalletBackend> = Box::new(client(wallet, ProtocolRevision::Legacy));
    assert_eq!(backend.new_address().await.expect("address"), address());
    assert_eq!(backend.fee_rate().await.expect("rate"), Amount::from_sat(1000));
}
