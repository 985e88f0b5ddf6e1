#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Wallet probe
//!
//! Exercises a wallet daemon end to end: asks for an unused address and the
//! fee rate, funds an unsigned 0.01 BTC payment back to that address and
//! lists the wallet's unspent outputs. Nothing is signed or broadcast.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use adapters::ElectrumClient;
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::{Address, Amount};
use config::{Config, ConfigError};
use http::HttpTransport;
use jsonrpc::RpcClientError;
use logging::LoggingError;
use thiserror::Error;
use transport::TransportError;
use types::{FundedTransaction, ProtocolRevision, RevisionError, UnspentOutput};

/// Amount of the unsigned test payment.
pub const PROBE_AMOUNT: Amount = Amount::from_sat(1_000_000);

/// Errors that end a probe run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Bad command line.
    #[error("{0}")]
    Usage(String),
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Logging could not be installed.
    #[error(transparent)]
    Logging(#[from] LoggingError),
    /// The HTTP transport could not be built.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A wallet call failed.
    #[error(transparent)]
    Rpc(#[from] RpcClientError),
}

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// `--config <path>`; the default path is used when absent.
    pub config: Option<PathBuf>,
    /// `--revision <legacy|current>` overrides the configured revision.
    pub revision: Option<ProtocolRevision>,
    /// `--help` / `-h`.
    pub help: bool,
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse(args: &[String]) -> Result<Self, ProbeError> {
        let mut parsed = Args::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => parsed.help = true,
                "--config" => {
                    let path = iter.next().ok_or_else(|| missing("--config"))?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--revision" => {
                    let name = iter.next().ok_or_else(|| missing("--revision"))?;
                    let revision = name
                        .parse()
                        .map_err(|e: RevisionError| ProbeError::Usage(e.to_string()))?;
                    parsed.revision = Some(revision);
                }
                other => return Err(ProbeError::Usage(format!("unexpected argument '{other}'"))),
            }
        }
        Ok(parsed)
    }

    /// Load the configuration this command line points at.
    ///
    /// An explicit `--config` file must exist; the default file may be
    /// absent, in which case defaults apply.
    pub fn load_config(&self) -> Result<Config, ProbeError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::load_or_default(Config::default_path()?)?,
        };
        if let Some(revision) = self.revision {
            config.wallet.revision = revision;
        }
        Ok(config)
    }
}

fn missing(flag: &str) -> ProbeError { ProbeError::Usage(format!("{flag} requires a value")) }

/// Usage text.
pub const USAGE: &str = "\
swaprpc-probe

USAGE:
    swaprpc-probe [FLAGS]

FLAGS:
    --config <path>               Config file (default: {config_dir}/swaprpc/config.toml)
    --revision <legacy|current>   Override the wallet protocol revision
    --help, -h                    Show this help message
";

/// Build an Electrum client for the configured wallet.
pub fn client_from_config(config: &Config) -> Result<ElectrumClient, ProbeError> {
    let transport = HttpTransport::from_config(&config.connection)?;
    Ok(ElectrumClient::new(Arc::new(transport), config.wallet.network, config.wallet.revision)?)
}

/// What the wallet answered.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Fresh receiving address.
    pub address: Address,
    /// Fee rate per kilobyte.
    pub fee_rate: Amount,
    /// Unsigned payment of [`PROBE_AMOUNT`] to `address`.
    pub funded: FundedTransaction,
    /// Spendable outputs.
    pub unspent: Vec<UnspentOutput>,
}

/// Run the probe sequence against `client`.
pub async fn run(client: &ElectrumClient) -> Result<ProbeReport, RpcClientError> {
    // Address and fee rate are independent; have both in flight at once.
    let address = client.get_unused_address_async()?;
    let fee_rate = client.get_fee_rate_async()?;
    let address = address.receive().await?;
    let fee_rate = fee_rate.receive().await?;
    tracing::info!(%address, %fee_rate, "wallet reachable");

    let funded = client.pay_to(&address, PROBE_AMOUNT, true).await?;
    tracing::info!(txid = %funded.tx.compute_txid(), complete = funded.complete, "payment funded");

    let unspent = client.list_unspent().await?;
    tracing::info!(count = unspent.len(), "unspent outputs listed");
    Ok(ProbeReport { address, fee_rate, funded, unspent })
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "Fee rate: {} sat/kB", self.fee_rate.to_sat())?;
        writeln!(f, "Funded transaction (complete: {}):", self.funded.complete)?;
        writeln!(f, "  {}", serialize_hex(&self.funded.tx))?;
        writeln!(f, "Unspent outputs: {}", self.unspent.len())?;
        for utxo in &self.unspent {
            writeln!(f, "  {} {} {} height {}", utxo.outpoint, utxo.address, utxo.value, utxo.height)?;
        }
        Ok(())
    }
}
