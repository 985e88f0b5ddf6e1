#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Wallet Client Configuration
//!
//! This crate loads and saves the client configuration file, which specifies:
//! - How to reach the wallet daemon (host, credentials, TLS, timeout)
//! - Which network and protocol revision the wallet speaks
//! - Logging configuration
//!
//! Configuration is stored in TOML format. Every section and field has a
//! default, so a file only needs to name what differs from a local Electrum
//! daemon on mainnet.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bitcoin::Network;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::ProtocolRevision;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wallet daemon connection settings
    pub connection: ConnectionConfig,
    /// Network and protocol revision of the wallet
    pub wallet: WalletConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// How to reach the wallet daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// `host:port` of the JSON-RPC endpoint
    pub host: String,
    /// RPC username
    pub user: String,
    /// RPC password
    pub pass: String,
    /// Read credentials from a `user:pass` cookie file instead
    pub cookie_file: Option<PathBuf>,
    /// Use plain HTTP
    pub disable_tls: bool,
    /// Per-request timeout in milliseconds; `0` disables it
    pub timeout_ms: u64,
}

/// Wallet network and protocol revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Network the wallet's addresses belong to
    pub network: Network,
    /// Protocol revision the wallet daemon speaks
    pub revision: ProtocolRevision,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, warn, error)
    pub level: String,
    /// Log file path (optional); stderr when unset
    pub file: Option<PathBuf>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost:7777".to_string(),
            user: String::new(),
            pass: String::new(),
            cookie_file: None,
            disable_tls: true,
            timeout_ms: 30_000,
        }
    }
}

impl ConnectionConfig {
    /// The endpoint URL, with the scheme chosen by `disable_tls`.
    ///
    /// A host that already carries a scheme is used as-is.
    pub fn url(&self) -> String {
        if self.host.contains("://") {
            return self.host.clone();
        }
        let scheme = if self.disable_tls { "http" } else { "https" };
        format!("{}://{}", scheme, self.host)
    }

    /// The request timeout, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for WalletConfig {
    fn default() -> Self { Self { network: Network::Bitcoin, revision: ProtocolRevision::Legacy } }
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path`, or return the defaults if there is no file there
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/swaprpc/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("swaprpc");
        Ok(config_dir.join("config.toml"))
    }
}
