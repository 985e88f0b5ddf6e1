#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for wallet client binaries.
//!
//! Libraries in the workspace only emit `tracing` events. Binaries call
//! [`init`] once at startup to install a `fmt` subscriber that writes to
//! stderr or to the configured log file. `RUST_LOG`, when set, overrides the
//! configured level.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use config::LoggingConfig;
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level or `RUST_LOG` directive did not parse.
    #[error("invalid log filter '{directive}': {reason}")]
    Filter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// The log file could not be opened for appending.
    #[error("cannot open log file {path}: {source}")]
    File {
        /// Configured log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Another global subscriber was installed first.
    #[error("failed to install subscriber: {0}")]
    Subscriber(String),
}

/// Install the global subscriber described by `config`.
///
/// Only the first successful call installs anything; later calls return
/// `Ok(())` without touching global state.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    INSTALLED.get_or_try_init(|| install(config)).map(|_| ())
}

/// Whether [`init`] has installed the subscriber.
pub fn is_initialized() -> bool { INSTALLED.get().is_some() }

fn install(config: &LoggingConfig) -> Result<(), LoggingError> {
    let directive = directive(&config.level, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| LoggingError::Filter { directive: directive.clone(), reason: e.to_string() })?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File { path: path.clone(), source })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| LoggingError::Subscriber(e.to_string()))?;
    tracing::debug!(filter = %directive, "logging initialized");
    Ok(())
}

/// `RUST_LOG` wins over the configured level unless it is empty.
fn directive(level: &str, env: Option<String>) -> String {
    env.filter(|d| !d.trim().is_empty()).unwrap_or_else(|| level.to_string())
}
