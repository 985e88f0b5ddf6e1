//! swaprpc probe
//!
//! Connects to the configured wallet daemon and runs the probe sequence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::env;
use std::process::ExitCode;

use probe::{Args, ProbeError, USAGE};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let args = match Args::parse(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use 'swaprpc-probe --help' for usage information");
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        print!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    match probe_wallet(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "probe failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn probe_wallet(args: &Args) -> Result<(), ProbeError> {
    let config = args.load_config()?;
    logging::init(&config.logging)?;
    tracing::debug!(
        url = %config.connection.url(),
        network = %config.wallet.network,
        revision = %config.wallet.revision,
        "probing wallet"
    );

    let client = probe::client_from_config(&config)?;
    let report = probe::run(&client).await?;
    print!("{}", report);
    Ok(())
}
