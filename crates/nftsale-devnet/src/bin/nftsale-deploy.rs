//! `nftsale-deploy [CONFIG.json]`
//!
//! Starts a devnet, deploys the Sale contract and prints the deployment as
//! JSON on stdout. Logs go to stderr and follow `RUST_LOG`; set
//! `NFTSALE_LOG_JSON=1` for JSON logs.

use std::process::ExitCode;

use nftsale_devnet::deploy;
use nftsale_types::{DeployConfig, Result, constants};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("NFTSALE_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config() -> Result<DeployConfig> {
    match std::env::args().nth(1) {
        Some(path) => DeployConfig::from_file(path),
        None => Ok(DeployConfig::default()),
    }
}

fn main() -> ExitCode {
    init_tracing();
    tracing::info!(
        protocol = constants::PROTOCOL_NAME,
        version = constants::VERSION,
        "Starting deployment"
    );

    let result = load_config().and_then(|config| {
        let (_, deployment) = deploy::run(&config)?;
        deployment.to_json()
    });

    match result {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Deployment failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
