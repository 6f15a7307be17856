//! # Allora Offchain Node
//!
//! Long-running worker that submits inference values for every configured
//! topic. The only surface is start/stop; everything observable goes to
//! the logs.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use node_runtime::config::DEFAULT_CONFIG_PATH;
use node_runtime::{bootstrap_wallet, wait_for_os_signal, GlobalConfig, NodeRuntime, RawConfig};
use node_telemetry::{init_logging, TelemetryConfig};
use oc_01_chain_client::LcdClient;
use oc_02_inference_client::HttpInferenceClient;
use oc_03_tx_builder::TxSigner;
use oc_04_topic_worker::{SubmissionLane, WorkerDeps};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Allora offchain node
#[derive(Parser, Debug)]
#[command(name = "node-runtime", version)]
#[command(about = "Submits topic inferences to the Allora chain")]
struct Args {
    /// Path to the JSON config document
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let raw = RawConfig::load(&args.config);
    let debug = raw.as_ref().map(RawConfig::debug).unwrap_or(false);
    if let Err(e) = init_logging(&TelemetryConfig::from_env(debug)) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = match raw {
        Ok(raw) => run(raw).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => {
            info!("Execution finished.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("CRITICAL: {e:#} - execution aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(raw: RawConfig) -> Result<()> {
    let config = raw
        .resolve(std::env::var(node_runtime::config::PRIVATE_KEY_ENV).ok())
        .context("invalid configuration")?;

    let lcd = Arc::new(LcdClient::new(&config.chain.api_url).context("failed to build API node client")?);
    let signer = bootstrap_wallet(&config, lcd.clone())
        .await
        .context("startup checks failed")?;

    log_banner(&config, signer.address());

    let deps = WorkerDeps {
        chain: lcd.clone(),
        queries: lcd,
        inference: Arc::new(
            HttpInferenceClient::new().context("failed to build inference client")?,
        ),
        signer,
        lane: SubmissionLane::new(),
        tx_check: config.chain.tx_check,
    };

    let runtime = NodeRuntime::new(&config, &deps);
    runtime
        .run(async {
            if let Err(e) = wait_for_os_signal().await {
                error!(error = %e, "failed to listen for shutdown signals");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}

fn log_banner(config: &GlobalConfig, address: &str) {
    info!("* * * * * * * * * * * * * * * * * * * * * *");
    info!("Allora Offchain Node");
    info!("Version: {VERSION}");
    info!(
        "Debugging mode: {}",
        if config.debug { "enabled" } else { "disabled" }
    );
    info!("Wallet: {address}");
    info!("Topics: {}", config.topics.len());
    info!("* * * * * * * * * * * * * * * * * * * * * *");
}
