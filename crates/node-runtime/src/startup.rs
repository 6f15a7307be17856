//! Checks run before any worker starts, and wallet bootstrap.

use std::sync::Arc;

use oc_01_chain_client::{ChainError, ChainQueries};
use oc_03_tx_builder::{CosmosTxSigner, SignerError, SignerParams};
use thiserror::Error;
use tracing::info;

use crate::config::GlobalConfig;

/// Reasons the node refuses to start.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The LCD node is still catching up.
    #[error("API node is syncing")]
    Syncing,

    /// A startup query failed.
    #[error("startup check `{check}` failed: {source}")]
    Query {
        /// Check label.
        check: &'static str,
        /// Chain error.
        source: ChainError,
    },

    /// The wallet could not be loaded.
    #[error("wallet is not initialized: {0}")]
    Wallet(#[from] SignerError),

    /// The wallet cannot pay any fee.
    #[error("wallet {address} has no {denom} balance")]
    EmptyBalance {
        /// Wallet address.
        address: String,
        /// Fee denomination.
        denom: String,
    },
}

/// Verify the chain endpoint and load the wallet.
pub async fn bootstrap_wallet(
    config: &GlobalConfig,
    queries: Arc<dyn ChainQueries>,
) -> Result<Arc<CosmosTxSigner>, StartupError> {
    let syncing = queries
        .is_syncing()
        .await
        .map_err(|source| StartupError::Query {
            check: "syncing",
            source,
        })?;
    if syncing {
        return Err(StartupError::Syncing);
    }

    let params = SignerParams {
        address_prefix: config.chain.address_prefix.clone(),
        gas_adjustment: config.chain.gas_adjustment,
        fee_denom: config.chain.fee_denom.clone(),
    };
    let signer = CosmosTxSigner::bootstrap(Arc::clone(&config.keypair), params, queries).await?;

    if signer.balance() == 0 {
        return Err(StartupError::EmptyBalance {
            address: oc_03_tx_builder::TxSigner::address(&signer).to_string(),
            denom: config.chain.fee_denom.clone(),
        });
    }

    info!(chain_id = signer.chain_id(), "startup checks passed");
    Ok(Arc::new(signer))
}
