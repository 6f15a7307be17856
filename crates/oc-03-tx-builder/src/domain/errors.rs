//! # Domain Errors

use oc_01_chain_client::ChainError;
use shared_crypto::CryptoError;
use thiserror::Error;

/// Failures preparing a signed transaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignerError {
    /// Key or address handling failed.
    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    /// A chain query needed for signing failed.
    #[error("chain query failed: {0}")]
    Chain(#[from] ChainError),

    /// The wallet account does not exist on chain (never funded).
    #[error("account {address} not found on chain; is the wallet funded?")]
    AccountNotFound {
        /// Wallet address.
        address: String,
    },

    /// Dry run kept failing.
    #[error("gas estimation failed after {attempts} attempts: {last}")]
    GasEstimation {
        /// Simulation attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last: ChainError,
    },

    /// The message cannot be represented on chain.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The computed fee exceeds the wallet's known balance.
    #[error("insufficient balance: fee {required}, balance {balance}")]
    InsufficientBalance {
        /// Fee required by the transaction.
        required: u128,
        /// Known wallet balance.
        balance: u128,
    },
}
