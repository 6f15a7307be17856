//! # Ports Layer

use async_trait::async_trait;
use oc_01_chain_client::ChainError;
use shared_types::{SignedTx, SubmissionMessage, TxHash};

use crate::domain::SignerError;

/// Credential service: turns messages into broadcastable transactions.
///
/// Implementations own the wallet's account sequence. `sign` and the
/// matching `record_broadcast` must not interleave with another message's
/// pair.
#[async_trait]
pub trait TxSigner: Send + Sync {
    /// Bech32 address of the signing wallet.
    fn address(&self) -> &str;

    /// Estimate gas, compute the fee and sign `message` at the current sequence.
    async fn sign(&self, message: &SubmissionMessage) -> Result<SignedTx, SignerError>;

    /// Feed the broadcast outcome of `tx` back into the account state.
    fn record_broadcast(&self, tx: &SignedTx, result: &Result<TxHash, ChainError>);
}
