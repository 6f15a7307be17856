//! # Outbound Ports (Driven Ports)

use async_trait::async_trait;
use shared_types::{SignedTx, TopicId, TxHash, TxStatus};

use crate::domain::{AccountInfo, ChainError};

/// Chain operations used by the per-topic reconciliation cycle.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Block height of the topic's oldest open worker window, if any.
    async fn get_open_nonce(&self, topic_id: TopicId) -> Result<Option<u64>, ChainError>;

    /// Broadcast a signed transaction (sync mode).
    ///
    /// Returns the hash once the node accepted it into its mempool; inclusion
    /// is checked separately through [`ChainClient::get_tx_status`].
    async fn submit_tx(&self, tx: &SignedTx) -> Result<TxHash, ChainError>;

    /// Inclusion status of a previously broadcast transaction.
    async fn get_tx_status(&self, tx_hash: &TxHash) -> Result<TxStatus, ChainError>;
}

/// Node, account and topic queries.
#[async_trait]
pub trait ChainQueries: Send + Sync {
    /// Network (chain) id reported by the node.
    async fn chain_id(&self) -> Result<String, ChainError>;

    /// Whether the node is still catching up.
    async fn is_syncing(&self) -> Result<bool, ChainError>;

    /// Fee-market price per gas unit in `denom`.
    async fn gas_price(&self, denom: &str) -> Result<f64, ChainError>;

    /// Height of the latest committed block.
    async fn latest_height(&self) -> Result<u64, ChainError>;

    /// Account number and sequence; `None` if the account was never funded.
    async fn account_info(&self, address: &str) -> Result<Option<AccountInfo>, ChainError>;

    /// Balance of `address` in `denom`.
    async fn balance(&self, address: &str, denom: &str) -> Result<u128, ChainError>;

    /// Gas used by a dry run of the encoded transaction.
    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, ChainError>;

    /// Whether the topic currently accepts payloads.
    async fn is_topic_active(&self, topic_id: TopicId) -> Result<bool, ChainError>;

    /// Whether the topic restricts workers to a whitelist.
    async fn is_topic_whitelist_enabled(&self, topic_id: TopicId) -> Result<bool, ChainError>;

    /// Whether `address` is on the topic's worker whitelist.
    async fn is_whitelisted_for(&self, topic_id: TopicId, address: &str)
        -> Result<bool, ChainError>;

    /// Whether `address` is registered as a worker for the topic.
    async fn is_registered_for(&self, topic_id: TopicId, address: &str)
        -> Result<bool, ChainError>;
}
