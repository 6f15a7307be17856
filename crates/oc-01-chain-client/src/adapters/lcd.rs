//! LCD (REST) adapter.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use shared_types::{SignedTx, TopicId, TxHash, TxStatus};

use crate::domain::wire;
use crate::domain::{AccountInfo, ChainError};
use crate::ports::{ChainClient, ChainQueries};

/// Per-request timeout applied to every LCD call.
pub const LCD_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// LCD client bound to one node.
#[derive(Debug, Clone)]
pub struct LcdClient {
    client: Client,
    base_url: String,
}

impl LcdClient {
    /// Create a client for `api_url` (e.g. `https://allora-api.testnet.allora.network`).
    pub fn new(api_url: impl Into<String>) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(LCD_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let base_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Value, ChainError> {
        debug!(path, "LCD GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ChainError> {
        debug!(path, "LCD POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }
}

fn transport(e: reqwest::Error) -> ChainError {
    if e.is_timeout() {
        ChainError::Transport(format!("request timed out: {e}"))
    } else {
        ChainError::Transport(e.to_string())
    }
}

/// Throttling and server-side statuses carry no usable body; anything else
/// (including 400/404 with an SDK error body) is handed to the parsers.
async fn read_json(response: Response) -> Result<Value, ChainError> {
    let status = response.status();
    if status == StatusCode::FORBIDDEN
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        return Err(ChainError::Http {
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ChainError::MalformedResponse(format!("HTTP {status}: {e}")))
}

#[async_trait]
impl ChainClient for LcdClient {
    async fn get_open_nonce(&self, topic_id: TopicId) -> Result<Option<u64>, ChainError> {
        let body = self
            .get(&format!("/emissions/v9/unfulfilled_worker_nonces/{topic_id}"))
            .await?;
        wire::parse_open_nonce(body)
    }

    async fn submit_tx(&self, tx: &SignedTx) -> Result<TxHash, ChainError> {
        let body = json!({
            "tx_bytes": BASE64.encode(&tx.bytes),
            "mode": "BROADCAST_MODE_SYNC",
        });
        let body = self.post("/cosmos/tx/v1beta1/txs", &body).await?;
        wire::parse_broadcast(body)
    }

    async fn get_tx_status(&self, tx_hash: &TxHash) -> Result<TxStatus, ChainError> {
        let body = self.get(&format!("/cosmos/tx/v1beta1/txs/{tx_hash}")).await?;
        wire::parse_tx_status(body)
    }
}

#[async_trait]
impl ChainQueries for LcdClient {
    async fn chain_id(&self) -> Result<String, ChainError> {
        let body = self.get("/cosmos/base/tendermint/v1beta1/node_info").await?;
        wire::parse_chain_id(body)
    }

    async fn is_syncing(&self) -> Result<bool, ChainError> {
        let body = self.get("/cosmos/base/tendermint/v1beta1/syncing").await?;
        wire::parse_syncing(body)
    }

    async fn gas_price(&self, denom: &str) -> Result<f64, ChainError> {
        let body = self.get(&format!("/feemarket/v1/gas_price/{denom}")).await?;
        wire::parse_gas_price(body)
    }

    async fn latest_height(&self) -> Result<u64, ChainError> {
        let body = self.get("/cosmos/base/tendermint/v1beta1/blocks/latest").await?;
        wire::parse_latest_height(body)
    }

    async fn account_info(&self, address: &str) -> Result<Option<AccountInfo>, ChainError> {
        let body = self
            .get(&format!("/cosmos/auth/v1beta1/account_info/{address}"))
            .await?;
        wire::parse_account_info(body)
    }

    async fn balance(&self, address: &str, denom: &str) -> Result<u128, ChainError> {
        let body = self
            .get(&format!(
                "/cosmos/bank/v1beta1/balances/{address}/by_denom?denom={denom}"
            ))
            .await?;
        wire::parse_balance(body)
    }

    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, ChainError> {
        let body = json!({ "tx_bytes": BASE64.encode(tx_bytes) });
        let body = self.post("/cosmos/tx/v1beta1/simulate", &body).await?;
        wire::parse_simulate(body)
    }

    async fn is_topic_active(&self, topic_id: TopicId) -> Result<bool, ChainError> {
        let body = self
            .get(&format!("/emissions/v9/is_topic_active/{topic_id}"))
            .await?;
        wire::parse_flag(body, "is_active")
    }

    async fn is_topic_whitelist_enabled(&self, topic_id: TopicId) -> Result<bool, ChainError> {
        let body = self
            .get(&format!(
                "/emissions/v9/is_topic_worker_whitelist_enabled/{topic_id}"
            ))
            .await?;
        wire::parse_flag(body, "is_topic_worker_whitelist_enabled")
    }

    async fn is_whitelisted_for(
        &self,
        topic_id: TopicId,
        address: &str,
    ) -> Result<bool, ChainError> {
        let body = self
            .get(&format!(
                "/emissions/v9/is_whitelisted_topic_worker/{topic_id}/{address}"
            ))
            .await?;
        wire::parse_flag(body, "is_whitelisted_topic_worker")
    }

    async fn is_registered_for(
        &self,
        topic_id: TopicId,
        address: &str,
    ) -> Result<bool, ChainError> {
        let body = self
            .get(&format!("/emissions/v9/worker_registered/{topic_id}/{address}"))
            .await?;
        wire::parse_flag(body, "is_registered")
    }
}
