//! HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use shared_types::TopicId;

use crate::domain::{parse_inference_body, InferenceError};
use crate::ports::InferenceClient;

/// Per-request timeout for inference endpoints.
pub const INFERENCE_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// reqwest-backed inference client shared by all topics.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    client: Client,
}

impl HttpInferenceClient {
    /// Create a client with the default timeout.
    pub fn new() -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(INFERENCE_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn fetch(&self, topic_id: TopicId, url: &str) -> Result<String, InferenceError> {
        debug!(topic_id, url, "fetching inference");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;
        parse_inference_body(&body)
    }
}
