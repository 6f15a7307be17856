//! Inference retrieval under the topic's fetch budget.

use std::sync::Arc;

use node_telemetry::log_stage;
use oc_02_inference_client::InferenceClient;
use shared_types::{InferenceValue, Nonce, RetryPolicy, TopicConfig, TopicId};

use crate::domain::{CycleError, Stage};

/// Fetches one inference value per nonce.
pub struct InferenceFetcher {
    topic_id: TopicId,
    url: String,
    policy: RetryPolicy,
    client: Arc<dyn InferenceClient>,
}

impl InferenceFetcher {
    /// Fetcher using the topic's URL and retry settings.
    pub fn new(config: &TopicConfig, client: Arc<dyn InferenceClient>) -> Self {
        Self {
            topic_id: config.topic_id,
            url: config.inference_url.clone(),
            policy: RetryPolicy::new(
                config.inference_fetch_retries,
                config.inference_fetch_retry_freq,
            ),
            client,
        }
    }

    /// Fetch a value for `nonce`; exhaustion abandons the nonce.
    pub async fn fetch(&self, nonce: &Nonce) -> Result<InferenceValue, CycleError> {
        let max_attempts = self.policy.max_attempts();
        let value = self
            .policy
            .run(|attempt| async move {
                self.client
                    .fetch(self.topic_id, &self.url)
                    .await
                    .inspect_err(|e| {
                        log_stage!(
                            warn,
                            Stage::Fetch.as_str(),
                            self.topic_id,
                            "inference fetch failed",
                            nonce = nonce.value,
                            attempt,
                            max_attempts,
                            error = %e
                        );
                    })
            })
            .await
            .map_err(|e| CycleError::InferenceExhausted {
                attempts: e.attempts(),
                last: e.into_inner(),
            })?;

        log_stage!(
            info,
            Stage::Fetch.as_str(),
            self.topic_id,
            "inference fetched",
            nonce = nonce.value,
            value = %value
        );
        Ok(InferenceValue::new(self.topic_id, nonce.value, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_02_inference_client::{InferenceError, MockInferenceClient};
    use std::time::Duration;
    use tokio::time::Instant;

    fn config(retries: u32, freq_secs: u64) -> TopicConfig {
        TopicConfig {
            inference_fetch_retries: retries,
            inference_fetch_retry_freq: Duration::from_secs(freq_secs),
            ..TopicConfig::new(1, "http://localhost:8000/inference/1")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_call_after_two_delays() {
        let client = Arc::new(MockInferenceClient::with_value("3.25"));
        client.push(Err(InferenceError::Http { status: 502 }));
        client.push(Err(InferenceError::Transport("refused".into())));
        let fetcher = InferenceFetcher::new(&config(3, 1), client.clone());

        let started = Instant::now();
        let value = fetcher.fetch(&Nonce::observed(1, 40)).await.unwrap();

        assert_eq!(client.calls(), 3);
        assert_eq!(value.value, "3.25");
        assert_eq!(value.nonce, 40);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_attempts() {
        let client = Arc::new(MockInferenceClient::failing(InferenceError::EmptyBody));
        let fetcher = InferenceFetcher::new(&config(5, 3), client.clone());

        let err = fetcher.fetch(&Nonce::observed(1, 40)).await.unwrap_err();

        assert_eq!(client.calls(), 5);
        assert_eq!(
            err,
            CycleError::InferenceExhausted {
                attempts: 5,
                last: InferenceError::EmptyBody
            }
        );
    }
}
