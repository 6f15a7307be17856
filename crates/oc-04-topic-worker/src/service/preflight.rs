//! Topic checks run before a worker enters its loop.
//!
//! The activity check also gates every tick of the running loop.

use std::future::Future;
use std::sync::Arc;

use node_telemetry::log_stage;
use oc_01_chain_client::{ChainError, ChainQueries};
use shared_types::{RetryPolicy, SubmissionMessage, TopicConfig, TopicId};

use super::poller::ConfirmationPoller;
use super::submitter::Submitter;
use crate::domain::{PreflightError, Stage};

/// Activity, whitelist and registration checks for one topic.
pub struct Preflight {
    topic_id: TopicId,
    policy: RetryPolicy,
    queries: Arc<dyn ChainQueries>,
}

impl Preflight {
    /// Queries retry `inference_fetch_retries` times at the nonce tick.
    pub fn new(config: &TopicConfig, queries: Arc<dyn ChainQueries>) -> Self {
        Self {
            topic_id: config.topic_id,
            policy: RetryPolicy::new(config.inference_fetch_retries, config.nonce_fetch_freq),
            queries,
        }
    }

    /// Run every check, registering the wallet when needed.
    pub async fn run(
        &self,
        submitter: &Submitter,
        poller: &ConfirmationPoller,
    ) -> Result<(), PreflightError> {
        let topic_id = self.topic_id;
        let address = submitter.address();

        self.ensure_active().await?;

        let whitelist_enabled = self
            .query("is_topic_whitelist_enabled", || {
                self.queries.is_topic_whitelist_enabled(topic_id)
            })
            .await?;
        if whitelist_enabled
            && !self
                .query("is_whitelisted_for", || {
                    self.queries.is_whitelisted_for(topic_id, address)
                })
                .await?
        {
            return Err(PreflightError::NotWhitelisted { topic_id });
        }

        if self
            .query("is_registered_for", || {
                self.queries.is_registered_for(topic_id, address)
            })
            .await?
        {
            log_stage!(debug, Stage::Preflight.as_str(), topic_id, "worker already registered");
            return Ok(());
        }

        log_stage!(info, Stage::Preflight.as_str(), topic_id, "registering worker", address);
        let tx_hash = submitter
            .submit(&SubmissionMessage::Register { topic_id })
            .await
            .map_err(|e| PreflightError::RegistrationFailed {
                topic_id,
                reason: e.to_string(),
            })?;

        let result = poller.confirm(&tx_hash).await;
        if !result.status.is_included() {
            return Err(PreflightError::RegistrationFailed {
                topic_id,
                reason: format!("registration tx {tx_hash} ended as {:?}", result.status),
            });
        }

        log_stage!(info, Stage::Preflight.as_str(), topic_id, "worker registered", tx_hash = %tx_hash);
        self.ensure_active().await
    }

    /// Fail with [`PreflightError::TopicInactive`] once the chain reports the
    /// topic inactive.
    pub async fn ensure_active(&self) -> Result<(), PreflightError> {
        let topic_id = self.topic_id;
        if self
            .query("is_topic_active", || self.queries.is_topic_active(topic_id))
            .await?
        {
            return Ok(());
        }
        log_stage!(warn, Stage::Preflight.as_str(), topic_id, "topic is not active");
        Err(PreflightError::TopicInactive { topic_id })
    }

    async fn query<F, Fut>(&self, query: &'static str, mut call: F) -> Result<bool, PreflightError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, ChainError>>,
    {
        self.policy
            .run(|attempt| {
                let pending = call();
                async move {
                    pending.await.inspect_err(|e| {
                        log_stage!(
                            warn,
                            Stage::Preflight.as_str(),
                            self.topic_id,
                            "preflight query failed",
                            query,
                            attempt,
                            error = %e
                        );
                    })
                }
            })
            .await
            .map_err(|e| PreflightError::Query {
                topic_id: self.topic_id,
                query,
                attempts: e.attempts(),
                last: e.into_inner(),
            })
    }
}
