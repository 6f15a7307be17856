//! Confirmation polling for broadcast transactions.

use std::sync::Arc;

use node_telemetry::log_tx_event;
use oc_01_chain_client::{ChainClient, ChainError};
use shared_types::{
    ConfirmationResult, ConfirmationStatus, RetryDecision, RetryError, RetryPolicy, TopicId,
    TxCheckConfig, TxHash, TxStatus,
};

use crate::domain::Stage;

/// Why a status check did not confirm the transaction.
#[derive(Debug)]
enum Unconfirmed {
    NotFound,
    Query(ChainError),
    Failed { code: u32, raw_log: String },
}

/// Polls the chain until a transaction is included, fails, or the check
/// budget runs out.
pub struct ConfirmationPoller {
    topic_id: TopicId,
    policy: RetryPolicy,
    chain: Arc<dyn ChainClient>,
}

impl ConfirmationPoller {
    /// Poller using the shared transaction check budget.
    pub fn new(topic_id: TopicId, tx_check: TxCheckConfig, chain: Arc<dyn ChainClient>) -> Self {
        Self {
            topic_id,
            policy: RetryPolicy::new(tx_check.retries, tx_check.freq),
            chain,
        }
    }

    /// Resolve `tx_hash` to a terminal status.
    ///
    /// "Not found" and transient query errors both consume an attempt; an
    /// execution failure or a rejected lookup stops immediately.
    pub async fn confirm(&self, tx_hash: &TxHash) -> ConfirmationResult {
        let outcome = self
            .policy
            .run_classified(|attempt| async move {
                match self.chain.get_tx_status(tx_hash).await {
                    Ok(TxStatus::Included { height }) => Ok((height, attempt)),
                    Ok(TxStatus::NotFound) => Err(RetryDecision::Retry(Unconfirmed::NotFound)),
                    Ok(TxStatus::Failed { code, raw_log }) => {
                        Err(RetryDecision::Abort(Unconfirmed::Failed { code, raw_log }))
                    }
                    Err(e) if e.is_rejection() => Err(RetryDecision::Abort(Unconfirmed::Query(e))),
                    Err(e) => {
                        log_tx_event!(
                            debug,
                            Stage::Confirm.as_str(),
                            self.topic_id,
                            "status query failed",
                            tx_hash,
                            attempt,
                            error = %e
                        );
                        Err(RetryDecision::Retry(Unconfirmed::Query(e)))
                    }
                }
            })
            .await;

        let (status, attempt_count) = match outcome {
            Ok((height, attempts)) => {
                log_tx_event!(
                    info,
                    Stage::Confirm.as_str(),
                    self.topic_id,
                    "transaction included",
                    tx_hash,
                    height,
                    attempts
                );
                (ConfirmationStatus::Included { height }, attempts)
            }
            Err(RetryError::Aborted {
                attempt,
                error: Unconfirmed::Failed { code, raw_log },
            }) => {
                log_tx_event!(
                    error,
                    Stage::Confirm.as_str(),
                    self.topic_id,
                    "transaction failed on chain",
                    tx_hash,
                    code,
                    raw_log = %raw_log
                );
                (ConfirmationStatus::Failed { code, raw_log }, attempt)
            }
            Err(RetryError::Aborted {
                attempt,
                error: Unconfirmed::Query(e),
            }) => {
                log_tx_event!(
                    error,
                    Stage::Confirm.as_str(),
                    self.topic_id,
                    "status lookup rejected, giving up",
                    tx_hash,
                    attempt,
                    error = %e
                );
                (ConfirmationStatus::NotFoundYet, attempt)
            }
            Err(e) => {
                let attempts = e.attempts();
                log_tx_event!(
                    warn,
                    Stage::Confirm.as_str(),
                    self.topic_id,
                    "transaction not confirmed within check budget",
                    tx_hash,
                    attempts,
                    last = ?e.last_error()
                );
                (ConfirmationStatus::NotFoundYet, attempts)
            }
        };

        ConfirmationResult {
            tx_hash: tx_hash.clone(),
            status,
            attempt_count,
        }
    }
}
