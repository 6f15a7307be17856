//! The per-topic cycle and its endless loop.

use std::any::Any;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use node_telemetry::log_stage;
use oc_01_chain_client::{ChainClient, ChainQueries};
use oc_02_inference_client::InferenceClient;
use oc_03_tx_builder::TxSigner;
use shared_types::{
    ConfirmationStatus, Nonce, SubmissionAttempt, SubmissionMessage, TopicConfig, TopicId,
    TxCheckConfig,
};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::fetcher::InferenceFetcher;
use super::poller::ConfirmationPoller;
use super::preflight::Preflight;
use super::submitter::{SubmissionLane, Submitter};
use super::watcher::NonceWatcher;
use crate::domain::{CycleError, NonceTracker, PreflightError, Stage};
use crate::ports::SupervisedTask;

/// Collaborators shared by every worker of one node.
#[derive(Clone)]
pub struct WorkerDeps {
    /// Nonce, broadcast and status calls.
    pub chain: Arc<dyn ChainClient>,
    /// Preflight queries.
    pub queries: Arc<dyn ChainQueries>,
    /// Inference endpoint client.
    pub inference: Arc<dyn InferenceClient>,
    /// Wallet signer.
    pub signer: Arc<dyn TxSigner>,
    /// Wallet-wide submission lane.
    pub lane: SubmissionLane,
    /// Confirmation budget.
    pub tx_check: TxCheckConfig,
}

/// Drives one topic: preflight once, then watch → fetch → submit → confirm
/// while the topic stays active.
///
/// The worker owns its [`NonceTracker`]; running it again after its future
/// was dropped keeps every nonce already handled.
pub struct TopicWorker {
    config: TopicConfig,
    tracker: NonceTracker,
    preflight: Preflight,
    watcher: NonceWatcher,
    fetcher: InferenceFetcher,
    submitter: Submitter,
    poller: ConfirmationPoller,
}

impl TopicWorker {
    /// Assemble the stages for `config`.
    pub fn new(config: TopicConfig, deps: &WorkerDeps) -> Self {
        Self {
            tracker: NonceTracker::new(),
            preflight: Preflight::new(&config, deps.queries.clone()),
            watcher: NonceWatcher::new(config.topic_id, config.nonce_fetch_freq, deps.chain.clone()),
            fetcher: InferenceFetcher::new(&config, deps.inference.clone()),
            submitter: Submitter::new(deps.signer.clone(), deps.chain.clone(), deps.lane.clone()),
            poller: ConfirmationPoller::new(config.topic_id, deps.tx_check, deps.chain.clone()),
            config,
        }
    }

    /// Topic served.
    pub fn topic_id(&self) -> TopicId {
        self.config.topic_id
    }

    /// Handled-nonce watermark.
    pub fn tracker(&self) -> &NonceTracker {
        &self.tracker
    }

    /// Run the topic checks without entering the loop.
    pub async fn preflight(&self) -> Result<(), PreflightError> {
        self.preflight.run(&self.submitter, &self.poller).await
    }

    /// One cycle for an already claimed nonce.
    ///
    /// Any stage failure ends the cycle; a broadcast transaction always
    /// yields a resolved attempt, whatever its confirmation status.
    pub async fn run_cycle(&self, nonce: Nonce) -> Result<SubmissionAttempt, CycleError> {
        let value = self.fetcher.fetch(&nonce).await?;
        let attempt = SubmissionAttempt::new(nonce.topic_id, nonce.value);

        let tx_hash = self.submitter.submit(&SubmissionMessage::from(&value)).await?;
        let result = self.poller.confirm(&tx_hash).await;

        Ok(attempt.broadcast(tx_hash).resolve(result))
    }

    /// Preflight, then loop until the future is dropped or the topic stops
    /// being active.
    ///
    /// Topic activity is re-checked before every nonce poll.
    pub async fn run_forever(&self) -> Result<Infallible, PreflightError> {
        self.preflight().await?;
        info!(
            topic_id = self.topic_id(),
            last_handled = ?self.tracker.last_handled(),
            "topic worker started"
        );

        loop {
            let nonce = self
                .watcher
                .wait_for_nonce(&self.tracker, || self.preflight.ensure_active())
                .await?;
            self.run_guarded(nonce).await;
            tokio::time::sleep(self.watcher.tick()).await;
        }
    }

    async fn run_guarded(&self, nonce: Nonce) {
        let topic_id = self.topic_id();
        let span = info_span!("cycle", cycle_id = %Uuid::new_v4(), nonce = nonce.value);

        async move {
            match AssertUnwindSafe(self.run_cycle(nonce)).catch_unwind().await {
                Ok(Ok(attempt)) => log_attempt(topic_id, &attempt),
                Ok(Err(e)) if e.is_rejection() => {
                    log_stage!(error, e.stage().as_str(), topic_id, "cycle rejected", error = %e);
                }
                Ok(Err(e)) => {
                    log_stage!(warn, e.stage().as_str(), topic_id, "cycle abandoned", error = %e);
                }
                Err(panic) => {
                    error!(
                        topic_id,
                        panic = %panic_message(panic.as_ref()),
                        "CRITICAL: cycle panicked, worker continues"
                    );
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn log_attempt(topic_id: TopicId, attempt: &SubmissionAttempt) {
    let Some(outcome) = &attempt.outcome else {
        return;
    };
    let stage = Stage::Confirm.as_str();
    match &outcome.status {
        ConfirmationStatus::Included { height } => log_stage!(
            info,
            stage,
            topic_id,
            "inference submitted",
            height,
            attempts = outcome.attempt_count
        ),
        ConfirmationStatus::NotFoundYet => log_stage!(
            warn,
            stage,
            topic_id,
            "inference broadcast but unconfirmed",
            tx_hash = %outcome.tx_hash,
            attempts = outcome.attempt_count
        ),
        ConfirmationStatus::Failed { code, .. } => log_stage!(
            error,
            stage,
            topic_id,
            "inference transaction failed",
            tx_hash = %outcome.tx_hash,
            code
        ),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[async_trait]
impl SupervisedTask for TopicWorker {
    fn topic_id(&self) -> TopicId {
        self.config.topic_id
    }

    async fn run(&self) -> Result<Infallible, PreflightError> {
        self.run_forever().await
    }
}
