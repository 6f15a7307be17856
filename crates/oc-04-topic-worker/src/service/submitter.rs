//! Single-shot transaction submission.

use std::sync::Arc;

use node_telemetry::{log_stage, log_tx_event};
use oc_01_chain_client::ChainClient;
use oc_03_tx_builder::TxSigner;
use shared_types::{SubmissionMessage, TxHash};
use tokio::sync::Mutex;

use crate::domain::{CycleError, Stage};

/// Serializes sign → broadcast → record for one wallet.
///
/// Clones share the same lock; give every worker of a wallet a clone of
/// one lane.
#[derive(Debug, Clone, Default)]
pub struct SubmissionLane(Arc<Mutex<()>>);

impl SubmissionLane {
    /// A fresh, unshared lane.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Signs and broadcasts messages for one topic.
pub struct Submitter {
    signer: Arc<dyn TxSigner>,
    chain: Arc<dyn ChainClient>,
    lane: SubmissionLane,
}

impl Submitter {
    /// Submitter sharing `lane` with the wallet's other workers.
    pub fn new(signer: Arc<dyn TxSigner>, chain: Arc<dyn ChainClient>, lane: SubmissionLane) -> Self {
        Self { signer, chain, lane }
    }

    /// Wallet address transactions are signed with.
    pub fn address(&self) -> &str {
        self.signer.address()
    }

    /// Sign and broadcast `message` once. No retry on any failure.
    pub async fn submit(&self, message: &SubmissionMessage) -> Result<TxHash, CycleError> {
        let topic_id = message.topic_id();
        let _turn = self.lane.0.lock().await;

        let tx = self.signer.sign(message).await.map_err(|e| {
            log_stage!(
                error,
                Stage::Submit.as_str(),
                topic_id,
                "signing failed",
                kind = message.kind(),
                error = %e
            );
            CycleError::Signing(e)
        })?;

        let result = self.chain.submit_tx(&tx).await;
        self.signer.record_broadcast(&tx, &result);

        match result {
            Ok(tx_hash) => {
                log_tx_event!(
                    info,
                    Stage::Submit.as_str(),
                    topic_id,
                    "transaction broadcast",
                    tx_hash,
                    kind = message.kind(),
                    sequence = tx.sequence,
                    gas_limit = tx.gas_limit
                );
                Ok(tx_hash)
            }
            Err(e) => {
                log_stage!(
                    error,
                    Stage::Submit.as_str(),
                    topic_id,
                    "broadcast failed",
                    kind = message.kind(),
                    sequence = tx.sequence,
                    rejected = e.is_rejection(),
                    error = %e
                );
                Err(CycleError::Broadcast(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_01_chain_client::{ChainError, MockChainClient};
    use oc_03_tx_builder::{MockTxSigner, SignerError};
    use std::time::Duration;

    fn message(nonce: u64) -> SubmissionMessage {
        SubmissionMessage::Inference {
            topic_id: 1,
            nonce,
            value: "1.5".into(),
        }
    }

    #[tokio::test]
    async fn test_broadcast_advances_sequence() {
        let chain = Arc::new(MockChainClient::new());
        let signer = Arc::new(MockTxSigner::new("allo1worker"));
        let submitter = Submitter::new(signer.clone(), chain.clone(), SubmissionLane::new());

        let hash = submitter.submit(&message(10)).await.unwrap();

        assert_eq!(chain.submit_calls(), 1);
        assert_eq!(chain.submitted()[0].sequence, 0);
        assert!(!hash.as_str().is_empty());
        assert_eq!(signer.sequence(), 1);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let chain = Arc::new(MockChainClient::new());
        chain.push_broadcast(Err(ChainError::Rejected {
            code: 77,
            raw_log: "nonce already fulfilled".into(),
        }));
        let signer = Arc::new(MockTxSigner::new("allo1worker"));
        let submitter = Submitter::new(signer.clone(), chain.clone(), SubmissionLane::new());

        let err = submitter.submit(&message(10)).await.unwrap_err();

        assert!(err.is_rejection());
        assert_eq!(chain.submit_calls(), 1);
        assert_eq!(signer.sequence(), 0);
    }

    #[tokio::test]
    async fn test_signing_failure_skips_broadcast() {
        let chain = Arc::new(MockChainClient::new());
        let signer = Arc::new(MockTxSigner::new("allo1worker"));
        signer.push_failure(SignerError::InsufficientBalance {
            required: 10,
            balance: 3,
        });
        let submitter = Submitter::new(signer, chain.clone(), SubmissionLane::new());

        let err = submitter.submit(&message(10)).await.unwrap_err();

        assert!(matches!(err, CycleError::Signing(_)));
        assert_eq!(chain.submit_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_lane_serializes_signers() {
        let chain = Arc::new(MockChainClient::new());
        let signer =
            Arc::new(MockTxSigner::new("allo1worker").with_sign_delay(Duration::from_millis(200)));
        let lane = SubmissionLane::new();
        let submitters: Vec<_> = (0..4)
            .map(|_| Arc::new(Submitter::new(signer.clone(), chain.clone(), lane.clone())))
            .collect();

        let handles: Vec<_> = submitters
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let s = s.clone();
                tokio::spawn(async move { s.submit(&message(i as u64)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(signer.max_in_flight(), 1);
        let mut sequences: Vec<u64> = chain.submitted().iter().map(|tx| tx.sequence).collect();
        sequences.sort_unstable();
        assert_eq!(sequences, vec![0, 1, 2, 3]);
    }
}
