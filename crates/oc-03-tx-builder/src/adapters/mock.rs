//! Signer double that records what it signed and how concurrently.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use oc_01_chain_client::ChainError;
use shared_types::{SignedTx, SubmissionMessage, TxHash};

use crate::domain::SignerError;
use crate::ports::TxSigner;

/// Mock signer with the same sequence bookkeeping as the real one.
///
/// `sign` optionally sleeps, which makes overlapping sign/record pairs
/// observable through [`MockTxSigner::max_in_flight`].
#[derive(Debug)]
pub struct MockTxSigner {
    address: String,
    sequence: Mutex<u64>,
    sign_delay: Duration,
    failures: Mutex<VecDeque<SignerError>>,
    signed: Mutex<Vec<(SubmissionMessage, u64)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTxSigner {
    /// Signer for `address` starting at sequence 0.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            sequence: Mutex::new(0),
            sign_delay: Duration::ZERO,
            failures: Mutex::new(VecDeque::new()),
            signed: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every `sign`.
    pub fn with_sign_delay(mut self, delay: Duration) -> Self {
        self.sign_delay = delay;
        self
    }

    /// Fail the next `sign` with `error`.
    pub fn push_failure(&self, error: SignerError) {
        self.failures.lock().push_back(error);
    }

    /// Messages signed so far with the sequence each one used.
    pub fn signed(&self) -> Vec<(SubmissionMessage, u64)> {
        self.signed.lock().clone()
    }

    /// Current account sequence.
    pub fn sequence(&self) -> u64 {
        *self.sequence.lock()
    }

    /// Highest number of sign/record pairs observed open at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TxSigner for MockTxSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign(&self, message: &SubmissionMessage) -> Result<SignedTx, SignerError> {
        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(open, Ordering::SeqCst);

        if !self.sign_delay.is_zero() {
            tokio::time::sleep(self.sign_delay).await;
        }

        let failure = self.failures.lock().pop_front();
        if let Some(error) = failure {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Err(error);
        }

        let sequence = *self.sequence.lock();
        self.signed.lock().push((message.clone(), sequence));
        Ok(SignedTx {
            bytes: format!("{}:{}:{}", message.kind(), message.topic_id(), sequence).into_bytes(),
            sequence,
            gas_limit: 100_000,
            fee: 1_000,
        })
    }

    fn record_broadcast(&self, tx: &SignedTx, result: &Result<TxHash, ChainError>) {
        {
            let mut sequence = self.sequence.lock();
            match result {
                Ok(_) if *sequence == tx.sequence => *sequence += 1,
                Err(ChainError::SequenceMismatch { expected, .. }) => *sequence = *expected,
                _ => {}
            }
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_bookkeeping() {
        let signer = MockTxSigner::new("allo1mock");
        let message = SubmissionMessage::Register { topic_id: 1 };

        let tx = signer.sign(&message).await.unwrap();
        assert_eq!(tx.sequence, 0);
        signer.record_broadcast(&tx, &Ok(TxHash::from("A")));
        assert_eq!(signer.sequence(), 1);

        let tx = signer.sign(&message).await.unwrap();
        signer.record_broadcast(&tx, &Err(ChainError::Transport("reset".into())));
        assert_eq!(signer.sequence(), 1);
        assert_eq!(signer.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let signer = MockTxSigner::new("allo1mock");
        signer.push_failure(SignerError::InsufficientBalance {
            required: 2,
            balance: 1,
        });

        assert!(signer.sign(&SubmissionMessage::Register { topic_id: 1 }).await.is_err());
        assert!(signer.signed().is_empty());
    }
}
