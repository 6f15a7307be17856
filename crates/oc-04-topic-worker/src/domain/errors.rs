//! # Domain Errors

use oc_01_chain_client::ChainError;
use oc_02_inference_client::InferenceError;
use oc_03_tx_builder::SignerError;
use shared_types::TopicId;
use thiserror::Error;

use super::stage::Stage;

/// Terminal failure of one cycle. Contained by the worker loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleError {
    /// No inference value within the fetch budget; the nonce is abandoned.
    #[error("inference fetch exhausted after {attempts} attempts: {last}")]
    InferenceExhausted {
        /// Attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last: InferenceError,
    },

    /// The signer refused or failed to build the transaction.
    #[error("signing failed: {0}")]
    Signing(SignerError),

    /// The broadcast failed or the chain rejected the transaction.
    #[error("broadcast failed: {0}")]
    Broadcast(ChainError),
}

impl CycleError {
    /// Stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InferenceExhausted { .. } => Stage::Fetch,
            Self::Signing(_) | Self::Broadcast(_) => Stage::Submit,
        }
    }

    /// Whether the chain explicitly refused the submission.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::Broadcast(e) => e.is_rejection(),
            Self::Signing(SignerError::InsufficientBalance { .. }) => true,
            _ => false,
        }
    }
}

/// Reasons a worker stops before entering its loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreflightError {
    /// The topic does not accept payloads.
    #[error("topic {topic_id} is not active")]
    TopicInactive {
        /// Topic checked.
        topic_id: TopicId,
    },

    /// The topic is whitelisted and the wallet is not on the list.
    #[error("wallet is not whitelisted for topic {topic_id}")]
    NotWhitelisted {
        /// Topic checked.
        topic_id: TopicId,
    },

    /// The registration transaction did not land.
    #[error("registration for topic {topic_id} failed: {reason}")]
    RegistrationFailed {
        /// Topic registered for.
        topic_id: TopicId,
        /// Human-readable cause.
        reason: String,
    },

    /// A preflight query kept failing.
    #[error("preflight query `{query}` for topic {topic_id} failed after {attempts} attempts: {last}")]
    Query {
        /// Topic checked.
        topic_id: TopicId,
        /// Query label.
        query: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last: ChainError,
    },
}

impl PreflightError {
    /// Clean exits reflect chain state and are not worth restarting for.
    pub fn is_clean_exit(&self) -> bool {
        matches!(self, Self::TopicInactive { .. } | Self::NotWhitelisted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_stage() {
        let fetch = CycleError::InferenceExhausted {
            attempts: 3,
            last: InferenceError::EmptyBody,
        };
        assert_eq!(fetch.stage(), Stage::Fetch);
        assert!(!fetch.is_rejection());

        let stale = CycleError::Broadcast(ChainError::Rejected {
            code: 77,
            raw_log: "nonce already fulfilled".into(),
        });
        assert_eq!(stale.stage(), Stage::Submit);
        assert!(stale.is_rejection());
    }

    #[test]
    fn test_clean_exit_classification() {
        assert!(PreflightError::TopicInactive { topic_id: 1 }.is_clean_exit());
        assert!(!PreflightError::RegistrationFailed {
            topic_id: 1,
            reason: "unconfirmed".into()
        }
        .is_clean_exit());
    }
}
