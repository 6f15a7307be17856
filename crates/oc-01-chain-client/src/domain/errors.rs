//! # Domain Errors

use thiserror::Error;

/// ABCI code the SDK returns for unknown transactions and accounts.
pub const CODE_NOT_FOUND: u32 = 5;

/// ABCI code for an account sequence mismatch.
pub const CODE_SEQUENCE_MISMATCH: u32 = 32;

/// Errors returned by chain queries and broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Connection, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a throttling or server-side status.
    #[error("LCD node answered HTTP {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// Body is not JSON or lacks an expected field.
    #[error("malformed LCD response: {0}")]
    MalformedResponse(String),

    /// The chain rejected the transaction or query.
    #[error("rejected by chain (code {code}): {raw_log}")]
    Rejected {
        /// ABCI result code.
        code: u32,
        /// Chain-provided log.
        raw_log: String,
    },

    /// Broadcast rejected because the signer's sequence is behind or ahead.
    #[error("account sequence mismatch, chain expects {expected}")]
    SequenceMismatch {
        /// Sequence the chain expects next.
        expected: u64,
        /// Chain-provided log.
        raw_log: String,
    },
}

impl ChainError {
    /// Whether retrying the same request later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Http { .. } | Self::MalformedResponse(_)
        )
    }

    /// Whether the chain explicitly refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::SequenceMismatch { .. })
    }
}
