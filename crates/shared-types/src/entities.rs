//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain windows**: `TopicId`, `Nonce`
//! - **Inference**: `InferenceValue`
//! - **Transactions**: `SubmissionMessage`, `SignedTx`, `TxHash`, `TxStatus`
//! - **Outcomes**: `ConfirmationResult`, `SubmissionAttempt`

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: CHAIN WINDOWS
// =============================================================================

/// On-chain identifier of a prediction topic.
pub type TopicId = u64;

/// An open submission window for a topic.
///
/// The chain identifies windows by block height; a window is "unfulfilled"
/// until the chain stops accepting payloads for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce {
    /// Topic this window belongs to.
    pub topic_id: TopicId,
    /// Block height identifying the window.
    pub value: u64,
    /// When the watcher first observed the window.
    pub discovered_at: DateTime<Utc>,
}

impl Nonce {
    /// Stamp a freshly observed window.
    pub fn observed(topic_id: TopicId, value: u64) -> Self {
        Self {
            topic_id,
            value,
            discovered_at: Utc::now(),
        }
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@topic-{}", self.value, self.topic_id)
    }
}

// =============================================================================
// CLUSTER B: INFERENCE
// =============================================================================

/// A prediction fetched for a specific window.
///
/// `value` keeps the endpoint's textual representation; the chain stores
/// inference values as decimal strings and re-formatting a float could
/// change its precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceValue {
    /// Topic the value was fetched for.
    pub topic_id: TopicId,
    /// Window the value will be submitted into.
    pub nonce: u64,
    /// Decimal representation of the prediction.
    pub value: String,
    /// Time the endpoint answered.
    pub fetched_at: DateTime<Utc>,
}

impl InferenceValue {
    /// Stamp a value returned by the inference endpoint.
    pub fn new(topic_id: TopicId, nonce: u64, value: impl Into<String>) -> Self {
        Self {
            topic_id,
            nonce,
            value: value.into(),
            fetched_at: Utc::now(),
        }
    }
}

// =============================================================================
// CLUSTER C: TRANSACTIONS
// =============================================================================

/// Chain message the node wants to get included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmissionMessage {
    /// Submit an inference value into an open window.
    Inference {
        /// Target topic.
        topic_id: TopicId,
        /// Window (block height) being fulfilled.
        nonce: u64,
        /// Decimal inference value.
        value: String,
    },
    /// Register the wallet as a worker for a topic.
    Register {
        /// Target topic.
        topic_id: TopicId,
    },
}

impl SubmissionMessage {
    /// Topic the message targets.
    pub fn topic_id(&self) -> TopicId {
        match self {
            Self::Inference { topic_id, .. } | Self::Register { topic_id } => *topic_id,
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inference { .. } => "insert_worker_payload",
            Self::Register { .. } => "register",
        }
    }
}

impl From<&InferenceValue> for SubmissionMessage {
    fn from(value: &InferenceValue) -> Self {
        Self::Inference {
            topic_id: value.topic_id,
            nonce: value.nonce,
            value: value.value.clone(),
        }
    }
}

/// A signed, encoded transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    /// Encoded transaction bytes (chain wire format).
    pub bytes: Vec<u8>,
    /// Account sequence the transaction was signed with.
    pub sequence: u64,
    /// Gas limit written into the fee.
    pub gas_limit: u64,
    /// Fee amount in the fee denomination.
    pub fee: u128,
}

/// Transaction hash as reported by the chain (upper-case hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl TxHash {
    /// Borrow the hash as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxHash {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Chain-side status of a previously broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Included in a block and executed successfully.
    Included {
        /// Block height of inclusion.
        height: u64,
    },
    /// The chain does not know the hash (yet).
    NotFound,
    /// Included but execution failed, or rejected outright.
    Failed {
        /// ABCI result code.
        code: u32,
        /// Chain-provided failure log.
        raw_log: String,
    },
}

// =============================================================================
// CLUSTER D: OUTCOMES
// =============================================================================

/// Final status reported by the confirmation poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    /// Included in a block.
    Included {
        /// Block height of inclusion.
        height: u64,
    },
    /// Still unknown after the whole check budget; may land later.
    NotFoundYet,
    /// Chain reported an execution failure.
    Failed {
        /// ABCI result code.
        code: u32,
        /// Chain-provided failure log.
        raw_log: String,
    },
}

impl ConfirmationStatus {
    /// Included is the only successful outcome.
    pub fn is_included(&self) -> bool {
        matches!(self, Self::Included { .. })
    }
}

/// Outcome of checking a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationResult {
    /// Hash that was polled.
    pub tx_hash: TxHash,
    /// Terminal status.
    pub status: ConfirmationStatus,
    /// Status queries performed.
    pub attempt_count: u32,
}

/// One try at submitting a value for a `(topic, nonce)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAttempt {
    /// Target topic.
    pub topic_id: TopicId,
    /// Window the submission was for.
    pub nonce: u64,
    /// Hash of the broadcast transaction, if broadcast succeeded.
    pub tx_hash: Option<TxHash>,
    /// Terminal outcome; `None` while the attempt is in flight.
    pub outcome: Option<ConfirmationResult>,
}

impl SubmissionAttempt {
    /// Start tracking an attempt for a window.
    pub fn new(topic_id: TopicId, nonce: u64) -> Self {
        Self {
            topic_id,
            nonce,
            tx_hash: None,
            outcome: None,
        }
    }

    /// Record the hash returned by the broadcast.
    pub fn broadcast(mut self, tx_hash: TxHash) -> Self {
        self.tx_hash = Some(tx_hash);
        self
    }

    /// Record the terminal confirmation outcome.
    pub fn resolve(mut self, result: ConfirmationResult) -> Self {
        self.outcome = Some(result);
        self
    }

    /// Terminal once confirmation resolved it.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}
