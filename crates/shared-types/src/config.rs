//! # Resolved Configuration Types
//!
//! Immutable, fully-defaulted settings handed to the topic workers. Raw
//! document parsing and defaulting happen once at startup in `node-runtime`;
//! nothing downstream inspects optional fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entities::TopicId;

/// Default seconds between unfulfilled-nonce polls.
pub const DEFAULT_NONCE_FETCH_FREQ_SECS: u64 = 5;
/// Default inference fetch attempts per window.
pub const DEFAULT_INFERENCE_FETCH_RETRIES: u32 = 5;
/// Default seconds between inference fetch attempts.
pub const DEFAULT_INFERENCE_FETCH_RETRY_FREQ_SECS: u64 = 3;
/// Default transaction status checks per broadcast.
pub const DEFAULT_TX_CHECK_RETRIES: u32 = 10;
/// Default seconds between transaction status checks.
pub const DEFAULT_TX_CHECK_FREQ_SECS: u64 = 3;

/// Static configuration for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Topic to submit inferences for.
    pub topic_id: TopicId,
    /// Endpoint answering with the inference value.
    pub inference_url: String,
    /// Tick period of the nonce watcher.
    pub nonce_fetch_freq: Duration,
    /// Maximum inference fetch attempts per window (>= 1).
    pub inference_fetch_retries: u32,
    /// Delay between inference fetch attempts.
    pub inference_fetch_retry_freq: Duration,
}

impl TopicConfig {
    /// Topic config with default cadences.
    pub fn new(topic_id: TopicId, inference_url: impl Into<String>) -> Self {
        Self {
            topic_id,
            inference_url: inference_url.into(),
            nonce_fetch_freq: Duration::from_secs(DEFAULT_NONCE_FETCH_FREQ_SECS),
            inference_fetch_retries: DEFAULT_INFERENCE_FETCH_RETRIES,
            inference_fetch_retry_freq: Duration::from_secs(
                DEFAULT_INFERENCE_FETCH_RETRY_FREQ_SECS,
            ),
        }
    }
}

/// Confirmation polling budget shared by every topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxCheckConfig {
    /// Maximum status checks per broadcast transaction (>= 1).
    pub retries: u32,
    /// Delay between status checks.
    pub freq: Duration,
}

impl Default for TxCheckConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_TX_CHECK_RETRIES,
            freq: Duration::from_secs(DEFAULT_TX_CHECK_FREQ_SECS),
        }
    }
}
