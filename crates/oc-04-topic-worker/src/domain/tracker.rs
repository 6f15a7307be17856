//! Per-topic handled-nonce watermark.

use std::sync::atomic::{AtomicU64, Ordering};

/// Highest nonce a topic has already handed off.
///
/// `0` means nothing handled yet; the chain never opens a window at height 0.
#[derive(Debug, Default)]
pub struct NonceTracker {
    last: AtomicU64,
}

impl NonceTracker {
    /// Fresh tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last handled nonce, if any.
    pub fn last_handled(&self) -> Option<u64> {
        match self.last.load(Ordering::Acquire) {
            0 => None,
            n => Some(n),
        }
    }

    /// Whether `nonce` would be accepted by [`NonceTracker::try_claim`].
    pub fn is_new(&self, nonce: u64) -> bool {
        nonce > self.last.load(Ordering::Acquire)
    }

    /// Record `nonce` as handled if it is above the watermark.
    ///
    /// Returns `false` for anything at or below the watermark.
    pub fn try_claim(&self, nonce: u64) -> bool {
        self.last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (nonce > current).then_some(nonce)
            })
            .is_ok()
    }
}
