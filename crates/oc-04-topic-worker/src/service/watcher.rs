//! Open-nonce polling.
//!
//! The watcher retries forever at its tick period. It is not a
//! [`RetryPolicy`](shared_types::RetryPolicy): it ends on a new window or a
//! failed gate, never on an exhausted budget.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use node_telemetry::log_stage;
use oc_01_chain_client::ChainClient;
use shared_types::{Nonce, TopicId};

use crate::domain::{NonceTracker, Stage};

/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherState {
    /// No unhandled window is open.
    Waiting,
    /// A new window was observed and claimed.
    Found(Nonce),
}

/// Polls the chain for a topic's open nonce.
pub struct NonceWatcher {
    topic_id: TopicId,
    tick: Duration,
    chain: Arc<dyn ChainClient>,
}

impl NonceWatcher {
    /// Watcher polling every `tick`.
    pub fn new(topic_id: TopicId, tick: Duration, chain: Arc<dyn ChainClient>) -> Self {
        Self {
            topic_id,
            tick,
            chain,
        }
    }

    /// Tick period.
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Query once. A new nonce is claimed in `tracker` before returning.
    pub async fn poll_once(&self, tracker: &NonceTracker) -> WatcherState {
        match self.chain.get_open_nonce(self.topic_id).await {
            Ok(Some(value)) if tracker.try_claim(value) => {
                log_stage!(info, Stage::Watch.as_str(), self.topic_id, "new nonce", nonce = value);
                WatcherState::Found(Nonce::observed(self.topic_id, value))
            }
            Ok(Some(value)) => {
                log_stage!(
                    debug,
                    Stage::Watch.as_str(),
                    self.topic_id,
                    "open nonce already handled",
                    nonce = value
                );
                WatcherState::Waiting
            }
            Ok(None) => {
                log_stage!(debug, Stage::Watch.as_str(), self.topic_id, "no open nonce");
                WatcherState::Waiting
            }
            Err(e) => {
                log_stage!(
                    warn,
                    Stage::Watch.as_str(),
                    self.topic_id,
                    "nonce query failed, retrying next tick",
                    error = %e
                );
                WatcherState::Waiting
            }
        }
    }

    /// Poll immediately, then once per tick, until a new nonce appears.
    ///
    /// `gate` runs before every poll; its error ends the wait.
    pub async fn wait_for_nonce<E, G, Fut>(
        &self,
        tracker: &NonceTracker,
        mut gate: G,
    ) -> Result<Nonce, E>
    where
        G: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        loop {
            gate().await?;
            if let WatcherState::Found(nonce) = self.poll_once(tracker).await {
                return Ok(nonce);
            }
            tokio::time::sleep(self.tick).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_01_chain_client::{ChainError, MockChainClient};
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    async fn open() -> Result<(), ()> {
        Ok(())
    }

    fn watcher(chain: Arc<MockChainClient>) -> NonceWatcher {
        NonceWatcher::new(1, Duration::from_secs(5), chain)
    }

    #[tokio::test]
    async fn test_same_nonce_not_reemitted() {
        let chain = Arc::new(MockChainClient::new());
        chain.set_open_nonce(Some(7));
        let watcher = watcher(chain);
        let tracker = NonceTracker::new();

        assert!(matches!(
            watcher.poll_once(&tracker).await,
            WatcherState::Found(ref n) if n.value == 7 && n.topic_id == 1
        ));
        assert_eq!(tracker.last_handled(), Some(7));
        assert_eq!(watcher.poll_once(&tracker).await, WatcherState::Waiting);
    }

    #[tokio::test]
    async fn test_query_error_keeps_waiting() {
        let chain = Arc::new(MockChainClient::new());
        chain.push_nonce(Err(ChainError::Transport("reset".into())));
        let watcher = watcher(chain);
        let tracker = NonceTracker::new();

        assert_eq!(watcher.poll_once(&tracker).await, WatcherState::Waiting);
        assert_eq!(tracker.last_handled(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_polls_at_tick_cadence() {
        let chain = Arc::new(MockChainClient::new());
        chain.push_nonce(Ok(None));
        chain.push_nonce(Err(ChainError::Http { status: 503 }));
        chain.push_nonce(Ok(Some(3)));
        chain.push_nonce(Ok(Some(12)));
        let tracker = NonceTracker::new();
        tracker.try_claim(3);
        let watcher = watcher(chain.clone());

        let started = Instant::now();
        let nonce = watcher.wait_for_nonce(&tracker, open).await.unwrap();

        assert_eq!(nonce.value, 12);
        assert_eq!(chain.nonce_calls(), 4);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(15) && elapsed < Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_gate_stops_polling() {
        let chain = Arc::new(MockChainClient::new());
        let watcher = watcher(chain.clone());
        let tracker = NonceTracker::new();
        let gates = AtomicU32::new(0);

        let started = Instant::now();
        let result = watcher
            .wait_for_nonce(&tracker, || {
                let n = gates.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Ok(())
                    } else {
                        Err("topic closed")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "topic closed");
        assert_eq!(chain.nonce_calls(), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(15) && elapsed < Duration::from_secs(16));
    }
}
