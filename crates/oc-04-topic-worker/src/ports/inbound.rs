//! # Inbound Ports (Driving Ports)

use std::convert::Infallible;

use async_trait::async_trait;
use shared_types::TopicId;

use crate::domain::PreflightError;

/// A long-running per-topic task a supervisor can start and restart.
///
/// `run` only returns on a preflight failure; in normal operation it runs
/// until its future is dropped. Running it again must continue from the
/// task's own retained state.
#[async_trait]
pub trait SupervisedTask: Send + Sync {
    /// Topic this task serves.
    fn topic_id(&self) -> TopicId;

    /// Run until dropped or until preflight fails.
    async fn run(&self) -> Result<Infallible, PreflightError>;
}
