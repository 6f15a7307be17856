//! Worker wiring and the run-until-stopped loop.

use std::future::Future;
use std::sync::Arc;

use oc_04_topic_worker::{TopicWorker, WorkerDeps};
use shared_types::TopicId;
use tracing::{info, warn};

use crate::config::GlobalConfig;
use crate::shutdown::ShutdownController;
use crate::supervisor::{TaskExit, WorkerSupervisor};

/// The offchain node: one supervised worker per configured topic.
pub struct NodeRuntime {
    supervisor: WorkerSupervisor,
    workers: Vec<Arc<TopicWorker>>,
    shutdown: ShutdownController,
}

impl NodeRuntime {
    /// Build a worker for every topic in `config`.
    pub fn new(config: &GlobalConfig, deps: &WorkerDeps) -> Self {
        let mut supervisor = WorkerSupervisor::new(config.supervisor);
        let workers: Vec<_> = config
            .topics
            .iter()
            .map(|topic| Arc::new(TopicWorker::new(topic.clone(), deps)))
            .collect();
        for worker in &workers {
            supervisor.add(worker.clone());
        }
        let (shutdown, _) = ShutdownController::new();

        Self {
            supervisor,
            workers,
            shutdown,
        }
    }

    /// Workers in config order.
    pub fn workers(&self) -> &[Arc<TopicWorker>] {
        &self.workers
    }

    /// Run until every worker ends or `stop` resolves, then wait for all
    /// workers to finish.
    pub async fn run<S>(self, stop: S) -> Vec<(TopicId, TaskExit)>
    where
        S: Future<Output = ()>,
    {
        let handle = self.supervisor.start(&self.shutdown);
        let joined = handle.join();
        tokio::pin!(joined);

        let exits = tokio::select! {
            exits = &mut joined => {
                warn!("every topic worker has stopped");
                exits
            }
            _ = stop => {
                info!("shutting down topic workers");
                self.shutdown.trigger();
                joined.await
            }
        };

        for (topic_id, exit) in &exits {
            info!(topic_id, exit = ?exit, "worker finished");
        }
        exits
    }
}
