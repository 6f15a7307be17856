//! # Supervision
//!
//! Fault injection around real topic workers: a crashing worker is
//! restarted without forgetting handled windows, its siblings keep going,
//! and shutdown interrupts every worker promptly.

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use node_runtime::{NodeRuntime, ShutdownController, TaskExit, WorkerSupervisor};
    use oc_01_chain_client::MockChainClient;
    use oc_02_inference_client::MockInferenceClient;
    use oc_03_tx_builder::MockTxSigner;
    use oc_04_topic_worker::{PreflightError, SupervisedTask, TopicWorker};
    use shared_types::{TopicConfig, TopicId};
    use tokio::time::Instant;

    use crate::fixtures::{deps, global_config, topic};

    /// Runs the worker normally, except that its first run panics after
    /// `crash_after`.
    struct CrashOnce {
        worker: Arc<TopicWorker>,
        crash_after: Duration,
        runs: AtomicU32,
    }

    #[async_trait]
    impl SupervisedTask for CrashOnce {
        fn topic_id(&self) -> TopicId {
            self.worker.topic_id()
        }

        async fn run(&self) -> Result<Infallible, PreflightError> {
            if self.runs.fetch_add(1, Ordering::SeqCst) > 0 {
                return self.worker.run_forever().await;
            }
            tokio::select! {
                result = self.worker.run_forever() => result,
                _ = tokio::time::sleep(self.crash_after) => panic!("injected fault"),
            }
        }
    }

    fn mock_node() -> (Arc<MockChainClient>, oc_04_topic_worker::WorkerDeps) {
        let chain = Arc::new(MockChainClient::new());
        let deps = deps(
            &chain,
            Arc::new(MockInferenceClient::with_value("3.0")),
            Arc::new(MockTxSigner::new("allo1mock")),
        );
        (chain, deps)
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_keeps_handled_windows_and_siblings_run() {
        let (chain, deps) = mock_node();
        chain.set_open_nonce(Some(7));
        let crashing = Arc::new(CrashOnce {
            worker: Arc::new(TopicWorker::new(topic(1), &deps)),
            crash_after: Duration::from_secs(5),
            runs: AtomicU32::new(0),
        });
        let sibling = Arc::new(TopicWorker::new(topic(2), &deps));

        let config = global_config(vec![topic(1), topic(2)]);
        let (controller, _signal) = ShutdownController::new();
        let mut supervisor = WorkerSupervisor::new(config.supervisor);
        supervisor.add(crashing.clone());
        supervisor.add(sibling.clone());
        let handle = supervisor.start(&controller);

        tokio::time::sleep(Duration::from_secs(20)).await;
        controller.trigger();
        let exits = handle.join().await;

        assert_eq!(crashing.runs.load(Ordering::SeqCst), 2);
        assert_eq!(crashing.worker.tracker().last_handled(), Some(7));
        assert_eq!(sibling.tracker().last_handled(), Some(7));
        // One submission per topic: the restart did not resubmit window 7.
        assert_eq!(chain.submit_calls(), 2);
        assert!(exits.iter().all(|(_, exit)| exit.is_shutdown()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_long_ticks() {
        let (chain, deps) = mock_node();
        let sleepy: Vec<TopicConfig> = (1..=3)
            .map(|id| TopicConfig {
                nonce_fetch_freq: Duration::from_secs(3600),
                ..topic(id)
            })
            .collect();
        let runtime = NodeRuntime::new(&global_config(sleepy), &deps);

        let started = Instant::now();
        let exits = runtime.run(tokio::time::sleep(Duration::from_secs(5))).await;

        assert!(started.elapsed() < Duration::from_secs(6));
        assert_eq!(exits.len(), 3);
        assert!(exits.iter().all(|(_, exit)| exit.is_shutdown()));
        assert_eq!(chain.nonce_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactive_topics_end_the_run() {
        let (chain, deps) = mock_node();
        chain.set_topic_active(false);
        let runtime = NodeRuntime::new(&global_config(vec![topic(1), topic(2)]), &deps);

        let exits = runtime.run(std::future::pending()).await;

        assert_eq!(exits.len(), 2);
        assert!(exits.iter().all(|(_, exit)| matches!(
            exit,
            TaskExit::Stopped(PreflightError::TopicInactive { .. })
        )));
        assert_eq!(chain.nonce_calls(), 0);
    }
}
