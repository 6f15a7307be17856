//! # Worker Supervisor
//!
//! Starts one task per [`SupervisedTask`] and keeps it alive.
//!
//! ```text
//! outer task  (span topic_worker{topic_id})
//!   loop:
//!     inner task = task.run()      ← panics surface as JoinError
//!     select! { inner finished | shutdown }
//!     restart after restart_delay  (unless clean exit / disabled)
//! ```
//!
//! The same task object is restarted, so any state it keeps (such as the
//! handled-nonce watermark) survives the restart. Shutdown aborts the inner
//! task, which drops the worker future wherever it is suspended.

use std::any::Any;
use std::sync::Arc;

use oc_04_topic_worker::{PreflightError, SupervisedTask};
use shared_types::TopicId;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument, Span};

use crate::config::SupervisorConfig;
use crate::shutdown::{ShutdownController, ShutdownSignal};

/// Why a supervised task ended for good.
#[derive(Debug)]
pub enum TaskExit {
    /// Preflight stopped the task and no restart followed.
    Stopped(PreflightError),
    /// The task panicked and no restart followed.
    Crashed(String),
    /// Shutdown was signalled.
    Shutdown,
}

impl TaskExit {
    /// Whether the task ended because of shutdown.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown)
    }
}

/// Owns the set of per-topic tasks before they start.
pub struct WorkerSupervisor {
    config: SupervisorConfig,
    tasks: Vec<Arc<dyn SupervisedTask>>,
}

impl WorkerSupervisor {
    /// Empty supervisor.
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            tasks: Vec::new(),
        }
    }

    /// Register a task.
    pub fn add(&mut self, task: Arc<dyn SupervisedTask>) {
        self.tasks.push(task);
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Spawn every task.
    pub fn start(self, shutdown: &ShutdownController) -> SupervisorHandle {
        let handles = self
            .tasks
            .into_iter()
            .map(|task| {
                let topic_id = task.topic_id();
                let span = info_span!("topic_worker", topic_id);
                let handle =
                    tokio::spawn(supervise(task, self.config, shutdown.subscribe()).instrument(span));
                (topic_id, handle)
            })
            .collect::<Vec<_>>();

        info!(workers = handles.len(), "topic workers started");
        SupervisorHandle { handles }
    }
}

/// Running tasks.
pub struct SupervisorHandle {
    handles: Vec<(TopicId, JoinHandle<TaskExit>)>,
}

impl SupervisorHandle {
    /// Number of running tasks.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether nothing was started.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every task to end.
    pub async fn join(self) -> Vec<(TopicId, TaskExit)> {
        let mut exits = Vec::with_capacity(self.handles.len());
        for (topic_id, handle) in self.handles {
            let exit = match handle.await {
                Ok(exit) => exit,
                Err(e) => TaskExit::Crashed(e.to_string()),
            };
            exits.push((topic_id, exit));
        }
        exits
    }
}

async fn supervise(
    task: Arc<dyn SupervisedTask>,
    config: SupervisorConfig,
    mut shutdown: ShutdownSignal,
) -> TaskExit {
    let mut restarts: u32 = 0;

    loop {
        let runner = Arc::clone(&task);
        let mut inner = tokio::spawn(async move { runner.run().await }.instrument(Span::current()));

        let exit = tokio::select! {
            joined = &mut inner => match joined {
                Ok(Ok(never)) => match never {},
                Ok(Err(e)) => TaskExit::Stopped(e),
                Err(e) if e.is_panic() => TaskExit::Crashed(panic_message(e.into_panic())),
                Err(e) => TaskExit::Crashed(e.to_string()),
            },
            _ = shutdown.recv() => {
                inner.abort();
                let _ = inner.await;
                info!("worker stopped on shutdown");
                return TaskExit::Shutdown;
            }
        };

        let restartable = match &exit {
            TaskExit::Stopped(e) if e.is_clean_exit() => {
                warn!(reason = %e, "worker exited, not restarting");
                false
            }
            TaskExit::Stopped(e) => {
                error!(error = %e, "worker preflight failed");
                true
            }
            TaskExit::Crashed(message) => {
                error!(panic = %message, restarts, "CRITICAL: worker task crashed");
                true
            }
            TaskExit::Shutdown => false,
        };

        if !(restartable && config.restart_on_failure) {
            return exit;
        }

        restarts += 1;
        warn!(
            restarts,
            delay_ms = config.restart_delay.as_millis() as u64,
            "restarting worker"
        );
        tokio::select! {
            _ = tokio::time::sleep(config.restart_delay) => {}
            _ = shutdown.recv() => return TaskExit::Shutdown,
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => panic
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .unwrap_or_else(|| "non-string panic payload".to_string()),
    }
}
