//! Process-wide shutdown signal.
//!
//! A single `watch` channel fans the signal out to every worker task. A
//! dropped controller counts as shutdown.

use tokio::sync::watch;
use tracing::info;

/// Owner side of the shutdown channel.
#[derive(Debug)]
pub struct ShutdownController {
    tx: watch::Sender<bool>,
}

/// Receiver side, cloned into every task.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownController {
    /// New controller and its first receiver.
    pub fn new() -> (Self, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, ShutdownSignal { rx })
    }

    /// Another receiver.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal every receiver. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl ShutdownSignal {
    /// Whether shutdown was already signalled.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is signalled.
    pub async fn recv(&mut self) {
        // Err means the controller is gone.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Wait for SIGINT, or SIGTERM on unix. Returns the signal name.
pub async fn wait_for_os_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        let name = tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                "SIGINT"
            }
            _ = terminate.recv() => "SIGTERM",
        };
        info!(signal = name, "shutdown signal received");
        Ok(name)
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!(signal = "ctrl-c", "shutdown signal received");
        Ok("ctrl-c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_all_receivers() {
        let (controller, mut first) = ShutdownController::new();
        let mut second = controller.subscribe();
        assert!(!first.is_triggered());

        controller.trigger();
        controller.trigger();

        tokio::time::timeout(Duration::from_secs(1), first.recv())
            .await
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), second.recv())
            .await
            .unwrap();
        assert!(second.is_triggered());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_shutdown() {
        let (controller, _signal) = ShutdownController::new();
        controller.trigger();

        let mut late = controller.subscribe();
        tokio::time::timeout(Duration::from_secs(1), late.recv())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_controller_releases_waiters() {
        let (controller, mut signal) = ShutdownController::new();
        drop(controller);

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .unwrap();
    }
}
