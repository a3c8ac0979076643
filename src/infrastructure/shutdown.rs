//! Graceful Shutdown
//!
//! Stops accepting new texts on a signal and lets in-flight resolution runs
//! finish before the process exits.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

/// Shutdown coordinator.
///
/// Cheap to clone; every clone shares the same state.
#[derive(Clone)]
pub struct ShutdownController {
    /// Whether shutdown has been initiated
    initiated: Arc<AtomicBool>,
    /// Resolution runs currently executing
    active_runs: Arc<AtomicUsize>,
    /// Broadcast channel for the shutdown signal
    shutdown_tx: broadcast::Sender<()>,
    /// Woken whenever the last run finishes
    drained: Arc<Notify>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            initiated: Arc::new(AtomicBool::new(false)),
            active_runs: Arc::new(AtomicUsize::new(0)),
            shutdown_tx,
            drained: Arc::new(Notify::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiate shutdown. Later calls are no-ops.
    pub fn shutdown(&self) {
        if !self.initiated.swap(true, Ordering::SeqCst) {
            tracing::info!(active_runs = self.active_runs(), "initiating graceful shutdown");
            let _ = self.shutdown_tx.send(());
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.initiated.load(Ordering::SeqCst)
    }

    /// Future that resolves once shutdown has been initiated.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.subscribe();
        if self.is_shutdown() {
            return;
        }
        let _ = rx.recv().await;
    }

    pub fn active_runs(&self) -> usize {
        self.active_runs.load(Ordering::SeqCst)
    }

    /// Mark a resolution run as started. The returned guard ends it on drop.
    pub fn run_guard(&self) -> RunGuard {
        self.active_runs.fetch_add(1, Ordering::SeqCst);
        RunGuard {
            controller: self.clone(),
        }
    }

    fn run_ended(&self) {
        if self.active_runs.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Wait until no run is executing, up to `timeout`.
    ///
    /// Returns false if runs were still active when the timeout expired.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let drain = async {
            loop {
                let notified = self.drained.notified();
                if self.active_runs() == 0 {
                    return;
                }
                notified.await;
            }
        };

        match tokio::time::timeout(timeout, drain).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    "drain timeout: {} resolution runs still active",
                    self.active_runs()
                );
                false
            }
        }
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks one in-flight resolution run.
pub struct RunGuard {
    controller: ShutdownController,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.controller.run_ended();
    }
}

/// Resolve on Ctrl+C or SIGTERM, then initiate shutdown.
///
/// A handler that fails to install is logged and treated as never firing.
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn shutdown_signal(controller: ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C"),
        _ = terminate => tracing::info!("received SIGTERM"),
        _ = controller.wait_for_shutdown() => {}
    }

    controller.shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_controller_new() {
        let controller = ShutdownController::new();
        assert!(!controller.is_shutdown());
        assert_eq!(controller.active_runs(), 0);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let controller = ShutdownController::default();
        controller.shutdown();
        controller.shutdown();
        assert!(controller.is_shutdown());
    }

    #[test]
    fn test_run_guards_count() {
        let controller = ShutdownController::new();

        let a = controller.run_guard();
        let b = controller.run_guard();
        assert_eq!(controller.active_runs(), 2);

        drop(a);
        assert_eq!(controller.active_runs(), 1);
        drop(b);
        assert_eq!(controller.active_runs(), 0);
    }

    #[test]
    fn test_clone_shares_state() {
        let controller = ShutdownController::new();
        let cloned = controller.clone();

        let _guard = controller.run_guard();
        assert_eq!(cloned.active_runs(), 1);

        cloned.shutdown();
        assert!(controller.is_shutdown());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_after_signal() {
        let controller = ShutdownController::new();
        controller.shutdown();

        let done =
            tokio::time::timeout(Duration::from_millis(100), controller.wait_for_shutdown()).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn test_subscribe_receives_shutdown() {
        let controller = ShutdownController::new();
        let mut rx = controller.subscribe();

        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wait_for_drain_immediate() {
        let controller = ShutdownController::new();
        assert!(controller.wait_for_drain(Duration::from_millis(50)).await);
    }

    #[tokio::test]
    async fn test_wait_for_drain_with_active_run() {
        let controller = ShutdownController::new();
        let guard = controller.run_guard();
        controller.shutdown();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            drop(guard);
        });

        assert!(controller.wait_for_drain(Duration::from_millis(500)).await);
    }

    #[tokio::test]
    async fn test_wait_for_drain_timeout() {
        let controller = ShutdownController::new();
        let _guard = controller.run_guard();

        assert!(!controller.wait_for_drain(Duration::from_millis(30)).await);
    }
}
