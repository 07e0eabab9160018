//! Cooperative shutdown signalling
//!
//! A watch-channel pair: the handle flips the flag once, every receiver can
//! poll it between pipeline steps or race it against a sleep so retry
//! backoff windows exit early instead of sleeping through.

use tokio::sync::watch;

/// Sending side; trigger once, from a signal handler or test
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Signal shutdown to every receiver
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiving side; cheap to clone into each component
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Whether shutdown has been requested
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when shutdown is requested; immediately if it already was
    pub async fn wait(&mut self) {
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                // Handle dropped without triggering: stay quiet forever
                // rather than spuriously shutting the run down.
                std::future::pending::<()>().await;
            }
        }
    }

    /// A receiver that never fires, for runs without signal wiring
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }
}

/// Create a connected handle/receiver pair
pub fn channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_is_observed() {
        let (handle, shutdown) = channel();
        assert!(!shutdown.is_triggered());
        handle.trigger();
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn wait_resolves_after_trigger() {
        let (handle, mut shutdown) = channel();
        handle.trigger();
        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .expect("wait should resolve once triggered");
    }

    #[tokio::test]
    async fn wait_races_cleanly_against_sleep() {
        let (handle, mut shutdown) = channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.trigger();
        });
        tokio::select! {
            _ = shutdown.wait() => {}
            _ = tokio::time::sleep(Duration::from_secs(5)) => {
                panic!("shutdown should win the race");
            }
        }
    }

    #[tokio::test]
    async fn never_is_not_triggered() {
        let shutdown = Shutdown::never();
        assert!(!shutdown.is_triggered());
    }
}
