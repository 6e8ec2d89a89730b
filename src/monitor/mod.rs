//! Monitor driver: repeated selection cycles until cancelled.

use crate::engine::{SelectionEngine, SelectionVerdict};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs the selection engine on a fixed interval until the cancellation
/// token fires.
pub struct Monitor<'a> {
    engine: &'a SelectionEngine<'a>,
    interval: Duration,
    dry_run: bool,
}

impl<'a> Monitor<'a> {
    pub fn new(engine: &'a SelectionEngine<'a>, interval: Duration, dry_run: bool) -> Self {
        Self {
            engine,
            interval,
            dry_run,
        }
    }

    /// Run cycles until cancelled. The token is checked at the loop top and
    /// again while waiting, so an in-flight cycle always completes and the
    /// loop still exits promptly once it returns.
    pub async fn run<F>(&self, cancel: CancellationToken, mut on_cycle: F)
    where
        F: FnMut(Option<SelectionVerdict>),
    {
        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            dry_run = self.dry_run,
            "monitor started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let verdict = self.engine.evaluate(self.dry_run).await;
            on_cycle(verdict);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("monitor stopped");
    }
}

/// Wait for SIGINT or SIGTERM, then cancel the token.
pub async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_token_stops_wait() {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(Duration::from_secs(5)) => {
                panic!("cancellation did not propagate");
            }
        }

        handle.await.unwrap();
    }
}
