//! Background readiness check
//!
//! `ensure_ready` runs on its own task; the caller gets a handle it can
//! cancel and a completion it can await.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::InstallerError;
use crate::installer::{Installer, Readiness};
use crate::process::CommandRunner;

/// Completion notification sent back by the worker
#[derive(Debug)]
pub enum Completion {
    Ready(Readiness),
    Failed(InstallerError),
    Cancelled,
    TimedOut,
}

/// Handle to a running readiness check
pub struct ReadyTask {
    cancel: CancellationToken,
    done: oneshot::Receiver<Completion>,
}

impl ReadyTask {
    /// Token that aborts the task (and any process it is waiting on)
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the completion notification
    pub async fn completion(self) -> Completion {
        // The sender only disappears if the task panicked or was aborted
        self.done.await.unwrap_or(Completion::Cancelled)
    }
}

/// Spawn `ensure_ready` on the runtime
///
/// `cancel` should be the token the installer's runner listens to, so
/// cancelling the task also kills an in-flight install. The whole check is
/// bounded by `deadline`.
pub fn spawn_ensure_ready<R>(
    installer: Arc<Installer<R>>,
    cancel: CancellationToken,
    deadline: Duration,
) -> ReadyTask
where
    R: CommandRunner + 'static,
{
    let (tx, done) = oneshot::channel();
    let token = cancel.clone();

    tokio::spawn(async move {
        let completion = tokio::select! {
            result = installer.ensure_ready() => match result {
                Ok(readiness) => Completion::Ready(readiness),
                Err(err) if token.is_cancelled() => {
                    tracing::debug!("readiness check cancelled: {err}");
                    Completion::Cancelled
                }
                Err(err) => Completion::Failed(err),
            },
            () = token.cancelled() => Completion::Cancelled,
            () = tokio::time::sleep(deadline) => {
                token.cancel();
                Completion::TimedOut
            }
        };
        tracing::debug!(?completion, "readiness check finished");
        // Receiver may have been dropped; nothing left to notify
        let _ = tx.send(completion);
    });

    ReadyTask { cancel, done }
}
