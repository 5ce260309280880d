//! Background runs
//!
//! `Sandbox::spawn` moves a run onto a tokio task and hands back a
//! `RunHandle` immediately, so an event loop never waits on a child.

use std::future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::runner::Sandbox;
use super::{ExecutionRequest, ExecutionResult};
use crate::error::{CodepadError, Result};

/// A run in flight
pub struct RunHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<ExecutionResult>>,
}

impl Sandbox {
    /// Start a run on the current tokio runtime
    ///
    /// Dropping the handle detaches the run; it still ends at its timeout.
    pub fn spawn(&self, request: ExecutionRequest) -> RunHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let sandbox = self.clone();
        let task = tokio::spawn(async move {
            let cancelled = async move {
                // A dropped sender means nobody can cancel any more.
                if cancel_rx.await.is_err() {
                    future::pending::<()>().await;
                }
            };
            sandbox.execute_until(request, cancelled).await
        });
        RunHandle {
            cancel: Some(cancel_tx),
            task,
        }
    }
}

impl RunHandle {
    /// Kill the child; `join` then returns its partial output
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Whether the run has ended
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to end
    pub async fn join(self) -> Result<ExecutionResult> {
        self.task
            .await
            .map_err(|err| CodepadError::TaskFailed(err.to_string()))?
    }
}
