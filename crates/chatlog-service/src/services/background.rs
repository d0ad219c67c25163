//! Detached background work
//!
//! Side effects that must never hold up or fail a ledger write (attachment
//! copies, deletion notices) run here. Failures go to the log and are not
//! retried.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// Executor for fire-and-forget tasks
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` without waiting for it; an `Err` is logged under `name`
    pub fn spawn_detached<F, E>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let mut tasks = self.tasks.lock();
        // Reap whatever already finished so the set does not grow unbounded
        while let Some(result) = tasks.try_join_next() {
            log_join_error(result);
        }
        tasks.spawn(async move {
            match task.await {
                Ok(()) => debug!(task = name, "Background task finished"),
                Err(e) => warn!(task = name, error = %e, "Background task failed"),
            }
        });
    }

    /// Number of tasks not yet reaped
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Wait until every spawned task, including ones spawned meanwhile, has
    /// finished
    pub async fn drain(&self) {
        loop {
            let mut batch = std::mem::take(&mut *self.tasks.lock());
            if batch.is_empty() {
                return;
            }
            while let Some(result) = batch.join_next().await {
                log_join_error(result);
            }
        }
    }
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Background task panicked");
    }
}

impl std::fmt::Debug for BackgroundTasks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundTasks")
            .field("pending", &self.pending())
            .finish()
    }
}
