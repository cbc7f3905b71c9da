//! Tokio-backed delay scheduler.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::infrastructure::ports::{DelaySchedulerPort, ScheduledHandle, SchedulerError, WorkUnit};

/// Runs each unit of work on a spawned tokio task after sleeping for the
/// requested delay.
pub struct TokioDelayScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl TokioDelayScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Scheduler bound to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Rejected` outside a tokio runtime.
    pub fn from_current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| SchedulerError::Rejected(e.to_string()))
    }

    /// Stops accepting new work. Already scheduled work still runs.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl DelaySchedulerPort for TokioDelayScheduler {
    fn schedule(&self, work: WorkUnit, delay_secs: u32) -> Result<ScheduledHandle, SchedulerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SchedulerError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let delay = Duration::from_secs(u64::from(delay_secs));
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(task_id = id, "Delayed work firing");
            work();
        });

        tracing::debug!(task_id = id, delay_secs, "Scheduled delayed work");
        Ok(ScheduledHandle::new(id, task.abort_handle()))
    }
}
