//! Delayed work port.

use std::fmt;

use super::error::SchedulerError;

/// A unit of work run once by the scheduler.
pub type WorkUnit = Box<dyn FnOnce() + Send + 'static>;

/// Reference to scheduled work, usable to abort it before it runs.
pub struct ScheduledHandle {
    id: u64,
    abort: Option<tokio::task::AbortHandle>,
}

impl ScheduledHandle {
    pub fn new(id: u64, abort: tokio::task::AbortHandle) -> Self {
        Self {
            id,
            abort: Some(abort),
        }
    }

    /// A handle that cannot abort anything (for schedulers without
    /// cancellation support).
    pub fn detached(id: u64) -> Self {
        Self { id, abort: None }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Aborts the work if it has not started yet. Returns whether an abort
    /// was issued.
    pub fn cancel(self) -> bool {
        match self.abort {
            Some(abort) => {
                abort.abort();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for ScheduledHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledHandle")
            .field("id", &self.id)
            .field("abortable", &self.abort.is_some())
            .finish()
    }
}

/// Runs a unit of work exactly once, later, off the caller's path.
///
/// Implementations must never run `work` synchronously inside `schedule`.
#[cfg_attr(test, mockall::automock)]
pub trait DelaySchedulerPort: Send + Sync {
    fn schedule(&self, work: WorkUnit, delay_secs: u32) -> Result<ScheduledHandle, SchedulerError>;
}
