//! Reply and status types for the reforge service.

use chrono::{DateTime, Utc};
use reforge_domain::{ActorId, Price};

/// Result of one interaction with a reforge service.
///
/// Every interaction ends in exactly one reply; rejections leave the
/// service untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ReforgeReply {
    /// Empty hand, unprocessable item, or item outside the allow-list.
    InvalidItem,
    /// A session was opened and the requester was quoted `price`.
    Quoted { price: Price },
    /// Another actor holds the session.
    BusyWithOtherActor,
    /// The requester's item is already being processed.
    BusyProcessing,
    /// The pending quote was discarded.
    Cancelled { reason: CancelReason },
    /// The requester could not pay; the quote was discarded.
    InsufficientFunds { price: Price },
    /// The wallet backend failed; the quote was discarded.
    PaymentFailed,
    /// The item was taken and will come back after `delay_secs`.
    ReforgeStarted { delay_secs: u32 },
    /// Delayed work could not be scheduled; item returned, service idle.
    SchedulingFailure,
    /// Cancel requested with no session open.
    NothingToCancel,
}

impl ReforgeReply {
    /// Contention replies: someone else is using the service, or the
    /// requester's own work is still in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::BusyWithOtherActor | Self::BusyProcessing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Explicit cancel from the requester.
    Requested,
    /// The requester came back holding a different item (or nothing).
    ItemChanged,
}

/// What happened when a scheduled cycle fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleReport {
    Succeeded,
    Failed,
    /// Processing blew up; the untouched item was handed back.
    Aborted,
    /// The cycle is no longer the running one (shut down or superseded).
    Stale,
}

/// Point-in-time view of a service's session slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceStatus {
    Idle,
    AwaitingConfirmation {
        requester: ActorId,
        price: Price,
        opened_at: DateTime<Utc>,
    },
    Running {
        requester: ActorId,
        delay_secs: u32,
        started_at: DateTime<Utc>,
    },
}

impl ServiceStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn requester(&self) -> Option<&ActorId> {
        match self {
            Self::Idle => None,
            Self::AwaitingConfirmation { requester, .. } | Self::Running { requester, .. } => {
                Some(requester)
            }
        }
    }
}
