//! The single session a reforge service may hold.

use chrono::{DateTime, Utc};
use reforge_domain::{ActorId, ItemSnapshot, Price};

use crate::infrastructure::ports::ScheduledHandle;

use super::types::ServiceStatus;

/// One interaction cycle, from quote to delivered outcome.
#[derive(Debug)]
pub(super) struct Session {
    /// Per-service sequence number; completions for other cycles are ignored.
    pub(super) cycle: u64,
    pub(super) requester: ActorId,
    pub(super) opened_at: DateTime<Utc>,
    pub(super) phase: SessionPhase,
}

#[derive(Debug)]
pub(super) enum SessionPhase {
    /// Quoted; the item is still in the requester's hand.
    AwaitingConfirmation {
        quoted_item: ItemSnapshot,
        price: Price,
    },
    /// Paid and taken; delayed work is in flight.
    Running {
        pending_item: ItemSnapshot,
        price: Price,
        handle: ScheduledHandle,
        delay_secs: u32,
        started_at: DateTime<Utc>,
    },
}

impl Session {
    pub(super) fn status(&self) -> ServiceStatus {
        match &self.phase {
            SessionPhase::AwaitingConfirmation { price, .. } => {
                ServiceStatus::AwaitingConfirmation {
                    requester: self.requester.clone(),
                    price: *price,
                    opened_at: self.opened_at,
                }
            }
            SessionPhase::Running {
                delay_secs,
                started_at,
                ..
            } => ServiceStatus::Running {
                requester: self.requester.clone(),
                delay_secs: *delay_secs,
                started_at: *started_at,
            },
        }
    }
}
