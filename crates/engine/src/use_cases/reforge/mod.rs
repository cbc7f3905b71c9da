//! Reforge use case.
//!
//! `ReforgeService` is the session controller for one service instance:
//! it admits a single requester at a time, quotes, takes the item on
//! confirmation, schedules the delayed outcome, and hands the result back.
//!
//! All state lives in one session slot behind one mutex. Interactions and
//! scheduled completions both go through that lock, and every collaborator
//! call made for a transition happens inside it.

mod session;
mod types;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use reforge_domain::{
    render, ActorId, ItemSnapshot, ItemType, ModifierCatalog, OutcomeEngine, Price, ServiceConfig,
    ServiceId,
};

use crate::infrastructure::ports::{
    ClockPort, DelaySchedulerPort, DeliveryPort, EligibilityPort, NotifierPort, PaymentError,
    PricingPort, RandomPort, WalletPort, WorkUnit,
};

use session::{Session, SessionPhase};
pub use types::{CancelReason, CycleReport, ReforgeReply, ServiceStatus};

/// Collaborators a reforge service talks to.
#[derive(Clone)]
pub struct ReforgeDeps {
    pub eligibility: Arc<dyn EligibilityPort>,
    pub pricing: Arc<dyn PricingPort>,
    pub wallet: Arc<dyn WalletPort>,
    pub notifier: Arc<dyn NotifierPort>,
    pub delivery: Arc<dyn DeliveryPort>,
    pub scheduler: Arc<dyn DelaySchedulerPort>,
    pub random: Arc<dyn RandomPort>,
    pub clock: Arc<dyn ClockPort>,
    pub catalog: Arc<dyn ModifierCatalog>,
}

/// Session controller for one service instance.
///
/// Dropping the last handle behaves like [`ReforgeService::shutdown`]: a
/// pending item is refunded and delivered back to its requester.
pub struct ReforgeService {
    id: ServiceId,
    config: Arc<ServiceConfig>,
    deps: ReforgeDeps,
    slot: Mutex<Option<Session>>,
    next_cycle: AtomicU64,
    this: Weak<ReforgeService>,
}

impl ReforgeService {
    pub fn new(id: ServiceId, config: Arc<ServiceConfig>, deps: ReforgeDeps) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            id,
            config,
            deps,
            slot: Mutex::new(None),
            next_cycle: AtomicU64::new(1),
            this: this.clone(),
        })
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Routes a click from `actor`, who holds `hand`.
    ///
    /// On confirmation the item is moved out of `hand`; if scheduling then
    /// fails it is put back.
    pub fn handle_interaction(
        &self,
        actor: &ActorId,
        hand: &mut Option<ItemSnapshot>,
    ) -> ReforgeReply {
        let mut slot = self.lock_slot();
        let (next, reply) = match slot.take() {
            None => self.open(actor, hand.as_ref()),
            Some(session) => self.advance(session, actor, hand),
        };
        *slot = next;
        reply
    }

    /// Explicit cancel from `actor`. Only the bound requester can cancel,
    /// and only before confirming.
    pub fn cancel(&self, actor: &ActorId) -> ReforgeReply {
        let mut slot = self.lock_slot();
        let Some(session) = slot.take() else {
            return ReforgeReply::NothingToCancel;
        };

        if session.requester != *actor {
            self.say(actor, &self.config.messages().busy_with_player, None, None);
            *slot = Some(session);
            return ReforgeReply::BusyWithOtherActor;
        }
        if matches!(session.phase, SessionPhase::Running { .. }) {
            self.say(actor, &self.config.messages().busy_with_reforge, None, None);
            *slot = Some(session);
            return ReforgeReply::BusyProcessing;
        }

        tracing::info!(
            service = %self.id,
            actor = %actor,
            cycle = session.cycle,
            "Reforge quote cancelled"
        );
        ReforgeReply::Cancelled {
            reason: CancelReason::Requested,
        }
    }

    pub fn snapshot(&self) -> ServiceStatus {
        self.lock_slot()
            .as_ref()
            .map(Session::status)
            .unwrap_or(ServiceStatus::Idle)
    }

    /// Aborts in-flight work and hands any pending item back, refunded.
    /// Returns the requester whose item was returned.
    pub fn shutdown(&self) -> Option<ActorId> {
        let mut slot = self.lock_slot();
        let session = slot.take()?;
        match session.phase {
            SessionPhase::AwaitingConfirmation { .. } => None,
            SessionPhase::Running {
                pending_item,
                price,
                handle,
                ..
            } => {
                handle.cancel();
                if let Err(e) = self.deps.wallet.refund(&session.requester, price) {
                    tracing::error!(
                        actor = %session.requester,
                        error = %e,
                        "Refund failed during shutdown"
                    );
                }
                tracing::warn!(
                    service = %self.id,
                    actor = %session.requester,
                    cycle = session.cycle,
                    "Shutting down with a reforge in flight; returning item"
                );
                self.deps.delivery.deliver(&session.requester, pending_item);
                Some(session.requester)
            }
        }
    }

    /// Runs the outcome for `cycle` and returns the item. Called only by the
    /// scheduled work unit.
    pub(crate) fn complete_cycle(&self, cycle: u64) -> CycleReport {
        let mut slot = self.lock_slot();
        // The slot is emptied before any processing so a failure below can
        // never leave the service stuck in Running.
        let (requester, pending_item) = match slot.take() {
            Some(Session {
                cycle: running,
                requester,
                phase: SessionPhase::Running { pending_item, .. },
                ..
            }) if running == cycle => (requester, pending_item),
            other => {
                *slot = other;
                tracing::warn!(
                    service = %self.id,
                    cycle,
                    "Ignoring completion for a cycle that is not running"
                );
                return CycleReport::Stale;
            }
        };

        let item_type = pending_item.item_type();
        let untouched = pending_item.clone();
        let computed = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut rng = self.deps.random.outcome_rng();
            OutcomeEngine::new(self.deps.catalog.as_ref()).process(
                pending_item,
                self.config.fail_chance(),
                rng.as_mut(),
            )
        }));

        let messages = self.config.messages();
        let (report, template, item) = match computed {
            Ok(outcome) => {
                tracing::info!(
                    service = %self.id,
                    actor = %requester,
                    cycle,
                    succeeded = outcome.succeeded,
                    item = %outcome.item,
                    "Reforge finished"
                );
                let (report, template) = if outcome.succeeded {
                    (CycleReport::Succeeded, &messages.successful_reforge)
                } else {
                    (CycleReport::Failed, &messages.fail_reforge)
                };
                (report, template, outcome.item)
            }
            Err(_) => {
                tracing::error!(
                    service = %self.id,
                    actor = %requester,
                    cycle,
                    "Reforge processing panicked; returning item untouched"
                );
                (CycleReport::Aborted, &messages.fail_reforge, untouched)
            }
        };

        // The slot is already empty; a panicking collaborator must not
        // unwind into the scheduler.
        let notified = panic::catch_unwind(AssertUnwindSafe(|| {
            self.say(&requester, template, None, Some(item_type));
        }));
        let delivered = panic::catch_unwind(AssertUnwindSafe(|| {
            self.deps.delivery.deliver(&requester, item);
        }));
        match (notified, delivered) {
            (Ok(()), Ok(())) => report,
            (notified, delivered) => {
                tracing::error!(
                    service = %self.id,
                    actor = %requester,
                    cycle,
                    notified = notified.is_ok(),
                    delivered = delivered.is_ok(),
                    "Handing back reforged item panicked"
                );
                CycleReport::Aborted
            }
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Idle -> AwaitingConfirmation, if the item is admissible.
    fn open(
        &self,
        actor: &ActorId,
        hand: Option<&ItemSnapshot>,
    ) -> (Option<Session>, ReforgeReply) {
        let messages = self.config.messages();
        let Some(item) = hand.filter(|item| self.is_eligible(item)) else {
            tracing::debug!(service = %self.id, actor = %actor, "Rejected ineligible item");
            self.say(
                actor,
                &messages.invalid_item,
                None,
                hand.map(ItemSnapshot::item_type),
            );
            return (None, ReforgeReply::InvalidItem);
        };

        let price = self.deps.pricing.quote(item);
        let cycle = self.next_cycle.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            service = %self.id,
            actor = %actor,
            cycle,
            price = %price,
            item = %item,
            "Reforge quoted"
        );
        self.say(actor, &messages.cost, Some(price), Some(item.item_type()));

        let session = Session {
            cycle,
            requester: actor.clone(),
            opened_at: self.deps.clock.now(),
            phase: SessionPhase::AwaitingConfirmation {
                quoted_item: item.clone(),
                price,
            },
        };
        (Some(session), ReforgeReply::Quoted { price })
    }

    /// A click while a session exists.
    fn advance(
        &self,
        session: Session,
        actor: &ActorId,
        hand: &mut Option<ItemSnapshot>,
    ) -> (Option<Session>, ReforgeReply) {
        let messages = self.config.messages();
        if session.requester != *actor {
            tracing::debug!(
                service = %self.id,
                actor = %actor,
                holder = %session.requester,
                "Busy with another actor"
            );
            self.say(actor, &messages.busy_with_player, None, None);
            return (Some(session), ReforgeReply::BusyWithOtherActor);
        }
        if matches!(session.phase, SessionPhase::Running { .. }) {
            self.say(actor, &messages.busy_with_reforge, None, None);
            return (Some(session), ReforgeReply::BusyProcessing);
        }

        let confirmed_price = match &session.phase {
            SessionPhase::AwaitingConfirmation { quoted_item, price }
                if hand.as_ref() == Some(quoted_item) =>
            {
                Some(*price)
            }
            _ => None,
        };
        let Some(price) = confirmed_price else {
            tracing::info!(
                service = %self.id,
                actor = %actor,
                cycle = session.cycle,
                "Held item changed; quote cancelled"
            );
            let held = hand.as_ref().map(ItemSnapshot::item_type);
            self.say(actor, &messages.item_changed, None, held);
            return (
                None,
                ReforgeReply::Cancelled {
                    reason: CancelReason::ItemChanged,
                },
            );
        };

        self.confirm(session, price, hand)
    }

    /// AwaitingConfirmation -> Running: pay, take the item, schedule.
    fn confirm(
        &self,
        session: Session,
        price: Price,
        hand: &mut Option<ItemSnapshot>,
    ) -> (Option<Session>, ReforgeReply) {
        let messages = self.config.messages();
        let actor = &session.requester;

        if let Err(e) = self.deps.wallet.withdraw(actor, price) {
            return match e {
                PaymentError::InsufficientFunds { .. } => {
                    tracing::info!(
                        service = %self.id,
                        actor = %actor,
                        price = %price,
                        "Requester cannot afford reforge"
                    );
                    self.say(actor, &messages.insufficient_funds, Some(price), None);
                    (None, ReforgeReply::InsufficientFunds { price })
                }
                PaymentError::Backend(_) => {
                    tracing::error!(
                        service = %self.id,
                        actor = %actor,
                        error = %e,
                        "Wallet backend failed"
                    );
                    self.say(actor, &messages.fail_reforge, Some(price), None);
                    (None, ReforgeReply::PaymentFailed)
                }
            };
        }

        let Some(item) = hand.take() else {
            // Admission compared the hand to the quoted item, so it is never empty here
            self.refund(actor, price);
            return (
                None,
                ReforgeReply::Cancelled {
                    reason: CancelReason::ItemChanged,
                },
            );
        };

        let bounds = self.config.delays();
        let delay_secs = self
            .deps
            .random
            .gen_range(bounds.min_secs(), bounds.max_secs());
        let cycle = session.cycle;
        let this = self.this.clone();
        let work: WorkUnit = Box::new(move || {
            if let Some(service) = this.upgrade() {
                service.complete_cycle(cycle);
            }
        });

        match self.deps.scheduler.schedule(work, delay_secs) {
            Ok(handle) => {
                tracing::info!(
                    service = %self.id,
                    actor = %actor,
                    cycle,
                    delay_secs,
                    "Reforge started"
                );
                self.say(
                    actor,
                    &messages.start_reforge,
                    Some(price),
                    Some(item.item_type()),
                );
                let running = Session {
                    phase: SessionPhase::Running {
                        pending_item: item,
                        price,
                        handle,
                        delay_secs,
                        started_at: self.deps.clock.now(),
                    },
                    ..session
                };
                (Some(running), ReforgeReply::ReforgeStarted { delay_secs })
            }
            Err(e) => {
                tracing::error!(
                    service = %self.id,
                    actor = %actor,
                    cycle,
                    error = %e,
                    "Failed to schedule reforge; resetting"
                );
                let item_type = item.item_type();
                *hand = Some(item);
                self.refund(actor, price);
                self.say(actor, &messages.fail_reforge, Some(price), Some(item_type));
                (None, ReforgeReply::SchedulingFailure)
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn is_eligible(&self, item: &ItemSnapshot) -> bool {
        self.deps.eligibility.is_processable(item) && self.config.allows(item.item_type())
    }

    fn refund(&self, actor: &ActorId, price: Price) {
        if let Err(e) = self.deps.wallet.refund(actor, price) {
            tracing::error!(
                service = %self.id,
                actor = %actor,
                price = %price,
                error = %e,
                "Refund failed"
            );
        }
    }

    fn say(&self, actor: &ActorId, template: &str, price: Option<Price>, item: Option<ItemType>) {
        self.deps.notifier.notify(actor, &render(template, price, item));
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Session>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ReforgeService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
