//! Test doubles and a wiring harness for reforge service tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{actor, worn_sword, Harness};
//!
//! #[test]
//! fn quotes_first_click() {
//!     let h = Harness::builder().build();
//!     let mut hand = Some(worn_sword());
//!     assert!(matches!(
//!         h.service.handle_interaction(&actor("alice"), &mut hand),
//!         ReforgeReply::Quoted { .. }
//!     ));
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reforge_domain::{ActorId, ItemSnapshot, ItemType, ServiceConfig, ServiceId, StandardCatalog};
use tokio::sync::Notify;

use crate::infrastructure::clock::{SeededRandom, SystemClock};
use crate::infrastructure::ports::{
    ClockPort, DelaySchedulerPort, DeliveryPort, NotifierPort, RandomPort, ScheduledHandle,
    SchedulerError, WorkUnit,
};
use crate::infrastructure::pricing::{CatalogEligibility, TablePricing};
use crate::infrastructure::wallet::InMemoryWallet;
use crate::use_cases::reforge::{ReforgeDeps, ReforgeService};

// =============================================================================
// Fixtures
// =============================================================================

pub fn actor(name: &str) -> ActorId {
    ActorId::new(name).unwrap()
}

/// Diamond sword at wear 100, quoted at 11.00 by the default price table.
pub fn worn_sword() -> ItemSnapshot {
    ItemSnapshot::new(ItemType::DiamondSword)
        .with_wear(100)
        .unwrap()
}

// =============================================================================
// Recording adapters
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(ActorId, String)>>,
}

impl RecordingNotifier {
    pub fn messages_for(&self, actor: &ActorId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == actor)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn last_for(&self, actor: &ActorId) -> Option<String> {
        self.messages_for(actor).pop()
    }
}

impl NotifierPort for RecordingNotifier {
    fn notify(&self, actor: &ActorId, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((actor.clone(), message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingDelivery {
    delivered: Mutex<Vec<(ActorId, ItemSnapshot)>>,
    arrived: Notify,
}

impl RecordingDelivery {
    pub fn delivered(&self) -> Vec<(ActorId, ItemSnapshot)> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    /// Waits until at least `count` items were delivered, or panics after
    /// `timeout`.
    pub async fn wait_for(&self, count: usize, timeout: Duration) {
        let wait = async {
            while self.count() < count {
                self.arrived.notified().await;
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .unwrap_or_else(|_| panic!("expected {count} deliveries, saw {}", self.count()));
    }
}

impl DeliveryPort for RecordingDelivery {
    fn deliver(&self, actor: &ActorId, item: ItemSnapshot) {
        self.delivered.lock().unwrap().push((actor.clone(), item));
        self.arrived.notify_one();
    }
}

// =============================================================================
// Manual scheduler
// =============================================================================

/// Captures work units instead of running them; tests fire them explicitly.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<(u32, WorkUnit)>>,
    requested_delays: Mutex<Vec<u32>>,
    next_id: AtomicU64,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn requested_delays(&self) -> Vec<u32> {
        self.requested_delays.lock().unwrap().clone()
    }

    /// Runs every captured work unit outside the scheduler's lock.
    pub fn fire_all(&self) -> usize {
        let work: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let fired = work.len();
        for (_, unit) in work {
            unit();
        }
        fired
    }
}

impl DelaySchedulerPort for ManualScheduler {
    fn schedule(&self, work: WorkUnit, delay_secs: u32) -> Result<ScheduledHandle, SchedulerError> {
        self.requested_delays.lock().unwrap().push(delay_secs);
        self.pending.lock().unwrap().push((delay_secs, work));
        Ok(ScheduledHandle::detached(
            self.next_id.fetch_add(1, Ordering::Relaxed),
        ))
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub service: Arc<ReforgeService>,
    pub notifier: Arc<RecordingNotifier>,
    pub delivery: Arc<RecordingDelivery>,
    pub scheduler: Arc<ManualScheduler>,
    pub wallet: Arc<InMemoryWallet>,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder {
            config: ServiceConfig::default(),
            balance: 1_000.0,
            notifier: None,
            delivery: None,
            scheduler: None,
            random: None,
            clock: None,
        }
    }
}

pub struct HarnessBuilder {
    config: ServiceConfig,
    balance: f64,
    notifier: Option<Arc<dyn NotifierPort>>,
    delivery: Option<Arc<dyn DeliveryPort>>,
    scheduler: Option<Arc<dyn DelaySchedulerPort>>,
    random: Option<Arc<dyn RandomPort>>,
    clock: Option<Arc<dyn ClockPort>>,
}

impl HarnessBuilder {
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    /// Replaces the recording notifier. `Harness::notifier` is then unused.
    pub fn notifier(mut self, notifier: Arc<dyn NotifierPort>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replaces the recording delivery. `Harness::delivery` is then unused.
    pub fn delivery(mut self, delivery: Arc<dyn DeliveryPort>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Replaces the manual scheduler. `Harness::scheduler` is then unused.
    pub fn scheduler(mut self, scheduler: Arc<dyn DelaySchedulerPort>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn random(mut self, random: Arc<dyn RandomPort>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn ClockPort>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Harness {
        let notifier = Arc::new(RecordingNotifier::default());
        let delivery = Arc::new(RecordingDelivery::default());
        let manual = Arc::new(ManualScheduler::default());
        let wallet = Arc::new(InMemoryWallet::new(self.balance));

        let deps = ReforgeDeps {
            eligibility: Arc::new(CatalogEligibility),
            pricing: Arc::new(TablePricing::default()),
            wallet: wallet.clone(),
            notifier: self.notifier.unwrap_or_else(|| notifier.clone()),
            delivery: self.delivery.unwrap_or_else(|| delivery.clone()),
            scheduler: self.scheduler.unwrap_or_else(|| manual.clone()),
            random: self
                .random
                .unwrap_or_else(|| Arc::new(SeededRandom::new(7))),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
            catalog: Arc::new(StandardCatalog),
        };

        Harness {
            service: ReforgeService::new(ServiceId::new(), Arc::new(self.config), deps),
            notifier,
            delivery,
            scheduler: manual,
            wallet,
        }
    }
}
