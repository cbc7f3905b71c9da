//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Host predicates, pricing and wallet (owned by the embedding game)
//! - Messages and item delivery back to the requester
//! - Delayed work (could swap tokio timers -> a host tick scheduler)
//! - Config storage (could swap JSON files -> a database)
//! - Clock/Random (for testing)

mod error;
mod external;
mod scheduler;
mod testing;

pub use error::{ConfigStoreError, PaymentError, SchedulerError};
pub use external::{
    ConfigStorePort, DeliveryPort, EligibilityPort, NotifierPort, PricingPort, WalletPort,
};
pub use scheduler::{DelaySchedulerPort, ScheduledHandle, WorkUnit};
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use external::{
    MockConfigStorePort, MockDeliveryPort, MockEligibilityPort, MockNotifierPort,
    MockPricingPort, MockWalletPort,
};
#[cfg(test)]
pub use scheduler::MockDelaySchedulerPort;
#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};
