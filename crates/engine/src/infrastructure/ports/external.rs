//! Host collaborator ports: eligibility, pricing, wallet, messaging,
//! delivery, and config storage.
//!
//! Collaborators are called from inside the service's critical section.
//! Implementations must return promptly and must not call back into the
//! service.

use async_trait::async_trait;
use reforge_domain::{ActorId, ItemSnapshot, Price, ServiceConfigRecord};

use super::error::{ConfigStoreError, PaymentError};

// =============================================================================
// Item Predicates
// =============================================================================

/// Category predicates supplied by the host.
#[cfg_attr(test, mockall::automock)]
pub trait EligibilityPort: Send + Sync {
    /// Category A: weapons and tools.
    fn is_tool(&self, item: &ItemSnapshot) -> bool;

    /// Category B: wearable armor.
    fn is_armor(&self, item: &ItemSnapshot) -> bool;

    /// Base predicate: can this item be reforged at all.
    fn is_processable(&self, item: &ItemSnapshot) -> bool {
        self.is_tool(item) || self.is_armor(item)
    }
}

// =============================================================================
// Economy
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait PricingPort: Send + Sync {
    /// Cost of reforging `item`.
    fn quote(&self, item: &ItemSnapshot) -> Price;
}

#[cfg_attr(test, mockall::automock)]
pub trait WalletPort: Send + Sync {
    fn withdraw(&self, actor: &ActorId, amount: Price) -> Result<(), PaymentError>;

    /// Returns money taken for a cycle that never started.
    fn refund(&self, actor: &ActorId, amount: Price) -> Result<(), PaymentError>;
}

// =============================================================================
// Output to the requester
// =============================================================================

/// Message channel to an actor (chat bubble, console line, ...).
#[cfg_attr(test, mockall::automock)]
pub trait NotifierPort: Send + Sync {
    fn notify(&self, actor: &ActorId, message: &str);
}

/// Places a finished item at or near the requester.
#[cfg_attr(test, mockall::automock)]
pub trait DeliveryPort: Send + Sync {
    fn deliver(&self, actor: &ActorId, item: ItemSnapshot);
}

// =============================================================================
// Config Storage
// =============================================================================

/// Structured store for per-service config records, keyed by service name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigStorePort: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<ServiceConfigRecord>, ConfigStoreError>;
    async fn save(&self, key: &str, record: &ServiceConfigRecord) -> Result<(), ConfigStoreError>;
}
