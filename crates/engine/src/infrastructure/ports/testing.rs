//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};
use reforge_domain::ReforgeRng;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `[min, max]` (inclusive). Returns `min` when
    /// `max < min`.
    fn gen_range(&self, min: u32, max: u32) -> u32;

    /// Random source for one outcome computation.
    fn outcome_rng(&self) -> Box<dyn ReforgeRng + Send>;
}
