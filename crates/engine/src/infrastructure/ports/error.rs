//! Error types for port operations.

use reforge_domain::Price;

/// The delay scheduler could not accept a unit of work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// The scheduler has been shut down and accepts no more work.
    #[error("Scheduler is closed")]
    Closed,

    /// The backing runtime refused the work.
    #[error("Scheduler rejected work: {0}")]
    Rejected(String),
}

/// Currency withdrawal or refund failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentError {
    /// The actor cannot afford the quoted price.
    #[error("Insufficient funds: {required} required, {available} available")]
    InsufficientFunds { required: Price, available: Price },

    /// The economy backend failed.
    #[error("Payment backend error: {0}")]
    Backend(String),
}

impl PaymentError {
    pub fn backend(message: impl ToString) -> Self {
        Self::Backend(message.to_string())
    }
}

/// Loading or saving a service config record failed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigStoreError {
    /// Filesystem or storage failure - includes the operation for tracing.
    #[error("Config store I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// The stored record is not valid JSON for a config record.
    #[error("Config serialization error: {0}")]
    Serialization(String),
}

impl ConfigStoreError {
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}
