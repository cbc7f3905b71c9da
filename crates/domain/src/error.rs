//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Lookup in a catalog failed
    #[error("Not found: {kind} '{name}'")]
    NotFound { kind: &'static str, name: String },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Values are outside allowed ranges
    /// - Bounds are inverted (minimum above maximum)
    ///
    /// # Example
    /// ```ignore
    /// if percent > 100 {
    ///     return Err(DomainError::validation("Fail chance cannot exceed 100"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("minimum delay exceeds maximum");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: minimum delay exceeds maximum"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("item type", "golden_apple");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.to_string(), "Not found: item type 'golden_apple'");
    }
}
