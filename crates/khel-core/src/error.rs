//! # Error Types
//!
//! Domain-specific error types for khel-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  khel-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                       │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  khel-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → caller               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ticket number, field name, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Ticket cannot be found.
    ///
    /// ## When This Occurs
    /// - Scanned QR carries a number that was never issued
    /// - Ticket was issued at another branch's database
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    /// Ticket is already refunded and cannot take the requested operation.
    #[error("Ticket {0} is refunded")]
    TicketRefunded(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Sale has no line items; an empty receipt must never be persisted.
    #[error("Sale has no items")]
    EmptySale,

    /// Sale has exceeded maximum allowed line items.
    #[error("Sale cannot have more than {max} items")]
    SaleTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    ///
    /// ## When This Occurs
    /// - Extra session minutes supplied as a negative number. The window
    ///   calculator assumes the precondition and would silently produce a
    ///   shortened window, so this must be rejected before it gets there.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// Invalid format (e.g., bad counter name characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TicketNotFound("20260207-01-0042".to_string());
        assert_eq!(err.to_string(), "Ticket not found: 20260207-01-0042");

        let err = CoreError::SaleTooLarge { max: 100 };
        assert_eq!(err.to_string(), "Sale cannot have more than 100 items");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Negative {
            field: "extra_minutes".to_string(),
            value: -30,
        };
        assert_eq!(err.to_string(), "extra_minutes must not be negative (got -30)");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "counter name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
