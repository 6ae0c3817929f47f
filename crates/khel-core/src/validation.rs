//! # Validation Module
//!
//! Input validation utilities for Khel POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: Handlers (out of repo)                                    │
//! │  └── Shape checks, immediate user feedback                          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL, UNIQUE, CHECK constraints                            │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Extra-minutes validation matters most: the session window calculator
//! assumes `extra_minutes >= 0` and does not re-check, so every top-up path
//! must come through here before anything is stored.

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Counter Names
// =============================================================================

/// Validates a counter name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use khel_core::validation::validate_counter_name;
///
/// assert!(validate_counter_name("ticket_no").is_ok());
/// assert!(validate_counter_name("").is_err());
/// assert!(validate_counter_name("ticket no").is_err());
/// ```
pub fn validate_counter_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "counter name".to_string(),
        });
    }

    if name.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "counter name".to_string(),
            max: 64,
        });
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "counter name".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Session Time
// =============================================================================

/// Validates an extra-minutes amount (a top-up or an accumulated total).
///
/// Negative extra time would silently shorten a session window downstream,
/// so it is rejected here rather than corrected.
pub fn validate_extra_minutes(minutes: i64) -> ValidationResult<()> {
    if minutes < 0 {
        return Err(ValidationError::Negative {
            field: "extra_minutes".to_string(),
            value: minutes,
        });
    }

    Ok(())
}

/// Clamps an extra-minutes amount to zero.
///
/// For import paths where bad legacy values should be absorbed rather than
/// rejected. Interactive paths use [`validate_extra_minutes`] instead.
#[inline]
pub fn clamp_extra_minutes(minutes: i64) -> i64 {
    minutes.max(0)
}

// =============================================================================
// Tickets and Sales
// =============================================================================

/// Validates a branch code.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 16 characters
pub fn validate_branch_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "branch code".to_string(),
        });
    }

    if code.len() > 16 {
        return Err(ValidationError::TooLong {
            field: "branch code".to_string(),
            max: 16,
        });
    }

    Ok(())
}

/// Validates a ticket guest count.
pub fn validate_guest_count(count: i64) -> ValidationResult<()> {
    if !(1..=100).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: "guest count".to_string(),
            min: 1,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a sale line quantity.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or amount in paisa.
pub fn validate_amount_paisa(amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::Negative {
            field: "amount_paisa".to_string(),
            value: amount,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_name_rules() {
        assert!(validate_counter_name("ticket_no").is_ok());
        assert!(validate_counter_name("sale-no-2").is_ok());
        assert!(validate_counter_name("  ").is_err());
        assert!(validate_counter_name("has space").is_err());
        assert!(validate_counter_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_extra_minutes() {
        assert!(validate_extra_minutes(0).is_ok());
        assert!(validate_extra_minutes(30).is_ok());
        assert!(validate_extra_minutes(-1).is_err());
    }

    #[test]
    fn test_clamp_extra_minutes() {
        assert_eq!(clamp_extra_minutes(-30), 0);
        assert_eq!(clamp_extra_minutes(15), 15);
    }

    #[test]
    fn test_branch_code() {
        assert!(validate_branch_code("01").is_ok());
        assert!(validate_branch_code("").is_err());
        assert!(validate_branch_code(&"b".repeat(17)).is_err());
    }

    #[test]
    fn test_guest_count() {
        assert!(validate_guest_count(1).is_ok());
        assert!(validate_guest_count(0).is_err());
        assert!(validate_guest_count(101).is_err());
    }

    #[test]
    fn test_quantity_and_amount() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
        assert!(validate_amount_paisa(0).is_ok());
        assert!(validate_amount_paisa(-5).is_err());
    }
}
