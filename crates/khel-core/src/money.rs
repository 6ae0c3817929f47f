//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Paisa                                        │
//! │    Rs 10.00 is stored as 1000 paisa; every sum, discount, and       │
//! │    day total is exact integer arithmetic                            │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khel_core::money::Money;
//!
//! // Create from paisa (preferred)
//! let price = Money::from_paisa(15_000); // Rs 150.00
//!
//! // Arithmetic operations
//! let pair = price * 2;                      // Rs 300.00
//! let with_snack = price + Money::from_paisa(2_500); // Rs 175.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paisa, the smallest NPR unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and net losses
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Ticket prices, sale lines, expenses, and day summaries all flow through
/// this type; raw `*_paisa` columns in the database are converted at the
/// aggregation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisa (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use khel_core::money::Money;
    ///
    /// let price = Money::from_paisa(15_050); // Rs 150.50
    /// assert_eq!(price.paisa(), 15_050);
    /// ```
    #[inline]
    pub const fn from_paisa(paisa: i64) -> Self {
        Money(paisa)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use khel_core::money::Money;
    ///
    /// let entry_fee = Money::from_rupees(150);
    /// assert_eq!(entry_fee.paisa(), 15_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paisa (smallest currency unit).
    #[inline]
    pub const fn paisa(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paisa portion (always 0-99, sign dropped).
    #[inline]
    pub const fn paisa_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    ///
    /// A negative day net means the branch spent more than it took in.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use khel_core::money::Money;
    ///
    /// let unit_price = Money::from_paisa(2_500); // Rs 25.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paisa(), 7_500); // Rs 75.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is the receipt format (`Rs 150.50`). Negative values carry a
/// leading minus, which only appears on net figures, never on prices.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs {}.{:02}", sign, self.rupees().abs(), self.paisa_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation, so day totals read as `tickets.iter().map(..).sum()`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paisa() {
        let money = Money::from_paisa(15_050);
        assert_eq!(money.paisa(), 15_050);
        assert_eq!(money.rupees(), 150);
        assert_eq!(money.paisa_part(), 50);
    }

    #[test]
    fn test_from_rupees() {
        assert_eq!(Money::from_rupees(150).paisa(), 15_000);
        assert_eq!(Money::from_rupees(-5).paisa(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paisa(15_050)), "Rs 150.50");
        assert_eq!(format!("{}", Money::from_paisa(500)), "Rs 5.00");
        assert_eq!(format!("{}", Money::from_paisa(-550)), "-Rs 5.50");
        assert_eq!(format!("{}", Money::from_paisa(0)), "Rs 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paisa(1000);
        let b = Money::from_paisa(500);

        assert_eq!((a + b).paisa(), 1500);
        assert_eq!((a - b).paisa(), 500);
        assert_eq!((a * 3).paisa(), 3000);

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc.paisa(), 500);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_paisa(2500), Money::from_paisa(7500), Money::zero()];
        let total: Money = lines.iter().copied().sum();
        assert_eq!(total.paisa(), 10_000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paisa(2500);
        assert_eq!(unit_price.multiply_quantity(3).paisa(), 7500);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_paisa(-100).is_negative());
    }
}
