//! # khel-core: Pure Business Logic for Khel POS
//!
//! This crate is the **heart** of Khel POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Khel POS Architecture                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │              Branch handlers (out of repo)                  │   │
//! │  │   issue ticket ─► scan QR ─► ring up sale ─► day summary    │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                ★ khel-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌─────────────────┐ │   │
//! │  │  │  money  │ │ session │ │ numbering │ │ summary / types │ │   │
//! │  │  │  Money  │ │ windows │ │ receipts  │ │ day aggregation │ │   │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └─────────────────┘ │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO HOST TIMEZONE • PURE FUNCTIONS  │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                  khel-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, counter allocation       │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Ticket, Sale, Expense, Counter, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`session`] - Session time windows on the fixed venue clock
//! - [`numbering`] - Receipt number formatting
//! - [`summary`] - Daily aggregation over tickets, sales, and expenses
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paisa (i64) to avoid float errors
//! 4. **Explicit Time**: Instants are UTC; display goes through [`session::ClockOffset`]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod numbering;
pub mod session;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use khel_core::Money` instead of
// `use khel_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{ClockOffset, LocalTime, SessionWindow, BASE_SESSION_MINUTES};
pub use summary::DailySummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Counter name for session ticket numbers.
///
/// Counter names are the unit of independence: each name owns its own
/// strictly increasing sequence, and distinct names never interact.
pub const TICKET_COUNTER: &str = "ticket_no";

/// Counter name for counter-sale numbers.
pub const SALE_COUNTER: &str = "sale_no";

/// Counter name for expense voucher numbers.
pub const EXPENSE_COUNTER: &str = "expense_no";

/// Branch code used when a caller does not supply one.
pub const DEFAULT_BRANCH_CODE: &str = "00";

/// Maximum line items allowed in a single counter sale.
///
/// ## Business Reason
/// Prevents runaway carts and keeps printable receipts to one page.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
