//! # Domain Types
//!
//! Core domain types used throughout Khel POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │     Ticket     │   │      Sale      │   │    Expense     │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │      │
//! │  │  ticket_number │   │  sale_number   │   │  expense_number│      │
//! │  │  start_time    │   │  total_paisa   │   │  amount_paisa  │      │
//! │  │  extra_minutes │   │  items...      │   │  category      │      │
//! │  │  refunded      │   └────────────────┘   └────────────────┘      │
//! │  └────────────────┘                                                 │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐                           │
//! │  │    Counter     │   │ PaymentMethod  │                           │
//! │  │  ────────────  │   │  ────────────  │                           │
//! │  │  name (unique) │   │  Cash          │                           │
//! │  │  value         │   │  Esewa         │                           │
//! │  └────────────────┘   │  Card          │                           │
//! │                       └────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business number (ticket_number, ...) - human-readable, printed on the
//!   receipt and embedded in the QR payload; issued by the counter allocator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{ClockOffset, SessionWindow};

// =============================================================================
// Counter
// =============================================================================

/// A named monotonic counter.
///
/// The value starts at 0 and only ever moves through the allocator's atomic
/// upsert-increment; the first allocation on a fresh name therefore returns
/// 1. Reading the row outside the allocator is for reporting only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Counter {
    /// Unique counter name, e.g. `ticket_no`.
    pub name: String,

    /// Last issued value; 0 means nothing issued yet.
    pub value: i64,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a ticket or sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    Cash,
    Esewa,
    Card,
}

// =============================================================================
// Ticket
// =============================================================================

/// A session ticket: one timed entry to the play area.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ticket {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business number printed on the receipt and encoded in the QR.
    pub ticket_number: String,

    /// Issuing branch.
    pub branch_code: String,

    /// Customer name, if given at the counter.
    pub customer_name: Option<String>,

    /// Number of guests entering on this ticket.
    pub guest_count: i64,

    /// Price paid, in paisa.
    pub price_paisa: i64,

    /// How the ticket was paid.
    pub payment_method: PaymentMethod,

    /// When the session began.
    pub start_time: DateTime<Utc>,

    /// Accumulated purchased extra minutes. Never negative.
    pub extra_minutes: i64,

    /// Whether the ticket has been refunded.
    pub refunded: bool,

    /// When the ticket row was created.
    pub created_at: DateTime<Utc>,

    /// When the ticket row was last updated (top-up, refund).
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// The time window this ticket currently grants.
    pub fn window(&self) -> SessionWindow {
        SessionWindow {
            start: Some(self.start_time),
            extra_minutes: self.extra_minutes,
            refunded: self.refunded,
        }
    }

    /// Evaluates the ticket at the gate.
    ///
    /// This is the whole of QR validation: the scanner resolves the number
    /// to a ticket and this answers whether the holder may enter.
    pub fn scan(&self, now: DateTime<Utc>, offset: ClockOffset) -> ScanReport {
        let window = self.window();
        let remaining_minutes = window.remaining_minutes(now);

        ScanReport {
            ticket_number: self.ticket_number.clone(),
            end_time: window.end_time(offset),
            remaining_minutes,
            expired: remaining_minutes.map_or(true, |m| m <= 0),
            refunded: self.refunded,
        }
    }
}

/// Gate-side view of a scanned ticket.
///
/// `end_time` and `remaining_minutes` are `None` when the window is not
/// computable; the gate display renders a placeholder, never "0".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub ticket_number: String,
    pub end_time: Option<String>,
    pub remaining_minutes: Option<i64>,
    pub expired: bool,
    pub refunded: bool,
}

/// Input for issuing a ticket. The number, id, and timestamps are assigned
/// at issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub branch_code: String,
    pub customer_name: Option<String>,
    pub guest_count: i64,
    pub price_paisa: i64,
    pub payment_method: PaymentMethod,
    pub start_time: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed counter sale (snacks, rentals, merchandise).
///
/// Sales are recorded whole at the register; there is no draft state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business number printed on the receipt.
    pub sale_number: String,

    /// Selling branch.
    pub branch_code: String,

    /// Sum of line totals, in paisa.
    pub subtotal_paisa: i64,

    /// Flat discount applied to the whole sale, in paisa.
    pub discount_paisa: i64,

    /// Amount actually charged: subtotal minus discount.
    pub total_paisa: i64,

    /// How the sale was paid.
    pub payment_method: PaymentMethod,

    /// Free-form cashier note.
    pub notes: Option<String>,

    /// When the sale was recorded.
    pub created_at: DateTime<Utc>,
}

/// One line of a counter sale.
///
/// ## Snapshot Pattern
/// Name and unit price are copied from the catalog at sale time so the
/// sale history survives later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub name_snapshot: String,
    pub unit_price_paisa: i64,
    pub quantity: i64,
    pub line_total_paisa: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub branch_code: String,
    pub items: Vec<NewSaleItem>,
    pub discount_paisa: i64,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Input for one sale line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub name: String,
    pub unit_price_paisa: i64,
    pub quantity: i64,
}

impl NewSaleItem {
    /// Line total in paisa.
    #[inline]
    pub const fn line_total_paisa(&self) -> i64 {
        self.unit_price_paisa * self.quantity
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A branch expense (supplies, maintenance, wages paid from the till).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Voucher number printed on the expense slip.
    pub expense_number: String,

    /// Spending branch.
    pub branch_code: String,

    /// Expense category, e.g. `maintenance`.
    pub category: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Amount spent, in paisa. Never negative.
    pub amount_paisa: i64,

    /// When the expense was recorded.
    pub created_at: DateTime<Utc>,
}

/// Input for recording an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub branch_code: String,
    pub category: String,
    pub description: Option<String>,
    pub amount_paisa: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
