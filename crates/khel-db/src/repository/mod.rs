//! # Repository Module
//!
//! Database repository implementations for Khel POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                     │
//! │                                                                     │
//! │  The Repository pattern abstracts database access behind a clean    │
//! │  API.                                                               │
//! │                                                                     │
//! │  Branch handler                                                     │
//! │       │                                                             │
//! │       │  db.tickets().issue(new_ticket)                             │
//! │       ▼                                                             │
//! │  TicketRepository                                                   │
//! │  ├── issue(&self, input)                                            │
//! │  ├── get_by_number(&self, number)                                   │
//! │  ├── add_extra_time(&self, id, minutes)                             │
//! │  └── refund(&self, id)                                              │
//! │       │                                                             │
//! │       │  SQL                                                        │
//! │       ▼                                                             │
//! │  SQLite database                                                    │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • SQL is isolated in one place                                     │
//! │  • Clean separation of concerns                                     │
//! │  • Easy to test against an in-memory database                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`counter::CounterRepository`] - Atomic business-number allocation
//! - [`ticket::TicketRepository`] - Ticket issue, top-up, refund, scan lookup
//! - [`sale::SaleRepository`] - Counter sales with line items
//! - [`expense::ExpenseRepository`] - Branch expenses
//! - [`summary::SummaryRepository`] - Day and range reporting

pub mod counter;
pub mod expense;
pub mod sale;
pub mod summary;
pub mod ticket;
