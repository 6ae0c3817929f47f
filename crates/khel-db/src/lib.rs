//! # khel-db: Database Layer for Khel POS
//!
//! This crate provides database access for the Khel POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Khel POS Data Flow                           │
//! │                                                                     │
//! │  Branch handler (issue ticket / scan / record sale)                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    khel-db (THIS CRATE)                     │   │
//! │  │                                                             │   │
//! │  │  ┌─────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │  │  Database   │   │  Repositories  │   │  Migrations  │   │   │
//! │  │  │  (pool.rs)  │   │ (counter.rs,   │   │  (embedded)  │   │   │
//! │  │  │             │◄──│  ticket.rs,    │   │ 001_init.sql │   │   │
//! │  │  │ SqlitePool  │   │  sale.rs, ...) │   │              │   │   │
//! │  │  └─────────────┘   └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (one per branch)                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (counter, ticket, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use khel_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/khel.db")).await?;
//!
//! let no = db.counters().allocate_next(khel_core::TICKET_COUNTER).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::counter::CounterRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::sale::SaleRepository;
pub use repository::summary::SummaryRepository;
pub use repository::ticket::TicketRepository;
