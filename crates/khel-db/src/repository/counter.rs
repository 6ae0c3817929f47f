//! # Counter Repository
//!
//! Atomic allocation of business numbers (ticket, sale, expense).
//!
//! ## Why One Statement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE LOST-UPDATE RACE                                               │
//! │                                                                     │
//! │  Read-then-write allocation breaks under two concurrent callers:    │
//! │                                                                     │
//! │    Desk A: read value = 7                                           │
//! │    Desk B: read value = 7                                           │
//! │    Desk A: write 8, receipt #8                                      │
//! │    Desk B: write 8, receipt #8   ← duplicate number issued          │
//! │                                                                     │
//! │  Duplicate numbers corrupt everything downstream: receipt lookup,   │
//! │  QR payload identity, refund audit.                                 │
//! │                                                                     │
//! │  THE FIX: one upsert-increment statement                            │
//! │                                                                     │
//! │    INSERT INTO counters (name, value) VALUES (?, 1)                 │
//! │    ON CONFLICT(name) DO UPDATE SET value = value + 1                │
//! │    RETURNING value                                                  │
//! │                                                                     │
//! │  Find-or-create, increment, and read-back execute as one atomic     │
//! │  operation under SQLite's write lock. An application-level mutex    │
//! │  would NOT be a fix: the desks run in separate processes.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! For N concurrent allocations on one name the issued values are exactly
//! `{v+1, ..., v+N}`: no duplicates, no gaps from the allocator itself.
//! (A caller that allocates and then fails its insert leaves a gap in the
//! *business records*; that is accepted, numbers are cheap.)

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use khel_core::validation::validate_counter_name;
use khel_core::Counter;

/// Repository for counter allocation.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    /// Creates a new CounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Allocates the next value for the named counter.
    ///
    /// Creates the counter on first use (so the first allocation returns 1)
    /// and returns the post-increment value. Distinct names are fully
    /// independent sequences.
    ///
    /// ## Failure
    /// On [`crate::DbError::Unavailable`] no value was returned and the
    /// counter may or may not have advanced. The caller must abort whatever
    /// it was numbering; a blind retry is safe and consumes another slot.
    pub async fn allocate_next(&self, name: &str) -> DbResult<i64> {
        validate_counter_name(name)?;

        // Single atomic statement. Never split into read + write.
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (name, value) VALUES (?1, 1)
            ON CONFLICT(name) DO UPDATE SET value = value + 1
            RETURNING value
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        debug!(counter = name, value, "Allocated sequence value");

        Ok(value)
    }

    /// Reads the last issued value without advancing it.
    ///
    /// `None` means nothing has been allocated under this name yet. For
    /// reporting only; never use this to compute the next number.
    pub async fn current(&self, name: &str) -> DbResult<Option<i64>> {
        validate_counter_name(name)?;

        let value: Option<i64> =
            sqlx::query_scalar("SELECT value FROM counters WHERE name = ?1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Lists all counters (admin/reporting).
    pub async fn list(&self) -> DbResult<Vec<Counter>> {
        let counters: Vec<Counter> =
            sqlx::query_as("SELECT name, value FROM counters ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(counters)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// File-backed database so the pool can open several real connections;
    /// in-memory SQLite is limited to one.
    async fn multi_connection_db() -> (Database, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("khel-counter-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();
        (db, path)
    }

    #[tokio::test]
    async fn test_fresh_counter_starts_at_one() {
        let db = test_db().await;
        let counters = db.counters();

        assert_eq!(counters.current("ticket_no").await.unwrap(), None);
        assert_eq!(counters.allocate_next("ticket_no").await.unwrap(), 1);
        assert_eq!(counters.current("ticket_no").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_sequential_allocations_increase_by_one() {
        let db = test_db().await;
        let counters = db.counters();

        for expected in 1..=50 {
            assert_eq!(counters.allocate_next("sale_no").await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_counters_are_independent() {
        let db = test_db().await;
        let counters = db.counters();

        assert_eq!(counters.allocate_next("ticket_no").await.unwrap(), 1);
        assert_eq!(counters.allocate_next("ticket_no").await.unwrap(), 2);
        assert_eq!(counters.allocate_next("expense_no").await.unwrap(), 1);
        assert_eq!(counters.allocate_next("ticket_no").await.unwrap(), 3);
        assert_eq!(counters.allocate_next("expense_no").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_invalid_names_rejected_without_touching_store() {
        let db = test_db().await;
        let counters = db.counters();

        assert!(counters.allocate_next("").await.is_err());
        assert!(counters.allocate_next("bad name").await.is_err());
        assert!(counters.list().await.unwrap().is_empty());
    }

    /// The core guarantee: 100 concurrent allocations on one name over a
    /// multi-connection pool issue exactly {1..=100}.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocations_have_no_duplicates_or_gaps() {
        let (db, path) = multi_connection_db().await;

        let mut handles = Vec::new();
        for _ in 0..100 {
            let counters = db.counters();
            handles.push(tokio::spawn(async move {
                counters.allocate_next("ticket_no").await.unwrap()
            }));
        }

        let mut values = Vec::with_capacity(100);
        for handle in handles {
            values.push(handle.await.unwrap());
        }

        values.sort_unstable();
        let expected: Vec<i64> = (1..=100).collect();
        assert_eq!(values, expected);

        db.close().await;
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocations_on_distinct_names_stay_separate() {
        let (db, path) = multi_connection_db().await;

        let mut handles = Vec::new();
        for i in 0..60 {
            let counters = db.counters();
            let name = if i % 2 == 0 { "ticket_no" } else { "sale_no" };
            handles.push(tokio::spawn(async move {
                (name, counters.allocate_next(name).await.unwrap())
            }));
        }

        let mut tickets = Vec::new();
        let mut sales = Vec::new();
        for handle in handles {
            let (name, value) = handle.await.unwrap();
            if name == "ticket_no" {
                tickets.push(value);
            } else {
                sales.push(value);
            }
        }

        tickets.sort_unstable();
        sales.sort_unstable();
        assert_eq!(tickets, (1..=30).collect::<Vec<i64>>());
        assert_eq!(sales, (1..=30).collect::<Vec<i64>>());

        db.close().await;
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_allocation_fails_once_pool_is_closed() {
        let db = test_db().await;
        let counters = db.counters();
        counters.allocate_next("ticket_no").await.unwrap();

        db.close().await;

        let err = counters.allocate_next("ticket_no").await.unwrap_err();
        assert!(matches!(err, crate::DbError::Unavailable(_)));
    }
}
