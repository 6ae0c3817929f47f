//! # Ticket Repository
//!
//! Database operations for session tickets.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Ticket Lifecycle                             │
//! │                                                                     │
//! │  1. ISSUE                                                           │
//! │     └── issue() → allocate number → insert row                      │
//! │         (allocation failure aborts issuance; no ticket is ever      │
//! │          persisted without its number)                              │
//! │                                                                     │
//! │  2. (OPTIONAL) TOP UP                                               │
//! │     └── add_extra_time() → extra_minutes += n                       │
//! │                                                                     │
//! │  3. SCAN AT THE GATE                                                │
//! │     └── scan() → remaining minutes, end time, expired flag          │
//! │                                                                     │
//! │  4. (OPTIONAL) REFUND                                               │
//! │     └── refund() → base grant gone, top-ups still count             │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::counter::CounterRepository;
use khel_core::numbering::receipt_number;
use khel_core::session::ClockOffset;
use khel_core::validation::{
    validate_amount_paisa, validate_branch_code, validate_extra_minutes, validate_guest_count,
};
use khel_core::{NewTicket, ScanReport, Ticket, TICKET_COUNTER};

const TICKET_COLUMNS: &str = r#"
    id, ticket_number, branch_code, customer_name, guest_count,
    price_paisa, payment_method, start_time, extra_minutes, refunded,
    created_at, updated_at
"#;

/// Repository for ticket database operations.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    /// Creates a new TicketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TicketRepository { pool }
    }

    /// Issues a new ticket.
    ///
    /// Allocates the next ticket number, formats it with the venue-local
    /// issue date, and inserts the row. If allocation fails the ticket is
    /// not created; if the insert fails the allocated number is simply
    /// skipped.
    pub async fn issue(&self, input: &NewTicket, offset: ClockOffset) -> DbResult<Ticket> {
        validate_branch_code(&input.branch_code)?;
        validate_guest_count(input.guest_count)?;
        validate_amount_paisa(input.price_paisa)?;

        let seq = CounterRepository::new(self.pool.clone())
            .allocate_next(TICKET_COUNTER)
            .await?;

        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            ticket_number: receipt_number(now, offset, &input.branch_code, seq),
            branch_code: input.branch_code.clone(),
            customer_name: input.customer_name.clone(),
            guest_count: input.guest_count,
            price_paisa: input.price_paisa,
            payment_method: input.payment_method,
            start_time: input.start_time,
            extra_minutes: 0,
            refunded: false,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %ticket.id, number = %ticket.ticket_number, "Issuing ticket");

        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, ticket_number, branch_code, customer_name, guest_count,
                price_paisa, payment_method, start_time, extra_minutes, refunded,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&ticket.id)
        .bind(&ticket.ticket_number)
        .bind(&ticket.branch_code)
        .bind(&ticket.customer_name)
        .bind(ticket.guest_count)
        .bind(ticket.price_paisa)
        .bind(ticket.payment_method)
        .bind(ticket.start_time)
        .bind(ticket.extra_minutes)
        .bind(ticket.refunded)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Gets a ticket by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Ticket>> {
        let ticket: Option<Ticket> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Gets a ticket by its business number (the QR payload).
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<Ticket>> {
        let ticket: Option<Ticket> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE ticket_number = ?1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Resolves a scanned number and evaluates the ticket at the gate.
    pub async fn scan(
        &self,
        number: &str,
        now: DateTime<Utc>,
        offset: ClockOffset,
    ) -> DbResult<ScanReport> {
        let ticket = self
            .get_by_number(number)
            .await?
            .ok_or_else(|| DbError::not_found("Ticket", number))?;

        Ok(ticket.scan(now, offset))
    }

    /// Adds purchased extra minutes to a ticket.
    ///
    /// Minutes accumulate across top-ups. Negative input is rejected here,
    /// before the window calculator can ever see it.
    pub async fn add_extra_time(&self, id: &str, minutes: i64) -> DbResult<()> {
        validate_extra_minutes(minutes)?;

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE tickets SET
                extra_minutes = extra_minutes + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(minutes)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ticket", id));
        }

        debug!(id, minutes, "Added extra time");

        Ok(())
    }

    /// Refunds a ticket.
    ///
    /// From here on only accumulated extra time counts toward the window;
    /// the base grant is gone.
    pub async fn refund(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE tickets SET
                refunded = 1,
                updated_at = ?2
            WHERE id = ?1 AND refunded = 0
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ticket (not refunded)", id));
        }

        debug!(id, "Refunded ticket");

        Ok(())
    }

    /// Lists tickets created in `[start, end)`, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Ticket>> {
        let tickets: Vec<Ticket> = sqlx::query_as(&format!(
            r#"
            SELECT {TICKET_COLUMNS} FROM tickets
            WHERE created_at >= ?1 AND created_at < ?2
            ORDER BY created_at
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use khel_core::PaymentMethod;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_ticket(start: DateTime<Utc>) -> NewTicket {
        NewTicket {
            branch_code: "01".to_string(),
            customer_name: Some("Prakash".to_string()),
            guest_count: 2,
            price_paisa: 15_000,
            payment_method: PaymentMethod::Cash,
            start_time: start,
        }
    }

    #[tokio::test]
    async fn test_issue_assigns_sequential_numbers() {
        let db = test_db().await;
        let tickets = db.tickets();
        let start = Utc::now();

        let first = tickets.issue(&new_ticket(start), ClockOffset::VENUE).await.unwrap();
        let second = tickets.issue(&new_ticket(start), ClockOffset::VENUE).await.unwrap();

        assert!(first.ticket_number.ends_with("-01-0001"));
        assert!(second.ticket_number.ends_with("-01-0002"));
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_issue_rejects_bad_input_without_consuming_numbers() {
        let db = test_db().await;
        let tickets = db.tickets();

        let mut bad = new_ticket(Utc::now());
        bad.guest_count = 0;
        assert!(tickets.issue(&bad, ClockOffset::VENUE).await.is_err());

        // The rejected issue never reached the allocator
        assert_eq!(db.counters().current(TICKET_COUNTER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_by_number_roundtrip() {
        let db = test_db().await;
        let tickets = db.tickets();

        let issued = tickets
            .issue(&new_ticket(Utc::now()), ClockOffset::VENUE)
            .await
            .unwrap();
        let found = tickets
            .get_by_number(&issued.ticket_number)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, issued.id);
        assert_eq!(found.payment_method, PaymentMethod::Cash);
        assert_eq!(found.customer_name.as_deref(), Some("Prakash"));

        assert!(tickets.get_by_number("no-such").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_extra_time_accumulates() {
        let db = test_db().await;
        let tickets = db.tickets();

        let issued = tickets
            .issue(&new_ticket(Utc::now()), ClockOffset::VENUE)
            .await
            .unwrap();

        tickets.add_extra_time(&issued.id, 15).await.unwrap();
        tickets.add_extra_time(&issued.id, 30).await.unwrap();

        let t = tickets.get_by_id(&issued.id).await.unwrap().unwrap();
        assert_eq!(t.extra_minutes, 45);
        assert_eq!(t.window().granted_minutes(), 105);
    }

    #[tokio::test]
    async fn test_negative_extra_time_rejected() {
        let db = test_db().await;
        let tickets = db.tickets();

        let issued = tickets
            .issue(&new_ticket(Utc::now()), ClockOffset::VENUE)
            .await
            .unwrap();

        assert!(tickets.add_extra_time(&issued.id, -10).await.is_err());

        let t = tickets.get_by_id(&issued.id).await.unwrap().unwrap();
        assert_eq!(t.extra_minutes, 0);
    }

    #[tokio::test]
    async fn test_refund_is_one_shot_and_drops_base_grant() {
        let db = test_db().await;
        let tickets = db.tickets();

        let issued = tickets
            .issue(&new_ticket(Utc::now()), ClockOffset::VENUE)
            .await
            .unwrap();
        tickets.add_extra_time(&issued.id, 20).await.unwrap();

        tickets.refund(&issued.id).await.unwrap();
        assert!(tickets.refund(&issued.id).await.is_err());

        let t = tickets.get_by_id(&issued.id).await.unwrap().unwrap();
        assert!(t.refunded);
        assert_eq!(t.window().granted_minutes(), 20);
    }

    #[tokio::test]
    async fn test_scan_reports_remaining_and_expiry() {
        let db = test_db().await;
        let tickets = db.tickets();
        let start = Utc::now();

        let issued = tickets.issue(&new_ticket(start), ClockOffset::VENUE).await.unwrap();

        let fresh = tickets
            .scan(&issued.ticket_number, start + Duration::minutes(20), ClockOffset::VENUE)
            .await
            .unwrap();
        assert_eq!(fresh.remaining_minutes, Some(40));
        assert!(!fresh.expired);

        let late = tickets
            .scan(&issued.ticket_number, start + Duration::minutes(90), ClockOffset::VENUE)
            .await
            .unwrap();
        assert_eq!(late.remaining_minutes, Some(-30));
        assert!(late.expired);

        let missing = tickets
            .scan("20990101-01-9999", start, ClockOffset::VENUE)
            .await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_between_filters_by_creation() {
        let db = test_db().await;
        let tickets = db.tickets();
        let before = Utc::now() - Duration::seconds(1);

        tickets.issue(&new_ticket(Utc::now()), ClockOffset::VENUE).await.unwrap();
        tickets.issue(&new_ticket(Utc::now()), ClockOffset::VENUE).await.unwrap();

        let after = Utc::now() + Duration::seconds(1);

        assert_eq!(tickets.list_between(before, after).await.unwrap().len(), 2);
        assert!(tickets
            .list_between(after, after + Duration::hours(1))
            .await
            .unwrap()
            .is_empty());
    }
}
