//! # Summary Repository
//!
//! Day and range reporting over tickets, sales, and expenses.
//!
//! Days follow the venue clock: a "day" is the UTC instant range produced
//! by [`khel_core::session::day_bounds`], so a ticket issued at 23:30 venue
//! time lands on that venue date even though it is already the next day in
//! UTC. The SQL mirrors [`khel_core::summary::summarize_day`]; the tests
//! hold the two implementations against each other.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::DbResult;
use khel_core::session::{day_bounds, ClockOffset};
use khel_core::summary::DailySummary;
use khel_core::Money;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    pool: SqlitePool,
}

impl SummaryRepository {
    /// Creates a new SummaryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SummaryRepository { pool }
    }

    /// Summarizes one venue-local day.
    pub async fn daily(&self, date: NaiveDate, offset: ClockOffset) -> DbResult<DailySummary> {
        let (start, end) = day_bounds(date, offset);

        // Refunded tickets stay in the issuance count but contribute
        // neither revenue nor guests
        let (tickets_issued, guests, ticket_revenue): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN refunded = 0 THEN guest_count ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN refunded = 0 THEN price_paisa ELSE 0 END), 0)
            FROM tickets
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let (sales_count, sale_revenue): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_paisa), 0)
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let (expenses_count, expense_total): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount_paisa), 0)
            FROM expenses
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(DailySummary {
            date,
            tickets_issued,
            guests,
            ticket_revenue: Money::from_paisa(ticket_revenue),
            sales_count,
            sale_revenue: Money::from_paisa(sale_revenue),
            expenses_count,
            expense_total: Money::from_paisa(expense_total),
        })
    }

    /// Summarizes an inclusive date range, one row per venue-local day.
    pub async fn range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        offset: ClockOffset,
    ) -> DbResult<Vec<DailySummary>> {
        let mut days = Vec::new();
        let mut date = from;

        while date <= to {
            days.push(self.daily(date, offset).await?);
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        Ok(days)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
