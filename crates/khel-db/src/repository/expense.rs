//! # Expense Repository
//!
//! Database operations for branch expenses. Each expense gets a voucher
//! number from the counter allocator, same as tickets and sales, so the
//! expense book is gaplessly numbered per success.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::counter::CounterRepository;
use khel_core::error::ValidationError;
use khel_core::numbering::receipt_number;
use khel_core::session::ClockOffset;
use khel_core::validation::{validate_amount_paisa, validate_branch_code};
use khel_core::{Expense, NewExpense, EXPENSE_COUNTER};

const EXPENSE_COLUMNS: &str = r#"
    id, expense_number, branch_code, category, description,
    amount_paisa, created_at
"#;

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense.
    ///
    /// Allocates the voucher number, then inserts the row. Allocation
    /// failure aborts the recording.
    pub async fn record(&self, input: &NewExpense, offset: ClockOffset) -> DbResult<Expense> {
        validate_branch_code(&input.branch_code)?;
        validate_amount_paisa(input.amount_paisa)?;
        if input.category.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "category".to_string(),
            }
            .into());
        }

        let seq = CounterRepository::new(self.pool.clone())
            .allocate_next(EXPENSE_COUNTER)
            .await?;

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            expense_number: receipt_number(now, offset, &input.branch_code, seq),
            branch_code: input.branch_code.clone(),
            category: input.category.clone(),
            description: input.description.clone(),
            amount_paisa: input.amount_paisa,
            created_at: now,
        };

        debug!(id = %expense.id, number = %expense.expense_number, "Recording expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, expense_number, branch_code, category, description,
                amount_paisa, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.expense_number)
        .bind(&expense.branch_code)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_paisa)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists expenses recorded in `[start, end)`, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Expense>> {
        let expenses: Vec<Expense> = sqlx::query_as(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS} FROM expenses
            WHERE created_at >= ?1 AND created_at < ?2
            ORDER BY created_at
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Total spent in `[start, end)`, in paisa.
    pub async fn total_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount_paisa) FROM expenses WHERE created_at >= ?1 AND created_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn broom() -> NewExpense {
        NewExpense {
            branch_code: "01".to_string(),
            category: "supplies".to_string(),
            description: Some("Brooms and floor cleaner".to_string()),
            amount_paisa: 8_000,
        }
    }

    #[tokio::test]
    async fn test_record_numbers_vouchers() {
        let db = test_db().await;
        let expenses = db.expenses();

        let first = expenses.record(&broom(), ClockOffset::VENUE).await.unwrap();
        let second = expenses.record(&broom(), ClockOffset::VENUE).await.unwrap();

        assert!(first.expense_number.ends_with("-01-0001"));
        assert!(second.expense_number.ends_with("-01-0002"));
    }

    #[tokio::test]
    async fn test_rejects_negative_amount_and_blank_category() {
        let db = test_db().await;
        let expenses = db.expenses();

        let mut bad = broom();
        bad.amount_paisa = -1;
        assert!(expenses.record(&bad, ClockOffset::VENUE).await.is_err());

        let mut bad = broom();
        bad.category = "  ".to_string();
        assert!(expenses.record(&bad, ClockOffset::VENUE).await.is_err());
    }

    #[tokio::test]
    async fn test_total_between() {
        let db = test_db().await;
        let expenses = db.expenses();
        let before = Utc::now() - Duration::seconds(1);

        expenses.record(&broom(), ClockOffset::VENUE).await.unwrap();
        expenses.record(&broom(), ClockOffset::VENUE).await.unwrap();

        let after = Utc::now() + Duration::seconds(1);
        assert_eq!(expenses.total_between(before, after).await.unwrap(), 16_000);
        assert_eq!(
            expenses
                .total_between(after, after + Duration::hours(1))
                .await
                .unwrap(),
            0
        );
    }
}
