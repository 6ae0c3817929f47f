//! # Sale Repository
//!
//! Database operations for counter sales and their line items.
//!
//! Sales are recorded whole: the cashier rings up the lines, the register
//! computes totals, and one call persists sale plus items in a single
//! transaction. There is no draft state to resume.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::counter::CounterRepository;
use khel_core::numbering::receipt_number;
use khel_core::session::ClockOffset;
use khel_core::validation::{validate_amount_paisa, validate_branch_code, validate_quantity};
use khel_core::{CoreError, NewSale, Sale, SaleItem, MAX_SALE_ITEMS, SALE_COUNTER};

const SALE_COLUMNS: &str = r#"
    id, sale_number, branch_code, subtotal_paisa, discount_paisa,
    total_paisa, payment_method, notes, created_at
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a completed sale.
    ///
    /// Allocates the sale number, then inserts the sale and all line items
    /// in one transaction. A failed insert rolls the whole sale back; the
    /// allocated number is skipped.
    pub async fn record(&self, input: &NewSale, offset: ClockOffset) -> DbResult<Sale> {
        validate_branch_code(&input.branch_code)?;
        validate_amount_paisa(input.discount_paisa)?;

        if input.items.is_empty() {
            return Err(CoreError::EmptySale.into());
        }
        if input.items.len() > MAX_SALE_ITEMS {
            return Err(CoreError::SaleTooLarge { max: MAX_SALE_ITEMS }.into());
        }
        for item in &input.items {
            validate_quantity(item.quantity)?;
            validate_amount_paisa(item.unit_price_paisa)?;
        }

        let seq = CounterRepository::new(self.pool.clone())
            .allocate_next(SALE_COUNTER)
            .await?;

        let now = Utc::now();
        let subtotal_paisa: i64 = input.items.iter().map(|i| i.line_total_paisa()).sum();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            sale_number: receipt_number(now, offset, &input.branch_code, seq),
            branch_code: input.branch_code.clone(),
            subtotal_paisa,
            discount_paisa: input.discount_paisa,
            total_paisa: subtotal_paisa - input.discount_paisa,
            payment_method: input.payment_method,
            notes: input.notes.clone(),
            created_at: now,
        };

        debug!(id = %sale.id, number = %sale.sale_number, items = input.items.len(), "Recording sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, sale_number, branch_code, subtotal_paisa, discount_paisa,
                total_paisa, payment_method, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.sale_number)
        .bind(&sale.branch_code)
        .bind(sale.subtotal_paisa)
        .bind(sale.discount_paisa)
        .bind(sale.total_paisa)
        .bind(sale.payment_method)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &input.items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, name_snapshot, unit_price_paisa,
                    quantity, line_total_paisa, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(&item.name)
            .bind(item.unit_price_paisa)
            .bind(item.quantity)
            .bind(item.line_total_paisa())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(sale)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale: Option<Sale> =
            sqlx::query_as(&format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale, oldest first.
    pub async fn items_for(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items: Vec<SaleItem> = sqlx::query_as(
            r#"
            SELECT id, sale_id, name_snapshot, unit_price_paisa,
                   quantity, line_total_paisa, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists sales recorded in `[start, end)`, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let sales: Vec<Sale> = sqlx::query_as(&format!(
            r#"
            SELECT {SALE_COLUMNS} FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            ORDER BY created_at
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
