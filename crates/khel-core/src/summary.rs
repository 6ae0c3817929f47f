//! # Daily Summaries
//!
//! Pure aggregation over a day's tickets, sales, and expenses.
//!
//! The branch report is plain sums and counts; the only rule with teeth is
//! the refund rule. A refunded ticket stays in the issuance count (the entry
//! happened, the register line exists) but contributes nothing to revenue or
//! to the guest tally.
//!
//! The database layer produces the same figures with SQL aggregates; this
//! module is the in-memory counterpart used on already-loaded rows and as
//! the reference the SQL is tested against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Expense, Sale, Ticket};

/// One venue-local day of branch activity, condensed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    /// Venue-local calendar date.
    pub date: NaiveDate,

    /// Tickets issued, refunded ones included.
    pub tickets_issued: i64,

    /// Guests admitted on non-refunded tickets.
    pub guests: i64,

    /// Ticket revenue, refunded tickets excluded.
    pub ticket_revenue: Money,

    /// Counter sales recorded.
    pub sales_count: i64,

    /// Counter sale revenue (post-discount totals).
    pub sale_revenue: Money,

    /// Expenses recorded.
    pub expenses_count: i64,

    /// Total spent.
    pub expense_total: Money,
}

impl DailySummary {
    /// Ticket plus sale revenue.
    pub fn gross(&self) -> Money {
        self.ticket_revenue + self.sale_revenue
    }

    /// Gross minus expenses. Negative means the branch ran at a loss.
    pub fn net(&self) -> Money {
        self.gross() - self.expense_total
    }
}

/// Condenses one day's rows into a [`DailySummary`].
///
/// Callers pass rows already filtered to the day (see
/// [`crate::session::day_bounds`] for the venue-local day range).
pub fn summarize_day(
    date: NaiveDate,
    tickets: &[Ticket],
    sales: &[Sale],
    expenses: &[Expense],
) -> DailySummary {
    let admitted = tickets.iter().filter(|t| !t.refunded);

    DailySummary {
        date,
        tickets_issued: tickets.len() as i64,
        guests: admitted.clone().map(|t| t.guest_count).sum(),
        ticket_revenue: admitted.map(|t| Money::from_paisa(t.price_paisa)).sum(),
        sales_count: sales.len() as i64,
        sale_revenue: sales.iter().map(|s| Money::from_paisa(s.total_paisa)).sum(),
        expenses_count: expenses.len() as i64,
        expense_total: expenses.iter().map(|e| Money::from_paisa(e.amount_paisa)).sum(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::{TimeZone, Utc};

    fn ticket(n: u32, price: i64, guests: i64, refunded: bool) -> Ticket {
        let at = Utc.with_ymd_and_hms(2026, 2, 7, 4, 15, 0).unwrap();
        Ticket {
            id: format!("t-{n}"),
            ticket_number: format!("20260207-01-{n:04}"),
            branch_code: "01".to_string(),
            customer_name: None,
            guest_count: guests,
            price_paisa: price,
            payment_method: PaymentMethod::Cash,
            start_time: at,
            extra_minutes: 0,
            refunded,
            created_at: at,
            updated_at: at,
        }
    }

    fn sale(n: u32, total: i64) -> Sale {
        let at = Utc.with_ymd_and_hms(2026, 2, 7, 6, 0, 0).unwrap();
        Sale {
            id: format!("s-{n}"),
            sale_number: format!("20260207-01-{n:04}"),
            branch_code: "01".to_string(),
            subtotal_paisa: total,
            discount_paisa: 0,
            total_paisa: total,
            payment_method: PaymentMethod::Esewa,
            notes: None,
            created_at: at,
        }
    }

    fn expense(n: u32, amount: i64) -> Expense {
        let at = Utc.with_ymd_and_hms(2026, 2, 7, 8, 0, 0).unwrap();
        Expense {
            id: format!("e-{n}"),
            expense_number: format!("20260207-01-{n:04}"),
            branch_code: "01".to_string(),
            category: "maintenance".to_string(),
            description: None,
            amount_paisa: amount,
            created_at: at,
        }
    }

    #[test]
    fn test_summarize_day() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let tickets = [
            ticket(1, 15_000, 2, false),
            ticket(2, 15_000, 1, false),
            ticket(3, 15_000, 4, true), // refunded
        ];
        let sales = [sale(1, 36_000), sale(2, 4_000)];
        let expenses = [expense(1, 20_000)];

        let s = summarize_day(date, &tickets, &sales, &expenses);

        assert_eq!(s.tickets_issued, 3);
        assert_eq!(s.guests, 3); // refunded ticket's guests excluded
        assert_eq!(s.ticket_revenue.paisa(), 30_000);
        assert_eq!(s.sales_count, 2);
        assert_eq!(s.sale_revenue.paisa(), 40_000);
        assert_eq!(s.expenses_count, 1);
        assert_eq!(s.expense_total.paisa(), 20_000);
        assert_eq!(s.gross().paisa(), 70_000);
        assert_eq!(s.net().paisa(), 50_000);
    }

    #[test]
    fn test_empty_day() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let s = summarize_day(date, &[], &[], &[]);

        assert_eq!(s.tickets_issued, 0);
        assert_eq!(s.gross(), Money::zero());
        assert_eq!(s.net(), Money::zero());
    }

    #[test]
    fn test_loss_day_goes_negative() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let s = summarize_day(date, &[], &[], &[expense(1, 5_000)]);

        assert!(s.net().is_negative());
        assert_eq!(s.net().paisa(), -5_000);
    }
}
