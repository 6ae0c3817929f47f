//! # Seed Data Generator
//!
//! Populates the database with a demo day of branch activity.
//!
//! ## Usage
//! ```bash
//! # Seed 20 tickets (default) into ./khel.db
//! cargo run -p khel-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p khel-db --bin seed -- --count 50 --db ./data/khel.db
//! ```
//!
//! Generates tickets (a few refunded, a few topped up), counter sales, and
//! expenses, then prints the venue-local day summary.

use std::env;

use chrono::{Duration, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use khel_core::session::ClockOffset;
use khel_core::{NewExpense, NewSale, NewSaleItem, NewTicket, PaymentMethod};
use khel_db::{Database, DbConfig, DbResult};

const CUSTOMERS: &[&str] = &[
    "Asmita", "Bibek", "Chandra", "Dipesh", "Gita", "Kiran", "Maya", "Nabin", "Prakash", "Sunita",
];

const SNACKS: &[(&str, i64)] = &[
    ("Momo plate", 12_000),
    ("Chiya", 2_500),
    ("Mango juice", 4_000),
    ("Chatpate", 5_000),
    ("Water bottle", 2_000),
];

const EXPENSE_CATEGORIES: &[(&str, i64)] = &[
    ("supplies", 8_000),
    ("maintenance", 20_000),
    ("utilities", 15_000),
];

#[tokio::main]
async fn main() -> DbResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (db_path, count) = parse_args();
    info!(path = %db_path, count, "Seeding demo data");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let offset = ClockOffset::VENUE;
    let tickets = db.tickets();

    for i in 0..count {
        let start = Utc::now() - Duration::minutes((count - i) as i64 * 3);
        let ticket = tickets
            .issue(
                &NewTicket {
                    branch_code: "01".to_string(),
                    customer_name: Some(CUSTOMERS[i % CUSTOMERS.len()].to_string()),
                    guest_count: (i % 4 + 1) as i64,
                    price_paisa: 15_000,
                    payment_method: match i % 3 {
                        0 => PaymentMethod::Cash,
                        1 => PaymentMethod::Esewa,
                        _ => PaymentMethod::Card,
                    },
                    start_time: start,
                },
                offset,
            )
            .await?;

        // Every fifth customer buys extra time, every seventh refunds
        if i % 5 == 0 {
            tickets.add_extra_time(&ticket.id, 30).await?;
        }
        if i % 7 == 6 {
            tickets.refund(&ticket.id).await?;
        }
    }

    for i in 0..count / 2 {
        let (name, price) = SNACKS[i % SNACKS.len()];
        db.sales()
            .record(
                &NewSale {
                    branch_code: "01".to_string(),
                    items: vec![NewSaleItem {
                        name: name.to_string(),
                        unit_price_paisa: price,
                        quantity: (i % 3 + 1) as i64,
                    }],
                    discount_paisa: 0,
                    payment_method: PaymentMethod::Cash,
                    notes: None,
                },
                offset,
            )
            .await?;
    }

    for (category, amount) in EXPENSE_CATEGORIES {
        db.expenses()
            .record(
                &NewExpense {
                    branch_code: "01".to_string(),
                    category: category.to_string(),
                    description: None,
                    amount_paisa: *amount,
                },
                offset,
            )
            .await?;
    }

    let today = (Utc::now() + Duration::minutes(offset.minutes() as i64)).date_naive();
    let summary = db.summaries().daily(today, offset).await?;

    println!("Seeded {} for {}", db_path, summary.date);
    println!("  tickets issued : {}", summary.tickets_issued);
    println!("  guests admitted: {}", summary.guests);
    println!("  ticket revenue : {}", summary.ticket_revenue);
    println!("  sale revenue   : {}", summary.sale_revenue);
    println!("  expenses       : {}", summary.expense_total);
    println!("  net            : {}", summary.net());

    db.close().await;
    Ok(())
}

/// Parses `--db <path>` and `--count <n>` with defaults.
fn parse_args() -> (String, usize) {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./khel.db".to_string();
    let mut count = 20usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            "--count" if i + 1 < args.len() => {
                count = args[i + 1].parse().unwrap_or(20);
                i += 2;
            }
            _ => i += 1,
        }
    }

    (db_path, count)
}
