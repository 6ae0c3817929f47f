//! # Receipt Numbering
//!
//! Formats business numbers from allocated counter values.
//!
//! Allocation and formatting are deliberately separate: the database layer
//! owns the atomic counter increment, this module only renders the issued
//! value into the printable `YYYYMMDD-BB-NNNN` shape. Uniqueness comes from
//! the counter, not from the format.

use chrono::{DateTime, Duration, Utc};

use crate::session::ClockOffset;

/// Formats a business number as `YYYYMMDD-BB-NNNN`.
///
/// ## Format
/// - `YYYYMMDD`: venue-local issue date (the date the customer sees)
/// - `BB`: branch code, last two characters
/// - `NNNN`: allocated sequence value, zero-padded to 4 digits (wider
///   values simply grow)
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use khel_core::numbering::receipt_number;
/// use khel_core::session::ClockOffset;
///
/// let issued = Utc.with_ymd_and_hms(2026, 2, 7, 4, 15, 0).unwrap();
/// assert_eq!(
///     receipt_number(issued, ClockOffset::VENUE, "01", 42),
///     "20260207-01-0042"
/// );
/// ```
pub fn receipt_number(
    issued_at: DateTime<Utc>,
    offset: ClockOffset,
    branch_code: &str,
    seq: i64,
) -> String {
    let local = issued_at + Duration::minutes(offset.minutes() as i64);
    let date_part = local.format("%Y%m%d");

    format!("{}-{}-{:04}", date_part, branch_tag(branch_code), seq)
}

/// Last two characters of the branch code, or `00` when shorter.
fn branch_tag(branch_code: &str) -> String {
    let chars: Vec<char> = branch_code.chars().collect();
    if chars.len() < 2 {
        "00".to_string()
    } else {
        chars[chars.len() - 2..].iter().collect()
    }
}
