//! # Session Windows
//!
//! Time-window arithmetic for session tickets on the fixed venue clock.
//!
//! ## The Venue Clock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Instants are UTC everywhere (database, sync, QR payloads).         │
//! │                                                                     │
//! │  Display is venue wall-clock time at a FIXED offset (UTC+5:45).     │
//! │  The offset is an explicit value passed to every conversion:        │
//! │                                                                     │
//! │    UTC 04:15 ── +5:45 ──► 10:00 on the printed ticket               │
//! │                                                                     │
//! │  The host timezone is NEVER consulted. A branch server deployed     │
//! │  anywhere prints the same times.                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session Length
//! A ticket grants [`BASE_SESSION_MINUTES`] plus any purchased extra time.
//! Once a ticket is refunded the base grant is gone; only already-purchased
//! extra time still counts. A refunded ticket with no top-ups has a zero
//! window and scans as expired.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes granted by a plain session ticket before any top-ups.
pub const BASE_SESSION_MINUTES: i64 = 60;

const MINUTES_PER_DAY: i64 = 24 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

// =============================================================================
// Clock Offset
// =============================================================================

/// A fixed UTC offset, in minutes east of UTC.
///
/// Kept as an explicit value rather than a hidden constant so the offset is
/// visible at every call site and tests can exercise other offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockOffset {
    minutes: i32,
}

impl ClockOffset {
    /// The venue clock: UTC+5:45.
    pub const VENUE: ClockOffset = ClockOffset::from_hm(5, 45);

    /// Creates an offset from minutes east of UTC (negative = west).
    #[inline]
    pub const fn from_minutes(minutes: i32) -> Self {
        ClockOffset { minutes }
    }

    /// Creates an offset from hours and minutes.
    ///
    /// For western offsets only the hour carries the sign:
    /// `from_hm(-5, 30)` is UTC-5:30.
    #[inline]
    pub const fn from_hm(hours: i32, minutes: i32) -> Self {
        if hours < 0 {
            ClockOffset { minutes: hours * 60 - minutes }
        } else {
            ClockOffset { minutes: hours * 60 + minutes }
        }
    }

    /// Returns the offset in minutes east of UTC.
    #[inline]
    pub const fn minutes(&self) -> i32 {
        self.minutes
    }
}

// =============================================================================
// Local Time
// =============================================================================

/// Wall-clock time-of-day components at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl LocalTime {
    /// Time-of-day expressed as minutes since local midnight (seconds dropped).
    #[inline]
    pub const fn minutes_of_day(&self) -> i64 {
        self.hours as i64 * 60 + self.minutes as i64
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Converts an absolute instant to wall-clock components at a fixed offset.
///
/// The instant's UTC seconds-of-day are shifted by the offset and wrapped at
/// 24h. The host timezone plays no part.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use khel_core::session::{local_time, ClockOffset};
///
/// let instant = Utc.with_ymd_and_hms(2026, 2, 7, 4, 15, 0).unwrap();
/// let at = local_time(instant, ClockOffset::VENUE);
/// assert_eq!((at.hours, at.minutes), (10, 0));
/// ```
pub fn local_time(instant: DateTime<Utc>, offset: ClockOffset) -> LocalTime {
    let utc_seconds = instant.time().num_seconds_from_midnight() as i64;
    let shifted = (utc_seconds + offset.minutes() as i64 * 60).rem_euclid(SECONDS_PER_DAY);

    LocalTime {
        hours: (shifted / 3600) as u32,
        minutes: (shifted % 3600 / 60) as u32,
        seconds: (shifted % 60) as u32,
    }
}

// =============================================================================
// Session Window
// =============================================================================

/// The time window a ticket grants, derived from its stored fields.
///
/// `start` is optional: legacy rows imported from the old register book can
/// lack a start instant, and a window without one is simply not computable.
/// Every operation on such a window answers `None`, never panics, so display
/// layers can render a placeholder.
///
/// ## Precondition
/// `extra_minutes >= 0`. The window does not re-validate; negative input
/// produces a silently shortened window. Callers go through
/// [`crate::validation::validate_extra_minutes`] before storing top-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    /// When the session began, if known.
    pub start: Option<DateTime<Utc>>,

    /// Accumulated purchased extra minutes.
    pub extra_minutes: i64,

    /// Whether the ticket has been refunded.
    pub refunded: bool,
}

impl SessionWindow {
    /// Total minutes this window grants from its start.
    ///
    /// Refund drops the base grant; purchased extra time survives it.
    #[inline]
    pub const fn granted_minutes(&self) -> i64 {
        if self.refunded {
            self.extra_minutes
        } else {
            BASE_SESSION_MINUTES + self.extra_minutes
        }
    }

    /// The session end as venue wall-clock `"HH:MM"`, or `None` if the start
    /// is unknown.
    ///
    /// ## Midnight Rollover
    /// The result is minutes-of-day wrapped modulo 24h: a 23:50 session ends
    /// at "00:50" with no date indication. Receipts are same-day documents
    /// and this is the established display for late sessions; keep the wrap
    /// unless the receipt layout grows a date line.
    pub fn end_time(&self, offset: ClockOffset) -> Option<String> {
        let start = self.start?;
        let total = local_time(start, offset).minutes_of_day() + self.granted_minutes();
        let total = total.rem_euclid(MINUTES_PER_DAY);

        Some(format!("{:02}:{:02}", total / 60, total % 60))
    }

    /// Minutes left on the window at `now`, or `None` if the start is
    /// unknown. Zero or negative means the session is over.
    ///
    /// Pure instant arithmetic; no offset is involved.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        let start = self.start?;
        let elapsed = now.signed_duration_since(start).num_minutes();

        Some(self.granted_minutes() - elapsed)
    }
}

// =============================================================================
// Display Helpers
// =============================================================================

/// Strips everything except ASCII digits and `:` from a stored time string.
///
/// Rows imported from the old register occasionally carry stray characters
/// around the time value. A value is displayable iff the sanitized string is
/// non-empty; otherwise the caller renders a placeholder.
///
/// ## Example
/// ```rust
/// use khel_core::session::sanitize_time;
///
/// assert_eq!(sanitize_time("10:30$$"), "10:30");
/// assert_eq!(sanitize_time("n/a"), "");
/// ```
pub fn sanitize_time(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == ':')
        .collect()
}

/// The UTC instant range `[start, end)` covering one venue-local calendar day.
///
/// Day summaries group by the venue clock, so "2026-02-07" starts at
/// 2026-02-06T18:15:00Z under the venue offset.
pub fn day_bounds(date: NaiveDate, offset: ClockOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_midnight = date.and_time(NaiveTime::MIN);
    let start = Utc.from_utc_datetime(&(local_midnight - Duration::minutes(offset.minutes() as i64)));

    (start, start + Duration::days(1))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn window(start: Option<DateTime<Utc>>, extra: i64, refunded: bool) -> SessionWindow {
        SessionWindow {
            start,
            extra_minutes: extra,
            refunded,
        }
    }

    #[test]
    fn test_offset_constructors() {
        assert_eq!(ClockOffset::VENUE.minutes(), 345);
        assert_eq!(ClockOffset::from_hm(-5, 30).minutes(), -330);
        assert_eq!(ClockOffset::from_minutes(0).minutes(), 0);
    }

    #[test]
    fn test_local_time_applies_offset() {
        // UTC 04:15 is 10:00 on the venue clock
        let at = local_time(utc(2026, 2, 7, 4, 15), ClockOffset::VENUE);
        assert_eq!((at.hours, at.minutes, at.seconds), (10, 0, 0));
        assert_eq!(at.to_string(), "10:00:00");
    }

    #[test]
    fn test_local_time_wraps_past_midnight() {
        // UTC 20:00 is 01:45 next day on the venue clock; only time-of-day
        // is reported
        let at = local_time(utc(2026, 2, 7, 20, 0), ClockOffset::VENUE);
        assert_eq!((at.hours, at.minutes), (1, 45));
    }

    #[test]
    fn test_local_time_western_offset() {
        let at = local_time(utc(2026, 2, 7, 4, 15), ClockOffset::from_hm(-5, 30));
        assert_eq!((at.hours, at.minutes), (22, 45));
    }

    #[test]
    fn test_granted_minutes() {
        assert_eq!(window(None, 0, false).granted_minutes(), 60);
        assert_eq!(window(None, 30, false).granted_minutes(), 90);
        assert_eq!(window(None, 30, true).granted_minutes(), 30);
        assert_eq!(window(None, 0, true).granted_minutes(), 0);
    }

    #[test]
    fn test_end_time_basic() {
        // Venue 10:00 start, 15 extra minutes
        let start = Some(utc(2026, 2, 7, 4, 15));
        assert_eq!(
            window(start, 15, false).end_time(ClockOffset::VENUE).as_deref(),
            Some("11:15")
        );
    }

    #[test]
    fn test_end_time_refund_drops_base_grant() {
        let start = Some(utc(2026, 2, 7, 4, 15));
        assert_eq!(
            window(start, 15, true).end_time(ClockOffset::VENUE).as_deref(),
            Some("10:15")
        );
        // Refunded with no top-ups: window ends where it started
        assert_eq!(
            window(start, 0, true).end_time(ClockOffset::VENUE).as_deref(),
            Some("10:00")
        );
    }

    #[test]
    fn test_end_time_wraps_past_midnight() {
        // Venue 23:50 start (UTC 18:05), base hour only: ends "00:50" with
        // no date indication
        let start = Some(utc(2026, 2, 7, 18, 5));
        assert_eq!(
            window(start, 0, false).end_time(ClockOffset::VENUE).as_deref(),
            Some("00:50")
        );
    }

    #[test]
    fn test_end_time_missing_start() {
        assert_eq!(window(None, 30, false).end_time(ClockOffset::VENUE), None);
    }

    #[test]
    fn test_remaining_counts_down_and_goes_negative() {
        let start = utc(2026, 2, 7, 4, 15);
        let w = window(Some(start), 0, false);

        assert_eq!(w.remaining_minutes(start), Some(60));
        assert_eq!(w.remaining_minutes(start + Duration::minutes(45)), Some(15));
        // 90 minutes in: the base hour elapsed half an hour ago
        assert_eq!(w.remaining_minutes(start + Duration::minutes(90)), Some(-30));
    }

    #[test]
    fn test_remaining_missing_start() {
        assert_eq!(window(None, 0, false).remaining_minutes(utc(2026, 2, 7, 5, 0)), None);
    }

    #[test]
    fn test_sanitize_time() {
        assert_eq!(sanitize_time("10:30$$"), "10:30");
        assert_eq!(sanitize_time(" 9:05 am"), "9:05");
        assert_eq!(sanitize_time("—"), "");
        assert_eq!(sanitize_time(""), "");
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let (start, end) = day_bounds(date, ClockOffset::VENUE);

        assert_eq!(start, utc(2026, 2, 6, 18, 15));
        assert_eq!(end, utc(2026, 2, 7, 18, 15));

        // A venue-morning instant falls inside, the previous UTC evening
        // does not
        let morning = utc(2026, 2, 7, 4, 15);
        assert!(morning >= start && morning < end);
        assert!(utc(2026, 2, 6, 18, 0) < start);
    }
}
