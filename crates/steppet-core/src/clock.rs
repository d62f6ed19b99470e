//! Calendar-day resolution and day-boundary arithmetic.
//!
//! Every engine decision that depends on "which day is it" goes through a
//! [`Clock`]. Day comparisons are always made on calendar dates, never on
//! wall-clock durations, so a reading taken at 23:59 and one taken at 00:01
//! are on consecutive days.

use chrono::{Local, NaiveDate};

/// Source of the current local calendar day.
pub trait Clock: Send {
    fn today(&self) -> NaiveDate;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a given day. Used by tests and the CLI `--day` flag.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// True when `next` is the calendar day immediately after `prev`.
pub fn is_next_day(prev: NaiveDate, next: NaiveDate) -> bool {
    prev.succ_opt() == Some(next)
}
