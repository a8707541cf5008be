//! Source of "today" for freshness checks
//!
//! The cache and reminder loop never read the system time directly; they go
//! through a `Clock` so tests can pin or advance the calendar day.

use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Mutex;

/// Provides the local calendar date and time
pub trait Clock: Send + Sync {
    /// The current local date-time
    fn now(&self) -> NaiveDateTime;

    /// The current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the system's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually controlled clock
///
/// Starts at the given instant and only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Creates a clock pinned to `now`
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a clock pinned to midday on `date`
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)))
    }

    /// Moves the clock to `now`
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Moves the clock forward by whole days, keeping the time of day
    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = now.checked_add_days(Days::new(days)) {
            *now = next;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
