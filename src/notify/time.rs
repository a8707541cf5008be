//! Wall-clock times for daily reminders

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A time string that is not a valid `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time of day: '{0}'. Expected HH:MM (00:00-23:59)")]
pub struct InvalidTimeOfDay(pub String);

/// Hour and minute in local time, e.g. 08:00
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Returns `None` unless `hour < 24` and `minute < 60`
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Converts to a chrono time
    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Whether this time of day occurs in the window `(after, until]`
    pub fn occurs_between(&self, after: NaiveDateTime, until: NaiveDateTime) -> bool {
        if until <= after {
            return false;
        }
        if until - after >= Duration::days(1) {
            return true;
        }

        let time = self.as_naive_time();
        let mut date = after.date();
        while date <= until.date() {
            let candidate = date.and_time(time);
            if candidate > after && candidate <= until {
                return true;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        false
    }

    /// Whether this is before noon
    pub fn is_morning(&self) -> bool {
        self.hour < 12
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTimeOfDay(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
