//! Service configuration
//!
//! Defaults match the public providers and the twice-daily reminder schedule;
//! the CLI overrides individual fields.

use std::path::PathBuf;
use std::time::Duration;

use crate::notify::TimeOfDay;

/// Random quote endpoint
pub const QUOTE_API_URL: &str = "https://api.quotable.io/random";

/// Random scripture passage endpoint
pub const VERSE_API_URL: &str = "https://labs.bible.org/api/?passage=random&format=json";

/// Per-request timeout for provider calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between the quote and verse notifications of an immediate send
pub const NOTIFICATION_STAGGER: Duration = Duration::from_secs(2);

/// How often the reminder loop checks for due reminders
pub const REMINDER_TICK: Duration = Duration::from_secs(30);

/// Default reminder times: 08:00 and 18:00 local time
pub const DEFAULT_REMINDER_TIMES: [TimeOfDay; 2] = [
    TimeOfDay { hour: 8, minute: 0 },
    TimeOfDay { hour: 18, minute: 0 },
];

/// Configuration for the content and notification services
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Quote provider URL
    pub quote_url: String,
    /// Verse provider URL
    pub verse_url: String,
    /// Timeout applied to each provider request
    pub request_timeout: Duration,
    /// Gap between the two notifications of an immediate send
    pub notification_stagger: Duration,
    /// Local times of the daily reminders
    pub reminder_times: Vec<TimeOfDay>,
    /// Interval of the reminder loop
    pub reminder_tick: Duration,
    /// Storage directory; `None` uses the platform cache directory
    pub data_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            quote_url: QUOTE_API_URL.to_string(),
            verse_url: VERSE_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            notification_stagger: NOTIFICATION_STAGGER,
            reminder_times: DEFAULT_REMINDER_TIMES.to_vec(),
            reminder_tick: REMINDER_TICK,
            data_dir: None,
        }
    }
}
