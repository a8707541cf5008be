//! Local notifications for the day's content
//!
//! The `NotificationScheduler` turns resolved content into notifications and
//! installs the twice-daily reminders. Delivery itself goes through a
//! `NotificationBackend`, which stands in for the platform notification
//! service.

pub mod console;
pub mod reminder;
pub mod time;

pub use console::ConsoleBackend;
pub use reminder::{ReminderHandle, ReminderMessage};
pub use time::{InvalidTimeOfDay, TimeOfDay};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{DEFAULT_REMINDER_TIMES, NOTIFICATION_STAGGER};
use crate::content::{QuoteItem, VerseItem};

/// Errors that can occur when scheduling notifications
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The user refused notification permission
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The notification service rejected the request
    #[error("Notification backend error: {0}")]
    Backend(String),
}

/// Notification permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Quote,
    Verse,
    Reminder,
}

/// A single alert shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
}

impl Notification {
    /// "Today's Quote" alert
    pub fn quote(quote: &QuoteItem) -> Self {
        Self {
            title: "Today's Quote".to_string(),
            body: format!("\"{}\" - {}", quote.text, quote.author),
            kind: NotificationKind::Quote,
        }
    }

    /// "Bible Verse of the Day" alert
    pub fn verse(verse: &VerseItem) -> Self {
        Self {
            title: "Bible Verse of the Day".to_string(),
            body: format!("{} ({})", verse.text, verse.reference),
            kind: NotificationKind::Verse,
        }
    }

    /// Alert for a daily reminder
    pub fn reminder(reminder: &Reminder) -> Self {
        Self {
            title: reminder.title.clone(),
            body: reminder.body.clone(),
            kind: NotificationKind::Reminder,
        }
    }
}

/// When a notification fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// As soon as possible
    Immediate,
    /// Every day at the given local time
    Daily(TimeOfDay),
}

/// A recurring daily reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub time: TimeOfDay,
    pub title: String,
    pub body: String,
}

impl Reminder {
    /// Reminder with the standard text for its time of day
    pub fn at(time: TimeOfDay) -> Self {
        if time.is_morning() {
            Self {
                time,
                title: "Daily Inspiration".to_string(),
                body: "Your daily quote and bible verse are ready!".to_string(),
            }
        } else {
            Self {
                time,
                title: "Evening Reflection".to_string(),
                body: "Time for your evening dose of inspiration!".to_string(),
            }
        }
    }
}

/// The standard 08:00 and 18:00 reminders
pub fn default_reminders() -> Vec<Reminder> {
    reminders_at(&DEFAULT_REMINDER_TIMES)
}

/// Standard reminders for each of `times`
pub fn reminders_at(times: &[TimeOfDay]) -> Vec<Reminder> {
    times.iter().copied().map(Reminder::at).collect()
}

/// Platform notification service
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Current permission without prompting
    async fn permission_status(&self) -> PermissionStatus;

    /// Prompts for permission and returns the outcome
    async fn request_permission(&self) -> PermissionStatus;

    /// Enqueues `notification` to fire on `trigger`
    async fn schedule(
        &self,
        notification: Notification,
        trigger: Trigger,
    ) -> Result<(), NotifyError>;

    /// Removes every recurring notification
    async fn cancel_all_scheduled(&self) -> Result<(), NotifyError>;
}

/// Schedules content notifications over a backend
pub struct NotificationScheduler<B: NotificationBackend> {
    backend: Arc<B>,
    stagger: Duration,
}

impl<B: NotificationBackend> NotificationScheduler<B> {
    /// Creates a scheduler with the default 2 second stagger
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            stagger: NOTIFICATION_STAGGER,
        }
    }

    /// Overrides the delay between the quote and verse notifications
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// The backend notifications are delivered through
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Ensures notification permission, prompting if needed
    ///
    /// # Returns
    /// `true` if permission is granted, `false` if the user refused
    pub async fn request_permission(&self) -> bool {
        if self.backend.permission_status().await == PermissionStatus::Granted {
            return true;
        }

        match self.backend.request_permission().await {
            PermissionStatus::Granted => true,
            status => {
                log::warn!("Notification permission not granted: {:?}", status);
                false
            }
        }
    }

    /// Replaces all recurring reminders with `reminders`
    ///
    /// Prior schedules are cancelled first, so calling this repeatedly never
    /// accumulates duplicates.
    ///
    /// # Returns
    /// The number of reminders installed
    pub async fn schedule_recurring(&self, reminders: &[Reminder]) -> Result<usize, NotifyError> {
        self.backend.cancel_all_scheduled().await?;

        for reminder in reminders {
            self.backend
                .schedule(Notification::reminder(reminder), Trigger::Daily(reminder.time))
                .await?;
            log::info!("Scheduled daily reminder '{}' at {}", reminder.title, reminder.time);
        }

        Ok(reminders.len())
    }

    /// Sends the quote now and the verse one stagger later
    ///
    /// Two separate alerts are sent so the platform does not merge them.
    pub async fn send_immediate(
        &self,
        quote: &QuoteItem,
        verse: &VerseItem,
    ) -> Result<(), NotifyError> {
        self.backend
            .schedule(Notification::quote(quote), Trigger::Immediate)
            .await?;

        tokio::time::sleep(self.stagger).await;

        self.backend
            .schedule(Notification::verse(verse), Trigger::Immediate)
            .await
    }
}
