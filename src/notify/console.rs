//! Terminal notification backend
//!
//! Prints notifications to stdout and keeps daily schedules in memory. The
//! reminder loop asks it which reminders fell due and delivers them.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Mutex;

use super::{Notification, NotificationBackend, NotifyError, PermissionStatus, TimeOfDay, Trigger};

/// Notification backend that writes to the terminal
#[derive(Debug)]
pub struct ConsoleBackend {
    permission: Mutex<PermissionStatus>,
    /// Answer given when permission is requested
    grant_on_request: bool,
    scheduled: Mutex<Vec<(Notification, TimeOfDay)>>,
    delivered: Mutex<Vec<Notification>>,
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleBackend {
    /// Creates a backend that grants permission when asked
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(PermissionStatus::Undetermined),
            grant_on_request: true,
            scheduled: Mutex::new(Vec::new()),
            delivered: Mutex::new(Vec::new()),
        }
    }

    /// Creates a backend that refuses permission when asked
    pub fn denying() -> Self {
        Self {
            grant_on_request: false,
            ..Self::new()
        }
    }

    /// Prints `notification` and records it as delivered
    pub fn deliver(&self, notification: &Notification) {
        println!("[{}] {}", notification.title, notification.body);
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
    }

    /// Every notification delivered so far, oldest first
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Currently installed daily schedules
    pub fn scheduled(&self) -> Vec<(Notification, TimeOfDay)> {
        self.scheduled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Scheduled notifications whose time falls in `(after, until]`
    pub fn due_between(&self, after: NaiveDateTime, until: NaiveDateTime) -> Vec<Notification> {
        self.scheduled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(_, time)| time.occurs_between(after, until))
            .map(|(notification, _)| notification.clone())
            .collect()
    }

    fn status(&self) -> PermissionStatus {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl NotificationBackend for ConsoleBackend {
    async fn permission_status(&self) -> PermissionStatus {
        self.status()
    }

    async fn request_permission(&self) -> PermissionStatus {
        let answer = if self.grant_on_request {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        *self.permission.lock().unwrap_or_else(|e| e.into_inner()) = answer;
        answer
    }

    async fn schedule(
        &self,
        notification: Notification,
        trigger: Trigger,
    ) -> Result<(), NotifyError> {
        if self.status() == PermissionStatus::Denied {
            return Err(NotifyError::PermissionDenied);
        }

        match trigger {
            Trigger::Immediate => self.deliver(&notification),
            Trigger::Daily(time) => self
                .scheduled
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((notification, time)),
        }
        Ok(())
    }

    async fn cancel_all_scheduled(&self) -> Result<(), NotifyError> {
        self.scheduled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        Ok(())
    }
}
