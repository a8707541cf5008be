//! Background reminder delivery
//!
//! Fires the console backend's daily reminders while the process is running,
//! using a tokio interval and a channel to report deliveries to the caller.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::{ConsoleBackend, Notification};
use crate::clock::Clock;

/// Messages sent from the reminder loop to the caller
#[derive(Debug, Clone)]
pub enum ReminderMessage {
    /// A daily reminder was delivered
    Delivered(Notification),
}

/// Handle for controlling the background reminder loop
pub struct ReminderHandle {
    /// Channel for receiving reminder messages
    pub receiver: mpsc::Receiver<ReminderMessage>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl ReminderHandle {
    /// Spawns the reminder loop
    ///
    /// Every `tick`, delivers each reminder whose time passed since the
    /// previous tick. Reminders whose time passed before the call are not
    /// replayed.
    pub fn spawn(backend: Arc<ConsoleBackend>, clock: Arc<dyn Clock>, tick: Duration) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let mut last_check = clock.now();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now = clock.now();
                        for notification in backend.due_between(last_check, now) {
                            backend.deliver(&notification);
                            log::debug!("Delivered reminder '{}'", notification.title);
                            let message = ReminderMessage::Delivered(notification);
                            if msg_tx.send(message).await.is_err() {
                                return;
                            }
                        }
                        last_check = now;
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Stops the reminder loop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
