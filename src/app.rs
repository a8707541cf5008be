//! Application wiring
//!
//! `DailyApp` builds the store, cache, providers, resolver and notification
//! scheduler from a `ServiceConfig`, and exposes the actions behind the
//! command-line flags.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::cache::{DailyCache, FileStore, KeyValueStore, MemoryStore, SavedQuote};
use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::content::{build_http_client, DailyContent, QuoteClient, QuoteItem, VerseClient};
use crate::notify::{
    default_reminders, reminders_at, ConsoleBackend, NotificationScheduler, NotifyError,
    ReminderHandle,
};
use crate::resolver::ContentResolver;

/// Shown when the user refuses notification permission
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Permission Denied: please enable notifications in your device settings to receive daily inspiration.";

/// The quote/verse application
pub struct DailyApp {
    config: ServiceConfig,
    clock: Arc<dyn Clock>,
    resolver: ContentResolver,
    scheduler: NotificationScheduler<ConsoleBackend>,
}

impl DailyApp {
    /// Creates the application with a terminal notification backend
    pub fn new(config: ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_backend(config, clock, Arc::new(ConsoleBackend::new()))
    }

    /// Creates the application with a specific console backend
    pub fn with_backend(
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
        backend: Arc<ConsoleBackend>,
    ) -> Self {
        let store = open_store(&config);
        let cache = Arc::new(DailyCache::new(store, clock.clone()));

        let http = build_http_client(config.request_timeout);
        let quotes = Arc::new(QuoteClient::with_client(http.clone(), config.quote_url.clone()));
        let verses = Arc::new(VerseClient::with_client(http, config.verse_url.clone()));
        let resolver = ContentResolver::new(cache, quotes, verses);

        let scheduler =
            NotificationScheduler::new(backend).with_stagger(config.notification_stagger);

        Self {
            config,
            clock,
            resolver,
            scheduler,
        }
    }

    /// Today's content, fetched only if nothing fresh is cached
    pub async fn resolve(&self) -> DailyContent {
        self.resolver.resolve().await
    }

    /// New content regardless of what is cached
    pub async fn refresh(&self) -> DailyContent {
        self.resolver.refresh().await
    }

    /// Sends `content` as two notifications right away
    pub async fn send_now(&self, content: &DailyContent) -> Result<(), NotifyError> {
        if !self.scheduler.request_permission().await {
            return Err(NotifyError::PermissionDenied);
        }
        self.scheduler
            .send_immediate(&content.quote, &content.verse)
            .await
    }

    /// Installs the daily reminders at the configured times
    ///
    /// An empty time list installs the standard 08:00 and 18:00 reminders.
    ///
    /// # Returns
    /// The number of reminders installed
    pub async fn enable_daily_notifications(&self) -> Result<usize, NotifyError> {
        if !self.scheduler.request_permission().await {
            return Err(NotifyError::PermissionDenied);
        }
        let reminders = if self.config.reminder_times.is_empty() {
            default_reminders()
        } else {
            reminders_at(&self.config.reminder_times)
        };
        self.scheduler.schedule_recurring(&reminders).await
    }

    /// Starts delivering the installed reminders in the background
    pub fn watch(&self) -> ReminderHandle {
        ReminderHandle::spawn(
            self.scheduler.backend().clone(),
            self.clock.clone(),
            self.config.reminder_tick,
        )
    }

    /// Saves `quote` to the favourites list
    pub fn add_favorite(&self, quote: &QuoteItem) -> SavedQuote {
        self.resolver.cache().add_favorite(quote)
    }

    /// All saved favourites
    pub fn favorites(&self) -> Vec<SavedQuote> {
        self.resolver.cache().favorite_quotes()
    }

    /// Configuration the app was built with
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Opens the configured store, falling back to memory if no directory exists
fn open_store(config: &ServiceConfig) -> Arc<dyn KeyValueStore> {
    let store = match &config.data_dir {
        Some(dir) => Some(FileStore::with_dir(dir)),
        None => FileStore::new(),
    };

    match store {
        Some(store) => {
            log::debug!("Storing content in {}", store.dir().display());
            Arc::new(store)
        }
        None => {
            log::warn!("No cache directory available; content will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Formats the day's content for the terminal
pub fn render_content(content: &DailyContent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily Quote");
    let _ = writeln!(out, "  \"{}\"", content.quote.text);
    let _ = writeln!(out, "    - {}", content.quote.author);
    let _ = writeln!(out);
    let _ = writeln!(out, "Bible Verse of the Day");
    let _ = writeln!(out, "  {}", content.verse.text);
    let _ = write!(out, "    {}", content.verse.reference);
    out
}

/// Formats the favourites list for the terminal
pub fn render_favorites(favorites: &[SavedQuote]) -> String {
    if favorites.is_empty() {
        return "No favorite quotes yet.".to_string();
    }

    favorites
        .iter()
        .map(|f| format!("{}  \"{}\" - {}", f.date, f.text, f.author))
        .collect::<Vec<_>>()
        .join("\n")
}
