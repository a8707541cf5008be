//! Date-keyed cache for the day's quote and verse
//!
//! Content is stored as two records (`dailyQuote`, `dailyVerse`) plus a
//! `lastUpdate` marker. The marker alone decides freshness. Storage failures
//! are logged and treated as "nothing cached" so callers always get a value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::store::KeyValueStore;
use crate::clock::Clock;
use crate::content::{DailyContent, QuoteItem, VerseItem};

const QUOTE_KEY: &str = "dailyQuote";
const VERSE_KEY: &str = "dailyVerse";
const LAST_UPDATE_KEY: &str = "lastUpdate";
const FAVORITES_KEY: &str = "favoriteQuotes";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted form of the day's quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuote {
    pub text: String,
    pub author: String,
    pub date: NaiveDate,
}

/// Persisted form of the day's verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedVerse {
    pub text: String,
    pub reference: String,
    pub date: NaiveDate,
}

/// Whatever is currently stored, fresh or not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedContent {
    pub quote: Option<SavedQuote>,
    pub verse: Option<SavedVerse>,
}

/// Cache of the current day's content
pub struct DailyCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl DailyCache {
    /// Creates a cache over `store`, using `clock` to decide what "today" is
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The local calendar date according to the cache's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Reads the stored quote and verse
    ///
    /// Missing, unreadable or undecodable records come back as `None`.
    pub fn read_current(&self) -> CachedContent {
        CachedContent {
            quote: self.read_json(QUOTE_KEY),
            verse: self.read_json(VERSE_KEY),
        }
    }

    /// Whether the `lastUpdate` marker equals today
    pub fn is_fresh(&self) -> bool {
        let marker = match self.store.get(LAST_UPDATE_KEY) {
            Ok(Some(marker)) => marker,
            Ok(None) => return false,
            Err(e) => {
                log::error!("Error checking date: {}", e);
                return false;
            }
        };

        match NaiveDate::parse_from_str(marker.trim(), DATE_FORMAT) {
            Ok(date) => date == self.today(),
            Err(e) => {
                log::warn!("Ignoring unparseable lastUpdate marker '{}': {}", marker, e);
                false
            }
        }
    }

    /// Returns today's content if it is fresh and both records carry text
    ///
    /// Each record must also be dated today, so a write that stopped halfway
    /// never pairs an old quote with a new verse.
    pub fn current_if_fresh(&self) -> Option<DailyContent> {
        if !self.is_fresh() {
            return None;
        }

        let today = self.today();
        let current = self.read_current();
        let quote = current
            .quote
            .filter(|q| q.date == today && !q.text.trim().is_empty())?;
        let verse = current
            .verse
            .filter(|v| v.date == today && !v.text.trim().is_empty())?;

        Some(DailyContent {
            quote: QuoteItem {
                text: quote.text,
                author: quote.author,
            },
            verse: VerseItem {
                text: verse.text,
                reference: verse.reference,
            },
            date: today,
        })
    }

    /// Stores `quote` and `verse` stamped with today's date
    ///
    /// The marker is written last so a partial write never looks fresh.
    /// Returns the content that was resolved whether or not it persisted.
    pub fn write(&self, quote: &QuoteItem, verse: &VerseItem) -> DailyContent {
        let today = self.today();

        let saved_quote = SavedQuote {
            text: quote.text.clone(),
            author: quote.author.clone(),
            date: today,
        };
        let saved_verse = SavedVerse {
            text: verse.text.clone(),
            reference: verse.reference.clone(),
            date: today,
        };

        let result = self
            .write_json(QUOTE_KEY, &saved_quote)
            .and_then(|_| self.write_json(VERSE_KEY, &saved_verse))
            .and_then(|_| {
                self.store
                    .set(LAST_UPDATE_KEY, &today.format(DATE_FORMAT).to_string())
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => log::debug!("Content saved locally for {}", today),
            Err(e) => log::error!("Error saving content: {}", e),
        }

        DailyContent {
            quote: quote.clone(),
            verse: verse.clone(),
            date: today,
        }
    }

    /// Forgets today's content so the next resolve fetches again
    pub fn invalidate(&self) {
        for key in [LAST_UPDATE_KEY, QUOTE_KEY, VERSE_KEY] {
            if let Err(e) = self.store.remove(key) {
                log::error!("Error clearing '{}': {}", key, e);
            }
        }
        log::debug!("Daily content invalidated");
    }

    /// Reads the favourites list; empty on any error
    pub fn favorite_quotes(&self) -> Vec<SavedQuote> {
        self.read_json(FAVORITES_KEY).unwrap_or_default()
    }

    /// Replaces the favourites list
    pub fn save_favorite_quotes(&self, quotes: &[SavedQuote]) {
        if let Err(e) = self.write_json(FAVORITES_KEY, quotes) {
            log::error!("Error saving favorites: {}", e);
        }
    }

    /// Appends `quote` to the favourites, stamped with today's date
    pub fn add_favorite(&self, quote: &QuoteItem) -> SavedQuote {
        let saved = SavedQuote {
            text: quote.text.clone(),
            author: quote.author.clone(),
            date: self.today(),
        };

        let mut favorites = self.favorite_quotes();
        favorites.push(saved.clone());
        self.save_favorite_quotes(&favorites);

        saved
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::error!("Error reading '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring undecodable '{}' record: {}", key, e);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), String> {
        let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
        self.store.set(key, &json).map_err(|e| e.to_string())
    }
}
