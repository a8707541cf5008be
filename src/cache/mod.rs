//! Cache module for the day's content
//!
//! This module provides a key-value store abstraction with a file-per-key
//! implementation, and the date-keyed `DailyCache` built on top of it. The
//! cache degrades to "always stale, always empty" when storage fails, so the
//! resolver can always fall through to fetching new content.

mod daily;
mod store;

pub use daily::{CachedContent, DailyCache, SavedQuote, SavedVerse};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
