//! Daily quote and bible verse library
//!
//! Resolves one inspirational quote and one scripture verse per local calendar
//! day, caches them so the content stays stable within the day, and delivers
//! them as local notifications.

pub mod app;
pub mod cache;
pub mod cli;
pub mod clock;
pub mod config;
pub mod content;
pub mod notify;
pub mod resolver;

pub use app::DailyApp;
pub use content::{DailyContent, QuoteItem, VerseItem};
pub use resolver::ContentResolver;
