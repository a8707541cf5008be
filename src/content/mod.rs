//! Core content types and the providers that produce them
//!
//! A day's content is one quote plus one scripture verse. Each comes from its
//! own remote provider, with a bundled fallback set for when the provider is
//! unreachable or returns something unusable.

pub mod fallback;
pub mod quote;
pub mod verse;

pub use fallback::{
    is_fallback_quote, is_fallback_verse, random_quote, random_verse, FALLBACK_QUOTES,
    FALLBACK_VERSES,
};
pub use quote::QuoteClient;
pub use verse::VerseClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// An inspirational quote and who said it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub text: String,
    pub author: String,
}

/// A scripture passage and its human-readable reference (e.g. "John 3:16")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseItem {
    pub text: String,
    pub reference: String,
}

/// The quote and verse shown for one local calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContent {
    pub quote: QuoteItem,
    pub verse: VerseItem,
    /// Day the content was generated for, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// Errors that can occur when fetching from a content provider
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but lacks required content
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// A remote source of one kind of content
#[async_trait]
pub trait ContentSource<T>: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Fetches one item, failing on transport errors or unusable bodies
    async fn fetch(&self) -> Result<T, FetchError>;
}

/// Builds the HTTP client shared by the providers
///
/// Falls back to reqwest's defaults (no timeout) if the builder is rejected.
pub(crate) fn build_http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        log::warn!("Failed to build HTTP client with timeout: {}", e);
        Client::new()
    })
}
