//! Quotable API client
//!
//! Fetches a random quote and validates that both the quote text and the
//! author are present.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;

use super::{build_http_client, ContentSource, FetchError, QuoteItem};
use crate::config::{DEFAULT_REQUEST_TIMEOUT, QUOTE_API_URL};

/// Response body from the quote provider
#[derive(Debug, Deserialize)]
struct QuotableResponse {
    content: Option<String>,
    author: Option<String>,
}

/// Client for fetching a random quote
#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: Client,
    url: String,
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteClient {
    /// Create a new QuoteClient pointing at the public provider
    pub fn new() -> Self {
        Self::with_url(QUOTE_API_URL)
    }

    /// Create a new QuoteClient for a custom endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_client(build_http_client(DEFAULT_REQUEST_TIMEOUT), url)
    }

    /// Create a new QuoteClient with a custom HTTP client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch a random quote
    ///
    /// # Returns
    /// * `Ok(QuoteItem)` - A quote with non-empty text and author
    /// * `Err(FetchError)` - On transport errors, non-success status, or malformed body
    pub async fn fetch_quote(&self) -> Result<QuoteItem, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;

        parse_quote(&text)
    }
}

#[async_trait]
impl ContentSource<QuoteItem> for QuoteClient {
    fn name(&self) -> &'static str {
        "quote"
    }

    async fn fetch(&self) -> Result<QuoteItem, FetchError> {
        self.fetch_quote().await
    }
}

/// Parse a provider response body into a QuoteItem
fn parse_quote(body: &str) -> Result<QuoteItem, FetchError> {
    let response: QuotableResponse = serde_json::from_str(body)?;

    let text = non_empty(response.content)
        .ok_or_else(|| FetchError::Malformed("missing quote content".to_string()))?;
    let author = non_empty(response.author)
        .ok_or_else(|| FetchError::Malformed("missing quote author".to_string()))?;

    Ok(QuoteItem { text, author })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
