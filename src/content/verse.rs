//! Bible passage API client
//!
//! Fetches a random passage from labs.bible.org and turns the first entry into
//! a verse with a "Book Chapter:Verse" reference.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

use super::{build_http_client, ContentSource, FetchError, VerseItem};
use crate::config::{DEFAULT_REQUEST_TIMEOUT, VERSE_API_URL};

/// A single passage entry from the provider
#[derive(Debug, Deserialize)]
struct PassageEntry {
    bookname: Option<String>,
    chapter: Option<VerseNumber>,
    verse: Option<VerseNumber>,
    text: Option<String>,
}

/// Chapter or verse number
///
/// The live provider sends these as strings; other providers use numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VerseNumber {
    Number(u64),
    Float(f64),
    Text(String),
}

impl VerseNumber {
    fn is_blank(&self) -> bool {
        matches!(self, VerseNumber::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for VerseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseNumber::Number(n) => write!(f, "{}", n),
            VerseNumber::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{:.0}", n),
            VerseNumber::Float(n) => write!(f, "{}", n),
            VerseNumber::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

/// Client for fetching a random scripture passage
#[derive(Debug, Clone)]
pub struct VerseClient {
    client: Client,
    url: String,
}

impl Default for VerseClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseClient {
    /// Create a new VerseClient pointing at the public provider
    pub fn new() -> Self {
        Self::with_url(VERSE_API_URL)
    }

    /// Create a new VerseClient for a custom endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_client(build_http_client(DEFAULT_REQUEST_TIMEOUT), url)
    }

    /// Create a new VerseClient with a custom HTTP client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch a random verse
    ///
    /// # Returns
    /// * `Ok(VerseItem)` - The first passage entry with its combined reference
    /// * `Err(FetchError)` - On transport errors, non-success status, or malformed body
    pub async fn fetch_verse(&self) -> Result<VerseItem, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;

        parse_verse(&text)
    }
}

#[async_trait]
impl ContentSource<VerseItem> for VerseClient {
    fn name(&self) -> &'static str {
        "verse"
    }

    async fn fetch(&self) -> Result<VerseItem, FetchError> {
        self.fetch_verse().await
    }
}

/// Parse a provider response body into a VerseItem
///
/// Only the first entry is read; later entries may have any shape.
fn parse_verse(body: &str) -> Result<VerseItem, FetchError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body)?;

    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Malformed("empty passage list".to_string()))?;
    let first: PassageEntry = serde_json::from_value(first)?;

    let text = first
        .text
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| FetchError::Malformed("missing verse text".to_string()))?;
    let book = first
        .bookname
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| FetchError::Malformed("missing bookname".to_string()))?;
    let chapter = first
        .chapter
        .filter(|n| !n.is_blank())
        .ok_or_else(|| FetchError::Malformed("missing chapter".to_string()))?;
    let verse = first
        .verse
        .filter(|n| !n.is_blank())
        .ok_or_else(|| FetchError::Malformed("missing verse number".to_string()))?;

    Ok(VerseItem {
        text,
        reference: format!("{} {}:{}", book.trim(), chapter, verse),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_numeric_chapter_and_verse() {
        let body = r#"[{"text": "V", "bookname": "John", "chapter": 3, "verse": 16}]"#;

        let verse = parse_verse(body).expect("Failed to parse verse");

        assert_eq!(verse.text, "V");
        assert_eq!(verse.reference, "John 3:16");
    }

    #[test]
    fn test_parse_string_chapter_and_verse() {
        let body = r#"[
            {"bookname": "Psalms", "chapter": "23", "verse": "1",
             "text": "The Lord is my shepherd."},
            {"bookname": "Psalms", "chapter": "23", "verse": "2",
             "text": "He makes me lie down."}
        ]"#;

        let verse = parse_verse(body).expect("Failed to parse verse");

        assert_eq!(verse.reference, "Psalms 23:1");
        assert_eq!(verse.text, "The Lord is my shepherd.");
    }

    #[test]
    fn test_parse_empty_array_is_malformed() {
        let result = parse_verse("[]");

        match result {
            Err(FetchError::Malformed(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected Malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_bookname_is_malformed() {
        let result = parse_verse(r#"[{"text": "V", "chapter": 3, "verse": 16}]"#);

        match result {
            Err(FetchError::Malformed(msg)) => assert!(msg.contains("bookname")),
            other => panic!("Expected Malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_blank_verse_number_is_malformed() {
        let body = r#"[{"text": "V", "bookname": "John", "chapter": "3", "verse": ""}]"#;

        let result = parse_verse(body);

        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_parse_ignores_entries_after_the_first() {
        let body = r#"[{"text": "V", "bookname": "John", "chapter": 3, "verse": 16}, null, 7]"#;

        let verse = parse_verse(body).expect("Failed to parse verse");

        assert_eq!(verse.reference, "John 3:16");
    }

    #[test]
    fn test_parse_whole_float_numbers() {
        let body = r#"[{"text": "V", "bookname": "John", "chapter": 3.0, "verse": 16.0}]"#;

        let verse = parse_verse(body).expect("Failed to parse verse");

        assert_eq!(verse.reference, "John 3:16");
    }

    #[test]
    fn test_parse_null_first_entry_is_error() {
        assert!(matches!(parse_verse("[null]"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_object_instead_of_array() {
        let result = parse_verse(r#"{"text": "V"}"#);

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_verse_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "text": "V", "bookname": "John", "chapter": 3, "verse": 16 }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VerseClient::with_url(mock_server.uri());
        let verse = client.fetch().await.expect("Fetch should succeed");

        assert_eq!(
            verse,
            VerseItem {
                text: "V".to_string(),
                reference: "John 3:16".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_verse_not_found_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = VerseClient::with_url(mock_server.uri());

        assert!(matches!(client.fetch().await, Err(FetchError::Http(_))));
    }
}
