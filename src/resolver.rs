//! Resolves the content shown for today
//!
//! Serves today's cached content when it is fresh; otherwise fetches a quote
//! and a verse concurrently, substitutes a bundled fallback for whichever side
//! failed, and stores the pair as today's content.
//!
//! Concurrent callers share one in-flight resolution per day instead of
//! racing each other to the cache.

use chrono::NaiveDate;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::cache::DailyCache;
use crate::content::{self, ContentSource, DailyContent, QuoteItem, VerseItem};

type SharedResolve = Shared<BoxFuture<'static, DailyContent>>;

/// The resolution currently in progress
struct Flight {
    date: NaiveDate,
    forced: bool,
    id: u64,
    future: SharedResolve,
}

struct Inner {
    cache: Arc<DailyCache>,
    quotes: Arc<dyn ContentSource<QuoteItem>>,
    verses: Arc<dyn ContentSource<VerseItem>>,
    /// Serialises runs so cache writes land in start order
    run_lock: tokio::sync::Mutex<()>,
}

/// Produces today's quote and verse
pub struct ContentResolver {
    inner: Arc<Inner>,
    flight: Mutex<Option<Flight>>,
    next_id: AtomicU64,
}

impl ContentResolver {
    /// Creates a resolver over `cache` and the two content sources
    pub fn new(
        cache: Arc<DailyCache>,
        quotes: Arc<dyn ContentSource<QuoteItem>>,
        verses: Arc<dyn ContentSource<VerseItem>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache,
                quotes,
                verses,
                run_lock: tokio::sync::Mutex::new(()),
            }),
            flight: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// The cache this resolver reads and writes
    pub fn cache(&self) -> &Arc<DailyCache> {
        &self.inner.cache
    }

    /// Today's content, from the cache when fresh
    ///
    /// Never fails: provider problems are replaced by fallback content.
    pub async fn resolve(&self) -> DailyContent {
        self.join_flight(false).await
    }

    /// Discards today's cached content and resolves again
    ///
    /// Always calls the providers (or falls back), even on the same day.
    pub async fn refresh(&self) -> DailyContent {
        self.join_flight(true).await
    }

    /// Joins a compatible in-flight resolution or starts a new one
    ///
    /// A plain resolve joins any flight for today. A forced refresh only joins
    /// another forced refresh, since a plain flight may answer from the cache.
    async fn join_flight(&self, forced: bool) -> DailyContent {
        let today = self.inner.cache.today();

        let (id, future) = {
            let mut slot = self.flight.lock().unwrap_or_else(|e| e.into_inner());
            match slot.as_ref() {
                Some(flight) if flight.date == today && (flight.forced || !forced) => {
                    log::debug!("Joining in-flight resolve {}", flight.id);
                    (flight.id, flight.future.clone())
                }
                _ => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let future = self.inner.clone().run(forced).boxed().shared();
                    *slot = Some(Flight {
                        date: today,
                        forced,
                        id,
                        future: future.clone(),
                    });
                    (id, future)
                }
            }
        };

        let content = future.await;

        let mut slot = self.flight.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().map(|flight| flight.id) == Some(id) {
            *slot = None;
        }

        content
    }
}

impl Inner {
    async fn run(self: Arc<Self>, forced: bool) -> DailyContent {
        let _guard = self.run_lock.lock().await;

        if forced {
            self.cache.invalidate();
        } else if let Some(cached) = self.cache.current_if_fresh() {
            log::debug!("Using saved content from {}", cached.date);
            return cached;
        }

        let (quote, verse) = futures::future::join(self.fetch_quote(), self.fetch_verse()).await;

        self.cache.write(&quote, &verse)
    }

    async fn fetch_quote(&self) -> QuoteItem {
        match self.quotes.fetch().await {
            Ok(quote) if !quote.text.trim().is_empty() => quote,
            Ok(_) => {
                log::warn!("{} provider returned empty text, using fallback", self.quotes.name());
                content::random_quote()
            }
            Err(e) => {
                log::warn!("{} provider failed, using fallback: {}", self.quotes.name(), e);
                content::random_quote()
            }
        }
    }

    async fn fetch_verse(&self) -> VerseItem {
        match self.verses.fetch().await {
            Ok(verse) if !verse.text.trim().is_empty() => verse,
            Ok(_) => {
                log::warn!("{} provider returned empty text, using fallback", self.verses.name());
                content::random_verse()
            }
            Err(e) => {
                log::warn!("{} provider failed, using fallback: {}", self.verses.name(), e);
                content::random_verse()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::clock::FixedClock;
    use crate::content::{
        build_http_client, is_fallback_quote, is_fallback_verse, FetchError, QuoteClient,
        VerseClient,
    };
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Source that returns a fixed item (or a failure) and counts calls
    struct StaticSource<T> {
        item: Option<T>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl<T> StaticSource<T> {
        fn ok(item: T) -> Arc<Self> {
            Arc::new(Self {
                item: Some(item),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                item: None,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(item: T, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                item: Some(item),
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<T: Clone + Send + Sync> ContentSource<T> for StaticSource<T> {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self) -> Result<T, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.item
                .clone()
                .ok_or_else(|| FetchError::Malformed("unavailable".to_string()))
        }
    }

    fn sample_quote() -> QuoteItem {
        QuoteItem {
            text: "Test quote".to_string(),
            author: "Test Author".to_string(),
        }
    }

    fn sample_verse() -> VerseItem {
        VerseItem {
            text: "V".to_string(),
            reference: "John 3:16".to_string(),
        }
    }

    fn create_cache() -> (Arc<DailyCache>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()));
        let cache = Arc::new(DailyCache::new(Arc::new(MemoryStore::new()), clock.clone()));
        (cache, clock)
    }

    #[tokio::test]
    async fn test_valid_providers_content_is_returned_and_cached() {
        let (cache, _clock) = create_cache();
        let quotes = StaticSource::ok(sample_quote());
        let verses = StaticSource::ok(sample_verse());
        let resolver = ContentResolver::new(cache.clone(), quotes, verses);

        let content = resolver.resolve().await;

        assert_eq!(content.quote, sample_quote());
        assert_eq!(content.verse, sample_verse());
        assert!(cache.is_fresh());
        assert_eq!(cache.current_if_fresh(), Some(content));
    }

    #[tokio::test]
    async fn test_failed_providers_fall_back() {
        let (cache, _clock) = create_cache();
        let resolver = ContentResolver::new(
            cache.clone(),
            StaticSource::<QuoteItem>::failing(),
            StaticSource::<VerseItem>::failing(),
        );

        let content = resolver.resolve().await;

        assert!(!content.quote.text.is_empty());
        assert!(is_fallback_quote(&content.quote));
        assert!(is_fallback_verse(&content.verse));
        assert!(cache.is_fresh());
    }

    #[tokio::test]
    async fn test_one_side_failing_does_not_affect_the_other() {
        let (cache, _clock) = create_cache();
        let resolver = ContentResolver::new(
            cache,
            StaticSource::<QuoteItem>::failing(),
            StaticSource::ok(sample_verse()),
        );

        let content = resolver.resolve().await;

        assert!(is_fallback_quote(&content.quote));
        assert_eq!(content.verse, sample_verse());
    }

    #[tokio::test]
    async fn test_empty_text_from_provider_falls_back() {
        let (cache, _clock) = create_cache();
        let resolver = ContentResolver::new(
            cache,
            StaticSource::ok(QuoteItem {
                text: " ".to_string(),
                author: "Nobody".to_string(),
            }),
            StaticSource::ok(sample_verse()),
        );

        let content = resolver.resolve().await;

        assert!(is_fallback_quote(&content.quote));
    }

    #[tokio::test]
    async fn test_second_resolve_same_day_uses_cache() {
        let (cache, _clock) = create_cache();
        let quotes = StaticSource::ok(sample_quote());
        let verses = StaticSource::ok(sample_verse());
        let resolver = ContentResolver::new(cache, quotes.clone(), verses.clone());

        let first = resolver.resolve().await;
        let second = resolver.resolve().await;

        assert_eq!(first, second);
        assert_eq!(quotes.calls(), 1);
        assert_eq!(verses.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_fetches_again_on_same_day() {
        let (cache, _clock) = create_cache();
        let quotes = StaticSource::ok(sample_quote());
        let verses = StaticSource::ok(sample_verse());
        let resolver = ContentResolver::new(cache.clone(), quotes.clone(), verses.clone());

        resolver.resolve().await;
        let refreshed = resolver.refresh().await;

        assert_eq!(quotes.calls(), 2);
        assert_eq!(verses.calls(), 2);
        assert_eq!(cache.current_if_fresh(), Some(refreshed));
    }

    #[tokio::test]
    async fn test_refresh_with_failing_providers_still_yields_fallback() {
        let (cache, _clock) = create_cache();
        cache.write(&sample_quote(), &sample_verse());
        let resolver = ContentResolver::new(
            cache,
            StaticSource::<QuoteItem>::failing(),
            StaticSource::<VerseItem>::failing(),
        );

        let content = resolver.refresh().await;

        assert!(is_fallback_quote(&content.quote));
        assert!(is_fallback_verse(&content.verse));
    }

    #[tokio::test]
    async fn test_new_day_triggers_fetch() {
        let (cache, clock) = create_cache();
        let quotes = StaticSource::ok(sample_quote());
        let verses = StaticSource::ok(sample_verse());
        let resolver = ContentResolver::new(cache, quotes.clone(), verses.clone());

        let first = resolver.resolve().await;
        clock.advance_days(1);
        let second = resolver.resolve().await;

        assert_eq!(quotes.calls(), 2);
        assert_eq!(second.date, first.date.succ_opt().unwrap());
    }

    #[tokio::test]
    async fn test_stale_cache_from_yesterday_is_not_served() {
        let (cache, clock) = create_cache();
        let old_quote = QuoteItem {
            text: "Old quote".to_string(),
            author: "Yesterday".to_string(),
        };
        cache.write(&old_quote, &sample_verse());
        clock.advance_days(1);
        let resolver = ContentResolver::new(
            cache,
            StaticSource::ok(sample_quote()),
            StaticSource::ok(sample_verse()),
        );

        let content = resolver.resolve().await;

        assert_eq!(content.quote, sample_quote());
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_fetch() {
        let (cache, _clock) = create_cache();
        let quotes = StaticSource::slow(sample_quote(), Duration::from_millis(50));
        let verses = StaticSource::slow(sample_verse(), Duration::from_millis(50));
        let resolver = ContentResolver::new(cache, quotes.clone(), verses.clone());

        let (a, b, c) = tokio::join!(resolver.resolve(), resolver.resolve(), resolver.resolve());

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(quotes.calls(), 1);
        assert_eq!(verses.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_fetch() {
        let (cache, _clock) = create_cache();
        let quotes = StaticSource::slow(sample_quote(), Duration::from_millis(50));
        let verses = StaticSource::slow(sample_verse(), Duration::from_millis(50));
        let resolver = ContentResolver::new(cache, quotes.clone(), verses.clone());

        let (a, b) = tokio::join!(resolver.refresh(), resolver.refresh());

        assert_eq!(a, b);
        assert_eq!(quotes.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_scenario_over_http() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": "Test quote",
                "author": "Test Author"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/verse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "text": "V", "bookname": "John", "chapter": 3, "verse": 16 }
            ])))
            .mount(&mock_server)
            .await;

        let (cache, _clock) = create_cache();
        let resolver = ContentResolver::new(
            cache,
            Arc::new(QuoteClient::with_url(format!("{}/quote", mock_server.uri()))),
            Arc::new(VerseClient::with_url(format!("{}/verse", mock_server.uri()))),
        );

        let content = resolver.resolve().await;

        assert_eq!(content.quote, sample_quote());
        assert_eq!(content.verse, sample_verse());
    }

    #[tokio::test]
    async fn test_both_providers_500_scenario_over_http() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let (cache, _clock) = create_cache();
        let resolver = ContentResolver::new(
            cache,
            Arc::new(QuoteClient::with_url(format!("{}/quote", mock_server.uri()))),
            Arc::new(VerseClient::with_url(format!("{}/verse", mock_server.uri()))),
        );

        let content = resolver.resolve().await;

        assert!(is_fallback_quote(&content.quote));
        assert!(is_fallback_verse(&content.verse));
    }

    #[tokio::test]
    async fn test_slow_providers_time_out_to_fallback() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "content": "Too late",
                        "author": "Slow Author"
                    }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/verse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([
                        { "text": "Too late", "bookname": "John", "chapter": 3, "verse": 16 }
                    ]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let http = build_http_client(Duration::from_millis(50));
        let (cache, _clock) = create_cache();
        let resolver = ContentResolver::new(
            cache.clone(),
            Arc::new(QuoteClient::with_client(
                http.clone(),
                format!("{}/quote", mock_server.uri()),
            )),
            Arc::new(VerseClient::with_client(
                http,
                format!("{}/verse", mock_server.uri()),
            )),
        );

        let content = resolver.resolve().await;

        assert!(is_fallback_quote(&content.quote));
        assert!(is_fallback_verse(&content.verse));
        assert!(cache.is_fresh());
    }
}
