use crate::normalize::{normalize_url, validate_url};
use async_trait::async_trait;
use jiff::Timestamp;
use knot_core::{
    IdAllocator, LookupCache, ShortCode, ShortenerError, StoreError, UrlRecord, UrlStore,
};
use std::sync::Arc;
use tracing::{debug, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// The shorten / expand / stats contract consumed by the transport layer.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates or returns the short code for a URL.
    async fn shorten(&self, raw_url: &str) -> Result<ShortCode>;

    /// Resolves a code to its original URL, counting the click.
    /// Returns `None` for an unknown code, with no side effect.
    async fn expand(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Read-only snapshot of a record; `None` for an unknown code.
    async fn stats(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

/// Orchestrates the id allocator, the durable store, and the lookup
/// cache.
///
/// All three collaborators are injected at construction; the service
/// holds no ambient global state. Shortening the same normalized URL
/// twice always yields the same code: the store's unique constraint on
/// the URL settles concurrent races, and the loser re-reads the
/// winner's record instead of surfacing the conflict.
#[derive(Debug, Clone)]
pub struct ShortenerService<S, C, A> {
    store: Arc<S>,
    cache: Arc<C>,
    allocator: Arc<A>,
}

impl<S: UrlStore, C: LookupCache, A: IdAllocator> ShortenerService<S, C, A> {
    /// Creates a service owning the given store, cache, and allocator.
    pub fn new(store: S, cache: C, allocator: A) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
            allocator: Arc::new(allocator),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: UrlStore, C: LookupCache, A: IdAllocator> Shortener for ShortenerService<S, C, A> {
    async fn shorten(&self, raw_url: &str) -> Result<ShortCode> {
        let url = normalize_url(raw_url);
        validate_url(&url)?;

        // Dedup fast path: an existing record always wins.
        if let Some(existing) = self.store.find_by_url(&url).await? {
            debug!(code = %existing.code, "url already shortened");
            return Ok(existing.code);
        }

        let id = self.allocator.next_id().await?;
        let code = ShortCode::from_id(id);
        let record = UrlRecord::new(code.clone(), url.clone(), Timestamp::now());

        match self.store.insert(record).await {
            Ok(()) => {
                debug!(code = %code, id, "minted new short code");
                Ok(code)
            }
            Err(StoreError::Conflict(_)) => {
                // Lost the check-then-insert race; the winner's record
                // now holds the code for this URL.
                match self.store.find_by_url(&url).await? {
                    Some(existing) => {
                        debug!(code = %existing.code, "recovered from dedup race");
                        Ok(existing.code)
                    }
                    None => {
                        // No record for the URL means the conflict was on
                        // the code itself, which the allocator contract
                        // rules out.
                        warn!(code = %code, "insert conflicted on an allocated code");
                        Err(StoreError::Query(format!(
                            "allocated code '{}' collided in the store",
                            code
                        ))
                        .into())
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn expand(&self, code: &ShortCode) -> Result<Option<String>> {
        if let Some(url) = self.cache.get(code).await {
            // The cache never holds click counts; accounting always
            // goes to the store.
            self.store.increment_clicks(code).await?;
            return Ok(Some(url));
        }

        // Find and bump in one atomic store mutation. An unknown code
        // touches nothing.
        let Some(record) = self.store.increment_clicks(code).await? else {
            return Ok(None);
        };

        self.cache.put(code, &record.original_url).await;
        Ok(Some(record.original_url))
    }

    async fn stats(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.store.find_by_code(code).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knot_cache::MemoryLookupCache;
    use knot_core::AtomicSequence;
    use knot_storage::InMemoryStore;

    fn test_service() -> ShortenerService<InMemoryStore, MemoryLookupCache, AtomicSequence> {
        ShortenerService::new(
            InMemoryStore::new(),
            MemoryLookupCache::new(),
            AtomicSequence::new(),
        )
    }

    #[tokio::test]
    async fn first_shorten_mints_code_b() {
        let service = test_service();
        let code = service.shorten("https://example.com").await.unwrap();
        assert_eq!(code.as_str(), "b");
    }

    #[tokio::test]
    async fn shorten_is_idempotent() {
        let service = test_service();

        let first = service.shorten("https://example.com").await.unwrap();
        let second = service.shorten("https://example.com").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn distinct_urls_get_distinct_codes() {
        let service = test_service();

        let one = service.shorten("https://one.example").await.unwrap();
        let two = service.shorten("https://two.example").await.unwrap();

        assert_ne!(one, two);
        assert_eq!(service.store().len(), 2);
    }

    #[tokio::test]
    async fn expand_round_trips_the_normalized_url() {
        let service = test_service();
        let code = service.shorten("example.com").await.unwrap();

        let url = service.expand(&code).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn scheme_is_prefixed_before_storing() {
        let service = test_service();
        let code = service.shorten("example.com").await.unwrap();

        let record = service.stats(&code).await.unwrap().unwrap();
        assert_eq!(record.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_any_mutation() {
        let service = test_service();

        let err = service.shorten("https://").await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));
        assert_eq!(service.store().len(), 0);
    }

    #[tokio::test]
    async fn expand_unknown_code_is_absent_with_no_side_effect() {
        let service = test_service();

        let url = service.expand(&ShortCode::new("zzz")).await.unwrap();
        assert!(url.is_none());
        assert_eq!(service.store().len(), 0);
    }

    #[tokio::test]
    async fn clicks_grow_by_one_per_expand() {
        let service = test_service();
        let code = service.shorten("https://example.com").await.unwrap();

        service.expand(&code).await.unwrap();
        let after_one = service.stats(&code).await.unwrap().unwrap();
        assert_eq!(after_one.clicks, 1);

        service.expand(&code).await.unwrap();
        let after_two = service.stats(&code).await.unwrap().unwrap();
        assert_eq!(after_two.clicks, 2);
    }

    #[tokio::test]
    async fn cache_hits_still_count_clicks() {
        let service = test_service();
        let code = service.shorten("https://example.com").await.unwrap();

        // First expand populates the cache; the rest are cache hits.
        for _ in 0..5 {
            let url = service.expand(&code).await.unwrap();
            assert_eq!(url.as_deref(), Some("https://example.com"));
        }

        let record = service.stats(&code).await.unwrap().unwrap();
        assert_eq!(record.clicks, 5);
    }

    #[tokio::test]
    async fn stats_do_not_count_as_clicks() {
        let service = test_service();
        let code = service.shorten("https://example.com").await.unwrap();

        for _ in 0..3 {
            service.stats(&code).await.unwrap();
        }

        let record = service.stats(&code).await.unwrap().unwrap();
        assert_eq!(record.clicks, 0);
    }

    #[tokio::test]
    async fn stats_snapshot_matches_the_record() {
        let service = test_service();
        let code = service.shorten("https://example.com").await.unwrap();

        let record = service.stats(&code).await.unwrap().unwrap();
        assert_eq!(record.code, code);
        assert_eq!(record.original_url, "https://example.com");
        assert_eq!(record.clicks, 0);
    }

    #[tokio::test]
    async fn stats_unknown_code_is_absent() {
        let service = test_service();
        assert!(service.stats(&ShortCode::new("zzz")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_shortens_of_one_url_agree_on_a_single_code() {
        let service = Arc::new(test_service());
        let mut handles = vec![];

        for _ in 0..32 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.shorten("https://example.com").await.unwrap()
            }));
        }

        let mut codes = vec![];
        for handle in handles {
            codes.push(handle.await.unwrap());
        }

        let first = codes[0].clone();
        assert!(codes.iter().all(|c| *c == first));
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_expands_lose_no_clicks() {
        let service = Arc::new(test_service());
        let code = service.shorten("https://example.com").await.unwrap();

        let mut handles = vec![];
        for _ in 0..64 {
            let service = Arc::clone(&service);
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                service.expand(&code).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = service.stats(&code).await.unwrap().unwrap();
        assert_eq!(record.clicks, 64);
    }
}
