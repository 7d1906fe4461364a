use async_trait::async_trait;
use dashmap::DashMap;
use knot_core::{LookupCache, ShortCode};
use tracing::{debug, trace};

/// An unbounded in-memory implementation of [`LookupCache`].
///
/// DashMap's sharded locks give thread safety without a global lock;
/// nothing beyond that is needed because entries are write-once and
/// never evicted for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryLookupCache {
    entries: DashMap<String, String>,
}

impl MemoryLookupCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of cached mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no mappings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl LookupCache for MemoryLookupCache {
    async fn get(&self, code: &ShortCode) -> Option<String> {
        match self.entries.get(code.as_str()) {
            Some(url) => {
                debug!(code = %code, "cache hit");
                Some(url.clone())
            }
            None => {
                trace!(code = %code, "cache miss");
                None
            }
        }
    }

    async fn put(&self, code: &ShortCode, url: &str) {
        trace!(code = %code, "caching resolved url");
        self.entries
            .insert(code.as_str().to_owned(), url.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new(s)
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = MemoryLookupCache::new();
        assert_eq!(cache.get(&code("b")).await, None);

        cache.put(&code("b"), "https://example.com").await;
        assert_eq!(
            cache.get(&code("b")).await.as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn repopulating_with_the_same_value_is_idempotent() {
        let cache = MemoryLookupCache::new();
        cache.put(&code("b"), "https://example.com").await;
        cache.put(&code("b"), "https://example.com").await;

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&code("b")).await.as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn concurrent_population() {
        use std::sync::Arc;

        let cache = Arc::new(MemoryLookupCache::new());
        let mut handles = vec![];

        for i in 0..32u64 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::from_id(i + 1);
                cache.put(&c, &format!("https://example{}.com", i)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len(), 32);
        for i in 0..32u64 {
            let c = ShortCode::from_id(i + 1);
            assert_eq!(
                cache.get(&c).await,
                Some(format!("https://example{}.com", i))
            );
        }
    }
}
