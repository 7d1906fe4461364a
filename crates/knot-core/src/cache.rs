use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// A process-lifetime, cache-aside map of code → original URL.
///
/// Safe without invalidation because the URL behind a code never
/// changes: a stale read is impossible, only absence is, and absence
/// falls through to the store. The cache holds no click counts; click
/// accounting always goes to the store.
#[async_trait]
pub trait LookupCache: Send + Sync + 'static {
    /// Returns the cached URL for a code, if present.
    async fn get(&self, code: &ShortCode) -> Option<String>;

    /// Records a code → URL mapping. Writing the same value twice is
    /// harmless; entries are never evicted.
    async fn put(&self, code: &ShortCode, url: &str);
}
