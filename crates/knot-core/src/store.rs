use crate::error::StoreResult;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Durable mapping of code ↔ URL ↔ click count ↔ creation time.
///
/// Implementations keep a uniqueness constraint on both the code and
/// the normalized URL, and every operation is atomic with respect to
/// concurrent callers: two inserts for the same URL cannot both
/// succeed, and concurrent click increments never lose updates.
#[async_trait]
pub trait UrlStore: Send + Sync + 'static {
    /// Exact-match lookup on the normalized URL (the dedup key).
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<UrlRecord>>;

    /// Lookup by short code.
    async fn find_by_code(&self, code: &ShortCode) -> StoreResult<Option<UrlRecord>>;

    /// Inserts a new record. Returns `Err(Conflict)` if the code or the
    /// URL is already present.
    async fn insert(&self, record: UrlRecord) -> StoreResult<()>;

    /// Atomically bumps the click counter in a single store mutation
    /// and returns the updated record, or `None` for an unknown code.
    async fn increment_clicks(&self, code: &ShortCode) -> StoreResult<Option<UrlRecord>>;
}
