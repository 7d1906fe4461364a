use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use knot_core::error::{StoreError, StoreResult};
use knot_core::{ShortCode, UrlRecord, UrlStore};

/// In-memory implementation of [`UrlStore`] using DashMap.
///
/// Two maps back the two uniqueness constraints: `by_code` holds the
/// records keyed by short code, `by_url` is the unique secondary index
/// from normalized URL to code. DashMap's sharded locks make each
/// entry operation atomic, so concurrent inserts for the same key
/// serialize on the shard and exactly one wins.
///
/// Insert order invariant: the record lands in `by_code` before the
/// URL index entry is claimed, so any code reachable through `by_url`
/// always resolves in `by_code`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    by_code: DashMap<String, UrlRecord>,
    by_url: DashMap<String, String>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            by_code: DashMap::new(),
            by_url: DashMap::new(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[async_trait]
impl UrlStore for InMemoryStore {
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<UrlRecord>> {
        let Some(code) = self.by_url.get(url) else {
            return Ok(None);
        };
        Ok(self.by_code.get(code.value()).map(|r| r.clone()))
    }

    async fn find_by_code(&self, code: &ShortCode) -> StoreResult<Option<UrlRecord>> {
        Ok(self.by_code.get(code.as_str()).map(|r| r.clone()))
    }

    async fn insert(&self, record: UrlRecord) -> StoreResult<()> {
        let code_key = record.code.as_str().to_owned();
        let url_key = record.original_url.clone();

        match self.by_code.entry(code_key.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(format!(
                    "code '{}' already exists",
                    code_key
                )));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(record);
            }
        }

        match self.by_url.entry(url_key) {
            Entry::Occupied(occupied) => {
                // Lost the dedup race: another record owns this URL.
                // Roll back the code entry so the losing record never
                // becomes visible.
                let url = occupied.key().clone();
                drop(occupied);
                self.by_code.remove(&code_key);
                Err(StoreError::Conflict(format!(
                    "url '{}' already exists",
                    url
                )))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(code_key);
                Ok(())
            }
        }
    }

    async fn increment_clicks(&self, code: &ShortCode) -> StoreResult<Option<UrlRecord>> {
        // get_mut holds the shard lock for the duration of the bump,
        // so concurrent increments never lose updates.
        let Some(mut record) = self.by_code.get_mut(code.as_str()) else {
            return Ok(None);
        };
        record.clicks += 1;
        Ok(Some(record.clone()))
    }
}
