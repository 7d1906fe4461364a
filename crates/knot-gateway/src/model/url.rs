use knot_core::UrlRecord;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub clicks: u64,
    pub created_at: String,
}

impl From<UrlRecord> for StatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            short_code: record.code.to_string(),
            original_url: record.original_url,
            clicks: record.clicks,
            created_at: record.created_at.to_string(),
        }
    }
}
