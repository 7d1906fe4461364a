use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored URL record.
///
/// Once created, only `clicks` ever changes, and only upward. The code
/// and the normalized URL are both unique across the store; records are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short code assigned at creation.
    pub code: ShortCode,
    /// The normalized original URL (dedup key).
    pub original_url: String,
    /// How many times the code has been resolved.
    pub clicks: u64,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Builds a fresh record with a zero click count.
    pub fn new(code: ShortCode, original_url: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            code,
            original_url: original_url.into(),
            clicks: 0,
            created_at,
        }
    }
}
