use crate::base62;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short code identifying a shortened URL.
///
/// Codes are minted by encoding allocator ids as base62; they are
/// immutable once assigned to a record. Codes arriving from the
/// transport layer are looked up as-is: an unknown code is a miss,
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCode(String);

impl ShortCode {
    /// Wraps a raw code string, e.g. one taken from a request path.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Mints the code for an allocated id via base62 encoding.
    pub fn from_id(id: u64) -> Self {
        Self(base62::encode(id))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
