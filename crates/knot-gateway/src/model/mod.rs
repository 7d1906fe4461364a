mod url;

use serde::Serialize;

pub use url::{ShortenRequest, ShortenResponse, StatsResponse};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
