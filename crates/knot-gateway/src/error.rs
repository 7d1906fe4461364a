use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use knot_core::ShortenerError;
use serde_json::json;
use tracing::error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Transport-level error mapping for the HTTP surface.
///
/// Client mistakes become 400s with the message in the body, unknown
/// codes become 404s, and store failures become opaque 500s (the
/// detail goes to the log, not to the client).
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal(String),
}

impl From<ShortenerError> for ApiError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidUrl(_) => Self::BadRequest(err.to_string()),
            ShortenerError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Short URL not found" })),
            )
                .into_response(),
            ApiError::Internal(message) => {
                error!(error = %message, "request failed on the store side");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
