use crate::error::{ApiError, Result};
use crate::model::{ShortenRequest, ShortenResponse, StatsResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use knot_core::ShortCode;

pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(request): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let Some(url) = request.url else {
        return Err(ApiError::BadRequest("URL missing".to_string()));
    };

    let code = state.shortener().shorten(&url).await?;
    let response = ShortenResponse {
        short_url: code.to_url(state.base_url()),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new(code);
    match state.shortener().expand(&code).await? {
        Some(url) => Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response()),
        None => Err(ApiError::NotFound),
    }
}

pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>> {
    let code = ShortCode::new(code);
    match state.shortener().stats(&code).await? {
        Some(record) => Ok(Json(record.into())),
        None => Err(ApiError::NotFound),
    }
}
