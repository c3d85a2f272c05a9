//! HTTP handlers for the relay
//!
//! Handlers validate the body, build a scraper for the caller's key and
//! hand the work to `ytrelay-core`.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};
use ytrelay_core::{CommentResult, SearchResult};

use crate::AppState;
use crate::error::{ApiError, ApiResult};

const DEFAULT_SEARCH_RESULTS: u32 = 10;
const DEFAULT_COMMENT_RESULTS: u32 = 100;

/// Body of `POST /search-videos`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub published_after: Option<String>,
}

/// Body of `POST /fetch-comments`
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub api_key: String,
}

fn require(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} is required", field)));
    }
    Ok(())
}

fn max_results(requested: Option<u32>, default: u32) -> ApiResult<u32> {
    match requested.unwrap_or(default) {
        0 => Err(ApiError::bad_request("max_results must be at least 1")),
        n => Ok(n),
    }
}

fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Service description for liveness checks
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "ytrelay",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "endpoints": ["/search-videos", "/fetch-comments"],
    }))
}

/// Search YouTube and return full metadata for each hit
///
/// # Errors
/// - 400 if `query` or `api_key` is missing, or the body is not valid JSON
/// - YouTube's status if the API rejects the call
/// - 500 for anything else
pub async fn search_videos(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResult>> {
    let request = read_body(payload)?;
    require(&request.query, "query")?;
    require(&request.api_key, "api_key")?;
    let limit = max_results(request.max_results, DEFAULT_SEARCH_RESULTS)?;

    let scraper = state.scraper(&request.api_key)?;
    let result = scraper
        .search(&request.query, limit, request.published_after.as_deref())
        .await?;
    Ok(Json(result))
}

/// Fetch top-level comments of one video
///
/// # Errors
/// - 400 if `video_id` or `api_key` is missing, or the body is not valid JSON
/// - YouTube's status if the API rejects the call
/// - 500 for anything else
pub async fn fetch_comments(
    State(state): State<AppState>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<Json<CommentResult>> {
    let request = read_body(payload)?;
    require(&request.video_id, "video_id")?;
    require(&request.api_key, "api_key")?;
    let limit = max_results(request.max_results, DEFAULT_COMMENT_RESULTS)?;

    let scraper = state.scraper(&request.api_key)?;
    let result = scraper.fetch_comments(&request.video_id, limit).await?;
    Ok(Json(result))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
