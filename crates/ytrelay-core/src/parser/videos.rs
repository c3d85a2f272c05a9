//! Parsers for the `search` and `videos` endpoints
//!
//! Turns YouTube's nested JSON into flat [`VideoRecord`]s.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{RelayError, Result};
use crate::parser::time::{format_duration, normalize_timestamp};
use crate::parser::Count;
use crate::types::VideoRecord;
use crate::url::build_watch_url;

const VIDEO_KIND: &str = "youtube#video";

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    kind: String,
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
    #[serde(default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoSnippet {
    title: String,
    description: String,
    channel_id: String,
    channel_title: String,
    published_at: String,
    thumbnails: HashMap<String, Thumbnail>,
    tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoStatistics {
    view_count: Option<Count>,
    like_count: Option<Count>,
    comment_count: Option<Count>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDetails {
    duration: String,
}

/// Extracts video IDs from a `search.list` response body
///
/// Keeps only items of kind `youtube#video`, in response order, without
/// duplicates.
///
/// # Errors
/// Returns `Parse` if the body is not a search response
pub fn parse_search_ids(body: &str) -> Result<Vec<String>> {
    let response: SearchListResponse = serde_json::from_str(body)
        .map_err(|e| RelayError::Parse(format!("search response: {}", e)))?;

    let mut ids: Vec<String> = Vec::new();
    for item in response.items {
        if item.id.kind != VIDEO_KIND {
            continue;
        }
        if let Some(id) = item.id.video_id.filter(|id| !id.is_empty())
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Parses a `videos.list` response body into video records
///
/// Records come back in the order YouTube listed them.
///
/// # Errors
/// Returns `Parse` if the body is not a video list response
pub fn parse_video_details(body: &str) -> Result<Vec<VideoRecord>> {
    let response: VideoListResponse = serde_json::from_str(body)
        .map_err(|e| RelayError::Parse(format!("videos response: {}", e)))?;

    Ok(response.items.into_iter().map(video_record).collect())
}

/// Extracts the title of the first video in a `videos.list` response
///
/// # Returns
/// `None` if the response has no items (deleted or private video)
pub fn parse_video_title(body: &str) -> Result<Option<String>> {
    let response: VideoListResponse = serde_json::from_str(body)
        .map_err(|e| RelayError::Parse(format!("videos response: {}", e)))?;

    Ok(response
        .items
        .into_iter()
        .next()
        .map(|item| item.snippet.title))
}

fn video_record(item: VideoItem) -> VideoRecord {
    let VideoItem {
        id,
        snippet,
        statistics,
        content_details,
    } = item;

    let thumbnail_url = ["default", "medium", "high"]
        .iter()
        .filter_map(|size| snippet.thumbnails.get(*size))
        .find(|thumb| !thumb.url.is_empty())
        .map(|thumb| thumb.url.clone());

    VideoRecord {
        url: build_watch_url(&id),
        video_id: id,
        title: snippet.title,
        channel_name: snippet.channel_title,
        channel_id: snippet.channel_id,
        description: snippet.description,
        view_count: Count::value_or_zero(statistics.view_count.as_ref()),
        like_count: Count::value_or_zero(statistics.like_count.as_ref()),
        comment_count: Count::value_or_zero(statistics.comment_count.as_ref()),
        duration: format_duration(&content_details.duration),
        published_at: normalize_timestamp(&snippet.published_at),
        thumbnail_url,
        tags: snippet.tags,
    }
}
