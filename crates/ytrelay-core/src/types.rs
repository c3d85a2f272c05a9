//! Core data types for the YouTube relay
//!
//! These are the flat records returned to the frontend. They are built
//! per request and never stored.

use serde::{Deserialize, Serialize};

/// A single video with its metadata and statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// YouTube video ID (e.g., "dQw4w9WgXcQ")
    pub video_id: String,

    pub title: String,

    pub channel_name: String,

    pub channel_id: String,

    pub description: String,

    /// Watch page URL built from the video ID
    pub url: String,

    pub view_count: u64,

    pub like_count: u64,

    pub comment_count: u64,

    /// Duration rendered as "MM:SS" (e.g., "04:13"); minutes may exceed two digits
    pub duration: String,

    /// Upload time, RFC 3339 UTC when YouTube's value was parseable
    pub published_at: String,

    /// Default-size thumbnail, if YouTube provided one
    pub thumbnail_url: Option<String>,

    pub tags: Vec<String>,
}

/// A top-level comment on a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub comment_id: String,

    pub author_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_profile_image_url: Option<String>,

    /// Plain-text comment body
    pub comment_text: String,

    pub like_count: u64,

    /// Number of replies YouTube reports (replies themselves are not fetched)
    pub reply_count: u64,

    pub published_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Always false, only top-level comments are returned
    pub is_reply: bool,
}

/// Result of a video search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub videos: Vec<VideoRecord>,

    /// Number of videos that passed the active filters, before truncation
    pub total_results: usize,
}

impl SearchResult {
    /// An empty result for searches that matched nothing
    pub fn empty() -> Self {
        Self {
            videos: Vec::new(),
            total_results: 0,
        }
    }
}

/// Minimal identification of the video a comment batch belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
}

/// Result of fetching the comments of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResult {
    pub comments: Vec<CommentRecord>,

    pub video_metadata: VideoMetadata,

    pub total_comments: usize,

    /// True when the requested limit was reached while YouTube still had more pages
    pub has_more: bool,

    /// Explanation when no comments could be fetched (e.g., comments disabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
