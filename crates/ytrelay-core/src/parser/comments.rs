//! Parser for the `commentThreads` endpoint

use serde::Deserialize;

use crate::error::{RelayError, Result};
use crate::parser::Count;
use crate::parser::time::normalize_timestamp;
use crate::types::CommentRecord;

/// One page of top-level comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<CommentRecord>,
    /// Cursor for the next page; `None` when YouTube has no more pages
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    #[serde(default)]
    id: String,
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
    total_reply_count: Option<Count>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: CommentSnippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CommentSnippet {
    author_display_name: String,
    author_profile_image_url: Option<String>,
    text_display: String,
    text_original: String,
    like_count: Option<Count>,
    published_at: String,
    updated_at: Option<String>,
}

/// Parses a `commentThreads.list` response body
///
/// Every thread's top-level comment becomes one [`CommentRecord`]. Replies
/// are ignored even if the response embeds them.
///
/// # Errors
/// Returns `Parse` if the body is not a comment thread list
pub fn parse_comment_page(body: &str) -> Result<CommentPage> {
    let response: CommentThreadListResponse = serde_json::from_str(body)
        .map_err(|e| RelayError::Parse(format!("commentThreads response: {}", e)))?;

    let comments = response.items.into_iter().map(comment_record).collect();
    let next_page_token = response.next_page_token.filter(|t| !t.is_empty());

    Ok(CommentPage {
        comments,
        next_page_token,
    })
}

fn comment_record(thread: CommentThread) -> CommentRecord {
    let reply_count = Count::value_or_zero(thread.snippet.total_reply_count.as_ref());
    let top = thread.snippet.top_level_comment;
    let snippet = top.snippet;

    // Thread and top-level comment share an ID upstream; prefer the comment's
    let comment_id = if top.id.is_empty() { thread.id } else { top.id };

    let comment_text = if snippet.text_display.is_empty() {
        snippet.text_original
    } else {
        snippet.text_display
    };

    CommentRecord {
        comment_id,
        author_name: snippet.author_display_name,
        author_profile_image_url: snippet.author_profile_image_url.filter(|u| !u.is_empty()),
        comment_text,
        like_count: Count::value_or_zero(snippet.like_count.as_ref()),
        reply_count,
        published_at: normalize_timestamp(&snippet.published_at),
        updated_at: snippet.updated_at.as_deref().map(normalize_timestamp),
        is_reply: false,
    }
}
