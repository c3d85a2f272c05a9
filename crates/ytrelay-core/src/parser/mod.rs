//! JSON parsers for YouTube Data API responses
//!
//! Contains modules for parsing the different endpoint payloads and the
//! formatting helpers they share.

pub mod comments;
pub mod time;
pub mod videos;

pub use comments::{CommentPage, parse_comment_page};
pub use time::{format_duration, normalize_timestamp, parse_published_after};
pub use videos::{parse_search_ids, parse_video_details, parse_video_title};

use serde::Deserialize;
use serde::de::IgnoredAny;

/// A counter as YouTube sends it
///
/// Statistics arrive as decimal strings (`"viewCount": "1234"`) while
/// comment counters are plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Count {
    Number(u64),
    Text(String),
    Other(IgnoredAny),
}

impl Count {
    pub(crate) fn value(&self) -> u64 {
        match self {
            Count::Number(n) => *n,
            Count::Text(s) => s.trim().parse().unwrap_or(0),
            Count::Other(_) => 0,
        }
    }

    pub(crate) fn value_or_zero(count: Option<&Count>) -> u64 {
        count.map(Count::value).unwrap_or(0)
    }
}
