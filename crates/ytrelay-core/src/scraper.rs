//! Main scraper API for YouTube
//!
//! Combines the authenticated client with the JSON parsers to search for
//! videos and page through comment threads.

use std::collections::HashMap;

use crate::client::{ClientConfig, YoutubeClient};
use crate::error::{RelayError, Result};
use crate::parser::{
    parse_comment_page, parse_published_after, parse_search_ids, parse_video_details,
    parse_video_title,
};
use crate::types::{CommentRecord, CommentResult, SearchResult, VideoMetadata, VideoRecord};
use crate::url::extract_video_id;

/// Largest page the `search` endpoint serves
pub const MAX_SEARCH_PAGE_SIZE: u32 = 50;

/// Largest page the `commentThreads` endpoint serves
pub const MAX_COMMENT_PAGE_SIZE: u32 = 100;

/// Title reported when the video cannot be looked up
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Note attached to comment results for videos with comments turned off
pub const COMMENTS_DISABLED_NOTE: &str = "Comments are disabled for this video.";

/// Optional post-processing applied to search results
///
/// Both knobs are off by default, in which case results are returned in
/// YouTube's order and the upstream page size follows `max_results`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Pull a full page of 50 and order it by descending comment count
    pub rank_by_comments: bool,
    /// Drop videos that have no comments
    pub skip_uncommented: bool,
}

impl SearchPolicy {
    /// Upstream page size to request for a caller asking for `max_results`
    pub fn page_size(&self, max_results: u32) -> u32 {
        if self.rank_by_comments {
            MAX_SEARCH_PAGE_SIZE
        } else {
            max_results.clamp(1, MAX_SEARCH_PAGE_SIZE)
        }
    }

    /// Filters, orders and truncates records
    ///
    /// # Returns
    /// The kept records and how many passed the filter before truncation
    pub fn apply(&self, mut videos: Vec<VideoRecord>, max_results: u32) -> (Vec<VideoRecord>, usize) {
        if self.skip_uncommented {
            videos.retain(|video| video.comment_count > 0);
        }
        if self.rank_by_comments {
            // Stable, so ties keep YouTube's relevance order
            videos.sort_by(|a, b| b.comment_count.cmp(&a.comment_count));
        }

        let total = videos.len();
        videos.truncate(max_results as usize);
        (videos, total)
    }
}

/// Main scraper API for YouTube
///
/// Holds one caller's credential. Build a new scraper per request rather
/// than sharing one between callers.
#[derive(Debug)]
pub struct YoutubeScraper {
    client: YoutubeClient,
    policy: SearchPolicy,
}

impl YoutubeScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// - `InvalidInput` if the API key is empty
    /// - `Http` if HTTP client initialization fails
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, &ClientConfig::default())
    }

    /// Create a new scraper with custom client configuration
    pub fn with_config(api_key: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        let client = YoutubeClient::with_config(api_key, config)?;
        Ok(Self::from_client(client))
    }

    /// Wrap an already configured client
    pub fn from_client(client: YoutubeClient) -> Self {
        Self {
            client,
            policy: SearchPolicy::default(),
        }
    }

    /// Replace the search policy
    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Search for videos and return their full metadata
    ///
    /// Makes one `search` call and, if it found anything, one batched
    /// `videos` call for all IDs. Records keep the search order.
    ///
    /// # Arguments
    /// * `query` - Search terms
    /// * `max_results` - Upper bound on returned videos (at most 50 are fetched)
    /// * `published_after` - Optional RFC 3339 timestamp or `YYYY-MM-DD` date
    ///
    /// # Errors
    /// - `InvalidInput` if query is blank, `max_results` is zero, or the date is malformed
    /// - `Upstream` if YouTube rejects either call
    /// - `Http` / `Parse` for transport or payload problems
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> ytrelay_core::Result<()> {
    /// use ytrelay_core::YoutubeScraper;
    /// let scraper = YoutubeScraper::new("AIza...")?;
    /// let result = scraper.search("rust async", 5, None).await?;
    /// for video in result.videos {
    ///     println!("{} ({}) {}", video.title, video.duration, video.url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        published_after: Option<&str>,
    ) -> Result<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RelayError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        if max_results == 0 {
            return Err(RelayError::InvalidInput(
                "max_results must be at least 1".to_string(),
            ));
        }

        let published_after = match published_after.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_published_after(raw).ok_or_else(|| {
                RelayError::InvalidInput(format!(
                    "published_after must be an RFC 3339 timestamp or YYYY-MM-DD date, got {:?}",
                    raw
                ))
            })?),
            None => None,
        };

        let page_size = self.policy.page_size(max_results);
        tracing::info!(query, max_results, page_size, "Searching YouTube");

        let mut params = vec![
            ("part", "id,snippet".to_string()),
            ("type", "video".to_string()),
            ("q", query.to_string()),
            ("maxResults", page_size.to_string()),
        ];
        if let Some(after) = published_after {
            params.push(("publishedAfter", after));
        }

        let body = self.client.get("search", &params).await?;
        let video_ids = parse_search_ids(&body)?;

        if video_ids.is_empty() {
            tracing::info!(query, "No videos found");
            return Ok(SearchResult::empty());
        }

        let details = self.video_details(&video_ids).await?;
        let (videos, total_results) = self.policy.apply(details, max_results);

        tracing::info!(
            query,
            returned = videos.len(),
            total_results,
            "Search complete"
        );
        Ok(SearchResult {
            videos,
            total_results,
        })
    }

    /// Fetch full records for a batch of IDs, in the order given
    ///
    /// IDs YouTube does not return (deleted, private) are skipped.
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoRecord>> {
        let params = [
            ("part", "snippet,statistics,contentDetails".to_string()),
            ("id", video_ids.join(",")),
        ];
        let body = self.client.get("videos", &params).await?;

        let mut by_id: HashMap<String, VideoRecord> = parse_video_details(&body)?
            .into_iter()
            .map(|video| (video.video_id.clone(), video))
            .collect();

        Ok(video_ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Fetch top-level comments of a video, following pagination
    ///
    /// Requests `min(100, remaining)` comments per page until `max_results`
    /// are collected or YouTube runs out of pages, then looks up the video
    /// title. Replies are never fetched.
    ///
    /// A video with comments disabled is not an error: the result has no
    /// comments and carries an explanatory `note`.
    ///
    /// # Arguments
    /// * `video_id` - Video ID or any common YouTube video URL
    /// * `max_results` - Upper bound on returned comments
    ///
    /// # Errors
    /// - `InvalidInput` if the video ID is blank or `max_results` is zero
    /// - `Upstream` for any API rejection other than disabled comments
    /// - `Http` / `Parse` for transport or payload problems
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> ytrelay_core::Result<()> {
    /// use ytrelay_core::YoutubeScraper;
    /// let scraper = YoutubeScraper::new("AIza...")?;
    /// let result = scraper.fetch_comments("dQw4w9WgXcQ", 250).await?;
    /// println!("{}: {} comments, more: {}", result.video_metadata.title, result.total_comments, result.has_more);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_comments(&self, video_id: &str, max_results: u32) -> Result<CommentResult> {
        let video_id = extract_video_id(video_id).ok_or_else(|| {
            RelayError::InvalidInput("Video ID cannot be empty".to_string())
        })?;
        if max_results == 0 {
            return Err(RelayError::InvalidInput(
                "max_results must be at least 1".to_string(),
            ));
        }

        tracing::info!(video_id = %video_id, max_results, "Fetching comments");

        let (comments, has_more, note) = match self.collect_comments(&video_id, max_results).await {
            Ok((comments, has_more)) => (comments, has_more, None),
            Err(e) if e.is_comments_disabled() => {
                tracing::warn!(video_id = %video_id, "Comments are disabled: {}", e);
                (Vec::new(), false, Some(COMMENTS_DISABLED_NOTE.to_string()))
            }
            Err(e) => return Err(e),
        };

        let title = self.video_title(&video_id).await?;
        tracing::info!(
            video_id = %video_id,
            count = comments.len(),
            has_more,
            "Comments fetched"
        );

        Ok(CommentResult {
            total_comments: comments.len(),
            comments,
            video_metadata: VideoMetadata { video_id, title },
            has_more,
            note,
        })
    }

    /// Runs the pagination loop
    ///
    /// # Returns
    /// The comments and whether a cursor was still pending when the limit was hit
    async fn collect_comments(
        &self,
        video_id: &str,
        max_results: u32,
    ) -> Result<(Vec<CommentRecord>, bool)> {
        let limit = max_results as usize;
        let mut comments: Vec<CommentRecord> = Vec::with_capacity(limit.min(1_000));
        let mut page_token: Option<String> = None;

        loop {
            let remaining = limit - comments.len();
            let page_size = remaining.min(MAX_COMMENT_PAGE_SIZE as usize);

            let mut params = vec![
                ("part", "snippet".to_string()),
                ("videoId", video_id.to_string()),
                ("textFormat", "plainText".to_string()),
                ("maxResults", page_size.to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let body = self.client.get("commentThreads", &params).await?;
            let page = parse_comment_page(&body)?;
            tracing::debug!(
                video_id,
                received = page.comments.len(),
                has_next = page.next_page_token.is_some(),
                "Comment page"
            );

            let received = page.comments.len();
            comments.extend(page.comments.into_iter().take(remaining));
            page_token = page.next_page_token;

            if comments.len() >= limit {
                return Ok((comments, page_token.is_some()));
            }
            // An empty page with a cursor would otherwise loop forever
            if page_token.is_none() || received == 0 {
                return Ok((comments, false));
            }
        }
    }

    /// Looks up a video's title, falling back to [`UNKNOWN_TITLE`]
    async fn video_title(&self, video_id: &str) -> Result<String> {
        let params = [("part", "snippet".to_string()), ("id", video_id.to_string())];
        let body = self.client.get("videos", &params).await?;

        Ok(parse_video_title(&body)?.unwrap_or_else(|| UNKNOWN_TITLE.to_string()))
    }
}
