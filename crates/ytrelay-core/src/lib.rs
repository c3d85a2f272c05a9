//! YouTube Relay Core Library
//!
//! Provides an async API for searching YouTube videos and fetching their
//! comments through the YouTube Data API v3, reshaped into flat records.
//!
//! # Overview
//!
//! This crate provides:
//! - An authenticated HTTP client that decodes Google's error envelope
//! - JSON parsers for the `search`, `videos` and `commentThreads` endpoints
//! - A high-level scraper that batches detail lookups and pages through comments
//!
//! # Example
//!
//! ```no_run
//! use ytrelay_core::{Result, YoutubeScraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = YoutubeScraper::new("AIza...")?;
//!
//!     let results = scraper.search("rust programming", 5, None).await?;
//!     for video in &results.videos {
//!         println!("{} [{}] {} comments", video.title, video.duration, video.comment_count);
//!     }
//!
//!     if let Some(video) = results.videos.first() {
//!         let comments = scraper.fetch_comments(&video.video_id, 50).await?;
//!         println!("{} comments, more available: {}", comments.total_comments, comments.has_more);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Credentials
//!
//! The API key is a constructor argument of [`YoutubeScraper`] and is never
//! kept anywhere else. Build one scraper per caller.

mod client;
mod error;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, YoutubeClient};

// Re-export error types
pub use error::{RelayError, Result};

// Re-export parser functions
pub use parser::{format_duration, normalize_timestamp};

// Re-export main scraper API
pub use scraper::{
    COMMENTS_DISABLED_NOTE, MAX_COMMENT_PAGE_SIZE, MAX_SEARCH_PAGE_SIZE, SearchPolicy,
    UNKNOWN_TITLE, YoutubeScraper,
};

// Re-export data types
pub use types::{CommentRecord, CommentResult, SearchResult, VideoMetadata, VideoRecord};
