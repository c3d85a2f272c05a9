//! YouTube Relay HTTP server
//!
//! Exposes the scraper over HTTP for a frontend application.
//!
//! # Endpoints
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | `GET` | `/` | none, returns a service description |
//! | `POST` | `/search-videos` | `{query, max_results?, api_key, published_after?}` |
//! | `POST` | `/fetch-comments` | `{video_id, max_results?, api_key}` |
//!
//! The POST routes are also served under `/api/youtube/`. Failures are
//! always returned as `{"error": "..."}`.
//!
//! # Usage
//!
//! ```no_run
//! use ytrelay_core::{ClientConfig, SearchPolicy};
//! use ytrelay_server::{AppState, router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::new(&ClientConfig::default(), SearchPolicy::default())?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

use axum::Router;
use axum::routing::{get, post};
use ytrelay_core::{ClientConfig, SearchPolicy, YoutubeClient, YoutubeScraper};

pub mod config;
mod error;
mod routes;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::{CommentRequest, SearchRequest};

/// State shared by all requests
///
/// Holds no credentials: every request brings its own API key and gets its
/// own [`YoutubeScraper`]. Only the connection pool and settings are shared.
#[derive(Clone)]
pub struct AppState {
    http: reqwest::Client,
    base_url: String,
    policy: SearchPolicy,
}

impl AppState {
    /// Create state from client settings and the search policy
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be initialized
    pub fn new(config: &ClientConfig, policy: SearchPolicy) -> ytrelay_core::Result<Self> {
        Ok(Self {
            http: config.build_http_client()?,
            base_url: config.base_url.clone(),
            policy,
        })
    }

    /// Build a scraper bound to one caller's API key
    pub fn scraper(&self, api_key: &str) -> ytrelay_core::Result<YoutubeScraper> {
        let client = YoutubeClient::with_http_client(self.http.clone(), &self.base_url, api_key)?;
        Ok(YoutubeScraper::from_client(client).with_policy(self.policy))
    }
}

/// Build the application router
///
/// CORS and request tracing are layered on by the caller.
pub fn router(state: AppState) -> Router {
    let youtube = Router::new()
        .route("/search-videos", post(routes::search_videos))
        .route("/fetch-comments", post(routes::fetch_comments));

    Router::new()
        .route("/", get(routes::index))
        .merge(youtube.clone())
        .nest("/api/youtube", youtube)
        .fallback(routes::not_found)
        .with_state(state)
}
