//! URL helper functions for YouTube
//!
//! Provides functions for building watch and API endpoint URLs and for
//! pulling a video ID out of the many URL shapes YouTube uses.

/// Default base URL of the YouTube Data API v3
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Builds the public watch page URL for a video
///
/// # Example
/// ```
/// use ytrelay_core::url::build_watch_url;
/// let url = build_watch_url("dQw4w9WgXcQ");
/// assert_eq!(url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// ```
pub fn build_watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, urlencoding::encode(video_id))
}

/// Joins an API base URL and an endpoint name
///
/// Tolerates a trailing slash on the base and a leading slash on the endpoint.
///
/// # Example
/// ```
/// use ytrelay_core::url::build_api_url;
/// let url = build_api_url("https://www.googleapis.com/youtube/v3/", "/search");
/// assert_eq!(url, "https://www.googleapis.com/youtube/v3/search");
/// ```
pub fn build_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Extracts a video ID from a YouTube URL, or returns the input as an ID
///
/// Recognizes `watch?v=`, `youtu.be/`, `/shorts/`, `/embed/` and `/live/`
/// links. Anything that is not a YouTube URL is treated as a bare ID.
///
/// # Returns
/// `Some(id)` if an ID could be determined, `None` for empty input or a
/// YouTube URL without an ID
///
/// # Example
/// ```
/// use ytrelay_core::url::extract_video_id;
/// assert_eq!(extract_video_id("https://youtu.be/abc123?t=42"), Some("abc123".to_string()));
/// assert_eq!(extract_video_id("abc123"), Some("abc123".to_string()));
/// ```
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if !input.contains("youtube.com") && !input.contains("youtu.be") {
        return Some(input.to_string());
    }

    let without_scheme = input
        .trim_start_matches("https://")
        .trim_start_matches("http://");

    let candidate = if let Some((_, query)) = without_scheme.split_once('?') {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .or_else(|| path_id(without_scheme))
    } else {
        path_id(without_scheme)
    };

    candidate
        .map(|id| id.split(['&', '#', '?', '/']).next().unwrap_or(id))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Finds the ID segment in path-style links (youtu.be/ID, /shorts/ID, ...)
fn path_id(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let mut segments = path.split('/');
    let host = segments.next()?;

    if host.ends_with("youtu.be") {
        return segments.next();
    }

    while let Some(segment) = segments.next() {
        if matches!(segment, "shorts" | "embed" | "live" | "v") {
            return segments.next();
        }
    }
    None
}
