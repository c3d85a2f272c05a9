//! HTTP-level tests for the relay router
//!
//! Requests go through the axum router with `tower::ServiceExt::oneshot`;
//! wiremock stands in for the YouTube Data API.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use clap::Parser;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytrelay_core::{ClientConfig, SearchPolicy};
use ytrelay_server::{AppState, ServerConfig, router};

fn app_for(server: &MockServer) -> Router {
    let config = ClientConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    router(AppState::new(&config, SearchPolicy::default()).expect("state should build"))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn mount_untouched(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(server)
        .await;
}

async fn mount_cat_search(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "cats"))
        .and(query_param("key", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "vid1"}},
                {"id": {"kind": "youtube#video", "videoId": "vid2"}}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "vid1,vid2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "vid2",
                    "snippet": {"title": "Second", "channelTitle": "Chan", "channelId": "UC1",
                                "publishedAt": "2024-01-02T00:00:00Z"},
                    "contentDetails": {"duration": "PT1H2M3S"},
                    "statistics": {"viewCount": "5", "commentCount": "1"}
                },
                {
                    "id": "vid1",
                    "snippet": {"title": "First", "channelTitle": "Chan", "channelId": "UC1",
                                "publishedAt": "2024-01-01T00:00:00Z"},
                    "contentDetails": {"duration": "PT4M13S"},
                    "statistics": {"viewCount": "10", "likeCount": "2", "commentCount": "3"}
                }
            ]
        })))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_index_describes_service() {
    let server = MockServer::start().await;
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "ytrelay");
    assert_eq!(body["status"], "ok");
    assert!(body["endpoints"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .uri("/no-such-route")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_without_api_key_never_calls_upstream() {
    let server = MockServer::start().await;
    mount_untouched(&server).await;

    let (status, body) = send(
        app_for(&server),
        post_json("/search-videos", json!({"query": "cats"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "api_key is required");
}

#[tokio::test]
async fn test_search_without_query_is_rejected() {
    let server = MockServer::start().await;
    mount_untouched(&server).await;

    let (status, body) = send(
        app_for(&server),
        post_json("/search-videos", json!({"query": "  ", "api_key": "k1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "query is required");
}

#[tokio::test]
async fn test_comments_without_video_id_is_rejected() {
    let server = MockServer::start().await;
    mount_untouched(&server).await;

    let (status, body) = send(
        app_for(&server),
        post_json("/fetch-comments", json!({"api_key": "k1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "video_id is required");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = MockServer::start().await;
    mount_untouched(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/search-videos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_zero_max_results_is_rejected() {
    let server = MockServer::start().await;
    mount_untouched(&server).await;

    let (status, _) = send(
        app_for(&server),
        post_json(
            "/fetch-comments",
            json!({"video_id": "abc", "api_key": "k1", "max_results": 0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_published_after_is_rejected() {
    let server = MockServer::start().await;
    mount_untouched(&server).await;

    let (status, body) = send(
        app_for(&server),
        post_json(
            "/search-videos",
            json!({"query": "cats", "api_key": "k1", "published_after": "last tuesday"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("published_after"));
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_returns_records_in_search_order() {
    let server = MockServer::start().await;
    mount_cat_search(&server).await;

    let (status, body) = send(
        app_for(&server),
        post_json("/search-videos", json!({"query": "cats", "api_key": "k1", "max_results": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 2);

    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["video_id"], "vid1");
    assert_eq!(videos[0]["duration"], "04:13");
    assert_eq!(videos[0]["comment_count"], 3);
    assert_eq!(videos[0]["url"], "https://www.youtube.com/watch?v=vid1");
    assert_eq!(videos[1]["video_id"], "vid2");
    assert_eq!(videos[1]["duration"], "62:03");
    assert_eq!(videos[1]["like_count"], 0);
}

#[tokio::test]
async fn test_search_is_served_under_api_prefix() {
    let server = MockServer::start().await;
    mount_cat_search(&server).await;

    let (status, body) = send(
        app_for(&server),
        post_json("/api/youtube/search-videos", json!({"query": "cats", "api_key": "k1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upstream_status_is_propagated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The request cannot be completed because you have exceeded your quota.",
                "errors": [{"reason": "quotaExceeded"}]
            }
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app_for(&server),
        post_json("/search-videos", json!({"query": "cats", "api_key": "k1"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("YouTube API error (403)"));
    assert!(message.contains("quota"));
}

#[tokio::test]
async fn test_malformed_upstream_body_is_sanitized_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let (status, body) = send(
        app_for(&server),
        post_json("/search-videos", json!({"query": "cats", "api_key": "k1"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Unexpected error"));
    assert!(!message.contains("k1"));
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_fetch_comments_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "vid1"))
        .and(query_param("maxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"snippet": {"topLevelComment": {"id": "c1", "snippet": {
                    "authorDisplayName": "@a", "textDisplay": "first", "likeCount": 4,
                    "publishedAt": "2024-03-01T12:00:00Z"}}, "totalReplyCount": 2}},
                {"snippet": {"topLevelComment": {"id": "c2", "snippet": {
                    "authorDisplayName": "@b", "textDisplay": "second",
                    "publishedAt": "2024-03-02T12:00:00Z"}}}}
            ],
            "nextPageToken": "more"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "vid1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "vid1", "snippet": {"title": "First"}}]
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app_for(&server),
        post_json(
            "/fetch-comments",
            json!({"video_id": "vid1", "api_key": "k1", "max_results": 2}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_comments"], 2);
    assert_eq!(body["has_more"], true);
    assert_eq!(body["video_metadata"], json!({"video_id": "vid1", "title": "First"}));
    assert_eq!(body["comments"][0]["comment_text"], "first");
    assert_eq!(body["comments"][0]["reply_count"], 2);
    assert_eq!(body["comments"][0]["is_reply"], false);
    assert_eq!(body["comments"][1]["like_count"], 0);
    assert!(body.get("note").is_none());
}

#[tokio::test]
async fn test_disabled_comments_return_note() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The video has disabled comments.",
                "errors": [{"reason": "commentsDisabled"}]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "quiet", "snippet": {"title": "Quiet Video"}}]
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app_for(&server),
        post_json(
            "/api/youtube/fetch-comments",
            json!({"video_id": "quiet", "api_key": "k1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_comments"], 0);
    assert_eq!(body["has_more"], false);
    assert_eq!(body["video_metadata"]["title"], "Quiet Video");
    assert!(body["note"].is_string());
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let server = MockServer::start().await;
    let config =
        ServerConfig::try_parse_from(["ytrelay", "--allowed-origins", "http://localhost:3000"])
            .unwrap();
    let app = app_for(&server).layer(config.cors_layer().unwrap());

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/search-videos")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}
