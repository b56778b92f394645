//! Integration tests for the HTTP API
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`;
//! the analyze endpoint uses a mock resolver and the download proxy
//! talks to a wiremock upstream.
//!
//! Run with: cargo test --test api_integration_test

mod common;
mod mocks;

use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{body_bytes, body_json, get, test_router};
use mocks::MockResolver;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

// ==================== /api/ig/analyze ====================

#[tokio::test]
async fn test_analyze_missing_url_is_bad_request() {
    let resolver = Arc::new(MockResolver::carousel());
    let response = get(test_router(resolver.clone()), "/api/ig/analyze").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Not a valid Instagram share link.");
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_analyze_rejects_non_instagram_link() {
    let resolver = Arc::new(MockResolver::carousel());
    let uri = format!("/api/ig/analyze?url={}", encode("https://example.com/p/abc/"));
    let response = get(test_router(resolver.clone()), &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Not a valid Instagram share link.");
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_analyze_returns_resources_with_preview_urls() {
    let resolver = Arc::new(MockResolver::carousel());
    let link = "https://www.instagram.com/p/CAR1/?igsh=abc";
    let uri = format!("/api/ig/analyze?url={}", encode(link));
    let response = get(test_router(resolver.clone()), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(resolver.calls(), 1);
    assert_eq!(resolver.last_url().as_deref(), Some(link));

    let body = body_json(response).await;
    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);

    assert_eq!(data[0]["filename"], "user_CAR1_1.jpg");
    assert_eq!(data[0]["type"], "image");
    assert_eq!(data[0]["width"], 1080);
    assert_eq!(data[0]["height"], 1350);
    assert_eq!(data[0]["url"], "https://scontent-lax3-1.cdninstagram.com/v/1.jpg");
    assert_eq!(
        data[0]["preview_url"],
        "https://scontent--lax3--1-cdninstagram-com.translate.goog/v/1.jpg"
    );

    assert_eq!(data[1]["type"], "video");
    assert_eq!(data[1]["filename"], "user_CAR1_2.mp4");
}

#[tokio::test]
async fn test_analyze_repeated_url_uses_first_value() {
    let resolver = Arc::new(MockResolver::carousel());
    let link = "https://www.instagram.com/p/abc/";
    let uri = format!("/api/ig/analyze?url={}&url=x", encode(link));
    let response = get(test_router(resolver.clone()), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(resolver.calls(), 1);
    assert_eq!(resolver.last_url().as_deref(), Some(link));
}

#[tokio::test]
async fn test_analyze_repeated_invalid_url_is_json_error() {
    let resolver = Arc::new(MockResolver::carousel());
    let uri = format!("/api/ig/analyze?url=x&url={}", encode("https://www.instagram.com/p/abc/"));
    let response = get(test_router(resolver.clone()), &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Not a valid Instagram share link.");
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_analyze_empty_result_is_ok() {
    let resolver = Arc::new(MockResolver::returning(Vec::new()));
    let uri = format!("/api/ig/analyze?url={}", encode("https://instagram.com/reel/xyz"));
    let response = get(test_router(resolver), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_analyze_resolver_failure_is_server_error() {
    let resolver = Arc::new(MockResolver::failing("Request failed with status code 429"));
    let uri = format!("/api/ig/analyze?url={}", encode("https://www.instagram.com/tv/abc/"));
    let response = get(test_router(resolver), &uri).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Request failed with status code 429");
}

// ==================== /api/download ====================

#[tokio::test]
async fn test_download_streams_with_attachment_headers() {
    let upstream = MockServer::start().await;
    let payload = vec![7u8; 4096];
    Mock::given(method("GET"))
        .and(path("/clip.mp4"))
        .and(header("user-agent", "instagram-downloader/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(payload.clone()),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let uri = format!(
        "/api/download?url={}&filename={}",
        encode(&format!("{}/clip.mp4", upstream.uri())),
        encode("My Clip?.mp4")
    );
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[CONTENT_TYPE], "video/mp4");
    assert_eq!(headers[CONTENT_LENGTH], "4096");
    assert_eq!(headers[CACHE_CONTROL], "no-store");
    assert_eq!(
        headers[CONTENT_DISPOSITION],
        "attachment; filename=\"My Clip_.mp4\"; filename*=UTF-8''My%20Clip_.mp4"
    );

    assert_eq!(body_bytes(response).await, payload);
}

#[tokio::test]
async fn test_download_defaults_filename() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(&upstream)
        .await;

    let uri = format!("/api/download?url={}", encode(&format!("{}/a.jpg", upstream.uri())));
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"download\"; filename*=UTF-8''download"
    );
}

#[tokio::test]
async fn test_download_empty_filename_falls_back() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(&upstream)
        .await;

    let uri = format!(
        "/api/download?url={}&filename=",
        encode(&format!("{}/a.jpg", upstream.uri()))
    );
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"download\"; filename*=UTF-8''download"
    );
}

#[tokio::test]
async fn test_download_repeated_filename_uses_first_value() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(&upstream)
        .await;

    let uri = format!(
        "/api/download?url={}&filename=first.jpg&filename=second.jpg",
        encode(&format!("{}/a.jpg", upstream.uri()))
    );
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"first.jpg\"; filename*=UTF-8''first.jpg"
    );
}

#[tokio::test]
async fn test_download_non_ascii_filename() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&upstream)
        .await;

    let uri = format!(
        "/api/download?url={}&filename={}",
        encode(&format!("{}/f", upstream.uri())),
        encode("фото.jpg")
    );
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[CONTENT_DISPOSITION].as_bytes().to_vec();
    let disposition = String::from_utf8(disposition).unwrap();
    assert!(disposition.ends_with("filename*=UTF-8''%D1%84%D0%BE%D1%82%D0%BE.jpg"));
}

#[tokio::test]
async fn test_download_follows_redirects() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", format!("{}/new", upstream.uri())))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"moved".to_vec()))
        .mount(&upstream)
        .await;

    let uri = format!("/api/download?url={}", encode(&format!("{}/old", upstream.uri())));
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"moved".to_vec());
}

#[tokio::test]
async fn test_download_upstream_error_status_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;

    let uri = format!("/api/download?url={}", encode(&format!("{}/gone.jpg", upstream.uri())));
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Upstream error: 404");
}

#[tokio::test]
async fn test_download_upstream_without_body_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&upstream)
        .await;

    let uri = format!("/api/download?url={}", encode(&format!("{}/empty", upstream.uri())));
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Upstream error: 204");
}

#[tokio::test]
async fn test_download_unreachable_upstream_is_bad_gateway() {
    // Grab a free port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let uri = format!("/api/download?url={}", encode(&format!("http://127.0.0.1:{}/x", port)));
    let response = get(test_router(Arc::new(MockResolver::carousel())), &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Upstream error: "), "got {}", message);
}

#[tokio::test]
async fn test_download_validation_errors() {
    let router = || test_router(Arc::new(MockResolver::carousel()));

    let response = get(router(), "/api/download").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing url");

    let response = get(router(), "/api/download?url=not%20a%20url").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid url");

    let uri = format!("/api/download?url={}", encode("ftp://host/file"));
    let response = get(router(), &uri).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Unsupported protocol");

    let uri = format!("/api/download?url={}&filename=a&filename=b", encode("ftp://h/f"));
    let response = get(router(), &uri).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Unsupported protocol");
}

// ==================== Misc endpoints ====================

#[tokio::test]
async fn test_index_page_is_served() {
    let response = get(test_router(Arc::new(MockResolver::carousel())), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("/api/ig/analyze"));
    assert!(html.contains("/api/download"));
}

#[tokio::test]
async fn test_health_and_metrics() {
    igdl::core::metrics::init_metrics();

    let response = get(test_router(Arc::new(MockResolver::carousel())), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok".to_vec());

    let response = get(test_router(Arc::new(MockResolver::carousel())), "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("igdl_analyze_requests_total"));
}
