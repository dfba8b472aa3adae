//! Fetcher tests against a mock server

use std::time::Duration;
use sumi_scrape::crawler::{build_http_client, fetch_url, FetchResult};
use sumi_scrape::HeaderSet;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn agent(name: &str) -> HeaderSet {
    HeaderSet::from_pairs([("User-Agent", name), ("Accept-Language", "en-US")]).unwrap()
}

#[tokio::test]
async fn test_fetch_success_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>hi</body></html>"))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let url = format!("{}/page", mock_server.uri());
    let result = fetch_url(&client, &url, &agent("TestAgent/1.0"), Duration::from_secs(5)).await;

    assert_eq!(
        result,
        FetchResult::Success {
            url,
            status: 200,
            body: "<html><body>hi</body></html>".to_string(),
        }
    );
}

#[tokio::test]
async fn test_fetch_sends_identity_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("User-Agent", "IdentityCheck/2.0"))
        .and(header("Accept-Language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let result = fetch_url(
        &client,
        &mock_server.uri(),
        &agent("IdentityCheck/2.0"),
        Duration::from_secs(5),
    )
    .await;

    assert!(result.is_success());
}

#[tokio::test]
async fn test_non_200_status_is_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/created"))
        .respond_with(ResponseTemplate::new(201).set_body_string("made"))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let headers = agent("TestAgent/1.0");

    for (route, expected) in [("/missing", 404), ("/created", 201)] {
        let url = format!("{}{}", mock_server.uri(), route);
        match fetch_url(&client, &url, &headers, Duration::from_secs(5)).await {
            FetchResult::HttpError { status, .. } => assert_eq!(status, expected),
            other => panic!("Expected HttpError for {}, got {:?}", route, other),
        }
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let result = fetch_url(
        &client,
        &mock_server.uri(),
        &agent("TestAgent/1.0"),
        Duration::from_millis(200),
    )
    .await;

    match result {
        FetchResult::TransportError { cause, .. } => assert!(cause.contains("timeout")),
        other => panic!("Expected TransportError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/new", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", location.as_str()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let url = format!("{}/old", mock_server.uri());
    let result = fetch_url(&client, &url, &agent("TestAgent/1.0"), Duration::from_secs(5)).await;

    match result {
        FetchResult::Success { url: fetched, body, .. } => {
            assert_eq!(fetched, url);
            assert_eq!(body, "moved");
        }
        other => panic!("Expected Success, got {:?}", other),
    }
}
