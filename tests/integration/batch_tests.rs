//! End-to-end batch tests
//!
//! Each test runs a `Coordinator` against a mock server and checks the
//! artifacts left in a temporary output directory.

use crate::{file_count, page_url, test_config, test_pool};
use std::time::{Duration, Instant};
use sumi_scrape::state::JobOutcome;
use sumi_scrape::{Coordinator, HeaderPool};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REFERENCE_PAGE: &str = r#"<html><body><a href="/x">x</a><a href="http://other.com/y">y</a><img src="/z.png"></body></html>"#;

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failed_url_does_not_affect_others() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/ok", REFERENCE_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls = vec![page_url(&base, "/gone"), page_url(&base, "/ok")];
    let config = test_config(urls.clone(), dir.path(), 4);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let summary = coordinator.run(&urls, "csv").await.unwrap();

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.scraped(), 1);
    assert_eq!(
        summary.outcome_for(urls[0].as_str()),
        Some(&JobOutcome::HttpFailed { status: 404 })
    );

    // Raw page and report for the good URL only
    assert_eq!(file_count(dir.path()), 2);

    let Some(JobOutcome::Scraped {
        page_path,
        report_path,
    }) = summary.outcome_for(urls[1].as_str())
    else {
        panic!("Expected /ok to be scraped");
    };

    assert_eq!(std::fs::read_to_string(page_path).unwrap(), REFERENCE_PAGE);

    let csv = std::fs::read_to_string(report_path).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0], format!("URL,{}", urls[1]));
    assert!(rows[1].starts_with("Timestamp,"));
    assert_eq!(rows[2], "Type,Link");
    assert_eq!(rows[3], format!("Internal,{}/x", base));
    assert_eq!(rows[4], "External,http://other.com/y");
    assert_eq!(rows[5], "Images");
    assert_eq!(rows[6], format!("Image,{}/z.png", base));
    assert_eq!(rows[7], "HTML Tag Count");
    assert_eq!(rows[8], "a,2");
}

#[tokio::test]
async fn test_artifact_names_follow_url() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/docs/intro", "<p>intro</p>").await;

    let dir = TempDir::new().unwrap();
    let url = page_url(&mock_server.uri(), "/docs/intro");
    let config = test_config(vec![url.clone()], dir.path(), 1);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let summary = coordinator.run(&[url.clone()], "html").await.unwrap();
    assert_eq!(summary.scraped(), 1);

    let stem = url.as_str().replace('/', "_");
    assert!(dir.path().join(format!("{}.html", stem)).is_file());
    assert!(dir.path().join(format!("{}_report.html", stem)).is_file());
}

#[tokio::test]
async fn test_unknown_format_keeps_raw_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", REFERENCE_PAGE).await;

    let dir = TempDir::new().unwrap();
    let url = page_url(&mock_server.uri(), "/");
    let config = test_config(vec![url.clone()], dir.path(), 2);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let summary = coordinator.run(&[url.clone()], "xml").await.unwrap();

    assert_eq!(summary.invalid_formats(), 1);
    match summary.outcome_for(url.as_str()) {
        Some(JobOutcome::InvalidFormat { page_path, format }) => {
            assert_eq!(format, "xml");
            assert_eq!(std::fs::read_to_string(page_path).unwrap(), REFERENCE_PAGE);
        }
        other => panic!("Expected InvalidFormat, got {:?}", other),
    }

    assert_eq!(file_count(dir.path()), 1);
}

#[tokio::test]
async fn test_report_formats_written() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", REFERENCE_PAGE).await;

    let url = page_url(&mock_server.uri(), "/");

    for format in ["html", "csv", "pdf", "PDF"] {
        let dir = TempDir::new().unwrap();
        let config = test_config(vec![url.clone()], dir.path(), 1);
        let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();

        let summary = coordinator.run(&[url.clone()], format).await.unwrap();

        let Some(JobOutcome::Scraped { report_path, .. }) = summary.outcome_for(url.as_str())
        else {
            panic!("Expected {} report to be written", format);
        };

        let extension = format.to_ascii_lowercase();
        assert!(report_path
            .to_string_lossy()
            .ends_with(&format!("_report.{}", extension)));

        let bytes = std::fs::read(report_path).unwrap();
        match extension.as_str() {
            "pdf" => assert!(bytes.starts_with(b"%PDF-")),
            "html" => {
                let text = String::from_utf8(bytes).unwrap();
                assert!(text.contains("<h2>HTML Tag Count</h2>"));
                assert!(text.contains("External: <a href=\"http://other.com/y\">"));
            }
            _ => {
                let text = String::from_utf8(bytes).unwrap();
                assert!(text.starts_with("URL,"));
            }
        }
    }
}

#[tokio::test]
async fn test_pdf_report_with_non_ascii_link() {
    let mock_server = MockServer::start().await;
    let body = r#"<html><body><a href="http://other.com/café">menu</a><a href="http://bücher.example/">books</a></body></html>"#;
    mount_page(&mock_server, "/", body).await;

    let dir = TempDir::new().unwrap();
    let url = page_url(&mock_server.uri(), "/");
    let config = test_config(vec![url.clone()], dir.path(), 1);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let summary = coordinator.run(&[url.clone()], "pdf").await.unwrap();

    assert_eq!(summary.report_failures(), 0);
    let Some(JobOutcome::Scraped { report_path, .. }) = summary.outcome_for(url.as_str()) else {
        panic!("Expected a PDF report");
    };
    assert!(std::fs::read(report_path).unwrap().starts_with(b"%PDF-"));
    assert_eq!(file_count(dir.path()), 2);
}

#[tokio::test]
async fn test_artifact_names_use_supplied_url_text() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", REFERENCE_PAGE).await;

    // No trailing slash; the parsed form would gain one
    let supplied = mock_server.uri();
    assert!(!supplied.ends_with('/'));

    let dir = TempDir::new().unwrap();
    let url = page_url(&supplied, "");
    let config = test_config(vec![url.clone()], dir.path(), 1);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let summary = coordinator.run(&[url.clone()], "csv").await.unwrap();
    assert_eq!(summary.scraped(), 1);

    let stem = supplied.replace('/', "_");
    assert!(stem.starts_with("http:__127.0.0.1:"));
    assert!(dir.path().join(format!("{}.html", stem)).is_file());

    let report = dir.path().join(format!("{}_report.csv", stem));
    let csv = std::fs::read_to_string(report).unwrap();
    assert_eq!(csv.lines().next(), Some(format!("URL,{}", supplied).as_str()));
    assert_eq!(file_count(dir.path()), 2);
}

#[tokio::test]
async fn test_every_request_uses_a_pool_identity() {
    let mock_server = MockServer::start().await;

    for agent in ["AgentA/1.0", "AgentB/2.0"] {
        Mock::given(method("GET"))
            .and(header("User-Agent", agent))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let urls: Vec<_> = (0..8)
        .map(|i| page_url(&mock_server.uri(), &format!("/p{}", i)))
        .collect();
    let config = test_config(urls.clone(), dir.path(), 4);

    let coordinator = Coordinator::new(&config, test_pool(&["AgentA/1.0", "AgentB/2.0"])).unwrap();
    let summary = coordinator.run(&urls, "csv").await.unwrap();

    // Requests without a matching agent would get wiremock's default 404
    assert_eq!(summary.scraped(), 8);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_concurrency_cap_is_enforced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>slow</p>")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls: Vec<_> = (0..6)
        .map(|i| page_url(&mock_server.uri(), &format!("/slow{}", i)))
        .collect();
    let config = test_config(urls.clone(), dir.path(), 2);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let started = Instant::now();
    let summary = coordinator.run(&urls, "csv").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.scraped(), 6);
    assert!(summary.peak_in_flight <= 2);
    assert!(summary.peak_in_flight >= 1);

    // Three waves of two requests each
    assert!(elapsed >= Duration::from_millis(850), "finished in {:?}", elapsed);
}

#[tokio::test]
async fn test_jobs_run_concurrently_under_cap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>slow</p>")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls: Vec<_> = (0..5)
        .map(|i| page_url(&mock_server.uri(), &format!("/wide{}", i)))
        .collect();
    let config = test_config(urls.clone(), dir.path(), 10);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let started = Instant::now();
    let summary = coordinator.run(&urls, "csv").await.unwrap();

    assert_eq!(summary.scraped(), 5);
    assert!(summary.peak_in_flight <= 5);
    assert!(started.elapsed() < Duration::from_millis(2000));
}

#[tokio::test]
async fn test_cancellation_stops_outstanding_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>never</p>")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls: Vec<_> = (0..4)
        .map(|i| page_url(&mock_server.uri(), &format!("/hang{}", i)))
        .collect();
    let mut config = test_config(urls.clone(), dir.path(), 2);
    config.timeout = Duration::from_secs(30);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    let summary = coordinator.run(&urls, "csv").await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(coordinator.is_cancelled());
    assert_eq!(summary.total(), 4);
    assert_eq!(summary.cancelled(), 4);
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_cancellation_keeps_finished_pages_reported() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/fast", REFERENCE_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>never</p>")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls = vec![
        page_url(&mock_server.uri(), "/fast"),
        page_url(&mock_server.uri(), "/slow"),
    ];
    let mut config = test_config(urls.clone(), dir.path(), 2);
    config.timeout = Duration::from_secs(30);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        cancel.cancel();
    });

    let summary = coordinator.run(&urls, "csv").await.unwrap();

    assert_eq!(summary.total(), 2);
    assert_eq!(
        summary.outcome_for(urls[1].as_str()),
        Some(&JobOutcome::Cancelled)
    );

    let Some(JobOutcome::Scraped {
        page_path,
        report_path,
    }) = summary.outcome_for(urls[0].as_str())
    else {
        panic!("Expected /fast to be scraped before the interrupt");
    };
    assert!(page_path.is_file());
    assert!(report_path.is_file());

    // Every file on disk belongs to a reported outcome
    assert_eq!(file_count(dir.path()), 2);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    let dir = TempDir::new().unwrap();
    let url = sumi_scrape::Target::parse("http://127.0.0.1:1/").unwrap();
    let config = test_config(vec![url.clone()], dir.path(), 1);

    let coordinator = Coordinator::new(&config, test_pool(&["TestAgent/1.0"])).unwrap();
    let summary = coordinator.run(&[url.clone()], "csv").await.unwrap();

    assert_eq!(summary.transport_failures(), 1);
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_empty_pool_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = test_config(vec![], dir.path(), 1);

    assert!(Coordinator::new(&config, HeaderPool::new(vec![])).is_err());
}
