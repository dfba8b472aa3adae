//! Integration tests for Sumi-Scrape
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! fetcher and full batches end-to-end against a temporary output directory.

mod batch_tests;
mod fetch_tests;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Duration;
use sumi_scrape::config::Config;
use sumi_scrape::url::Target;
use sumi_scrape::{HeaderPool, HeaderSet};

/// Builds a configuration for the given URLs and output directory
pub fn test_config(urls: Vec<Target>, output_dir: &Path, concurrent_requests: usize) -> Config {
    Config {
        urls,
        headers_file: output_dir.join("user_agents.txt"),
        concurrent_requests,
        output_dir: output_dir.to_path_buf(),
        report_format: "csv".to_string(),
        timeout: Duration::from_secs(5),
    }
}

/// A header pool with one identity per user agent, drawn with a fixed seed
pub fn test_pool(user_agents: &[&str]) -> HeaderPool {
    let sets = user_agents
        .iter()
        .map(|agent| HeaderSet::from_pairs([("User-Agent", *agent)]).unwrap())
        .collect();
    HeaderPool::with_rng(sets, StdRng::seed_from_u64(7))
}

/// URL for a path on the mock server
pub fn page_url(base: &str, path: &str) -> Target {
    Target::parse(&format!("{}{}", base, path)).unwrap()
}

/// Number of entries in a directory
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
