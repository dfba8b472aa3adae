//! Crawler module for page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with per-job headers and timeouts
//! - HTML analysis (links, images, tag counts)
//! - Overall batch coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, FetchResult, DEFAULT_TIMEOUT};
pub use parser::{analyze, analyze_at, PageFacts, TagCount, TAG_VOCABULARY};
