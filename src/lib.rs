//! Sumi-Scrape: a concurrent page surveyor
//!
//! This crate fetches a batch of web pages concurrently, keeps their raw
//! content, extracts structural facts (links, images, tag counts) from each page
//! and writes a per-page report as HTML, CSV or PDF.

pub mod config;
pub mod crawler;
pub mod headers;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Scrape operations
///
/// Only startup problems surface as `ScrapeError`. Failures of individual
/// URLs are recorded as [`state::JobOutcome`] values and never abort a batch.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Header pool error: {0}")]
    Header(#[from] HeaderError),

    #[error("Report error: {0}")]
    Report(#[from] output::ReportError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Malformed header mapping on line {line}: {message}")]
    HeaderLine { line: usize, message: String },

    #[error("Invalid header on line {line}: {message}")]
    InvalidHeader { line: usize, message: String },
}

/// Header pool errors raised while drawing an identity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Header pool is empty, no request identity available")]
    EmptyPool,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sumi-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{analyze, fetch_url, Coordinator, FetchResult, PageFacts};
pub use headers::{HeaderPool, HeaderSet};
pub use output::{encode, Report, ReportFormat};
pub use state::JobOutcome;
pub use crate::url::Target;
