//! Configuration module for Sumi-Scrape
//!
//! This module merges an optional TOML settings file with command-line values
//! and validates the result before any page is fetched.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scrape::config::{load_config, ConfigOverrides};
//! use std::path::Path;
//!
//! let overrides = ConfigOverrides {
//!     urls: vec!["https://example.com/".to_string()],
//!     ..Default::default()
//! };
//! let config = load_config(Some(Path::new("scrape.toml")), overrides).unwrap();
//! println!("Concurrency cap: {}", config.concurrent_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConfigOverrides, FileConfig, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_HEADERS_FILE,
    DEFAULT_OUTPUT_DIR, DEFAULT_REPORT_FORMAT, DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{compute_source_hash, load_config, load_file_config, resolve_config};
