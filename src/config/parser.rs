use crate::config::types::{
    Config, ConfigOverrides, FileConfig, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_HEADERS_FILE,
    DEFAULT_OUTPUT_DIR, DEFAULT_REPORT_FORMAT, DEFAULT_TIMEOUT_SECS,
};
use crate::config::validation::{
    validate_concurrency, validate_headers_file, validate_output_dir, validate_timeout,
    validate_urls,
};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Loads and parses a TOML settings file
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully parsed settings
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file_config: FileConfig = toml::from_str(&content)?;
    Ok(file_config)
}

/// Merges the settings file and the command line into a validated config
///
/// Command-line values win over file values; URLs from both are kept, file
/// URLs first. Built-in defaults fill whatever neither source sets.
///
/// # Arguments
///
/// * `file` - Parsed settings file, if one was given
/// * `overrides` - Values from the command line
///
/// # Returns
///
/// * `Ok(Config)` - Successfully merged and validated configuration
/// * `Err(ConfigError)` - A value failed validation
pub fn resolve_config(
    file: Option<FileConfig>,
    overrides: ConfigOverrides,
) -> Result<Config, ConfigError> {
    let file = file.unwrap_or_default();

    let mut raw_urls = file.urls;
    raw_urls.extend(overrides.urls);

    let headers_file = overrides
        .headers_file
        .or(file.headers_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HEADERS_FILE));
    let concurrent_requests = overrides
        .concurrent_requests
        .or(file.concurrent_requests)
        .unwrap_or(DEFAULT_CONCURRENT_REQUESTS);
    let output_dir = overrides
        .output_dir
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let report_format = overrides
        .report_format
        .or(file.report_format)
        .unwrap_or_else(|| DEFAULT_REPORT_FORMAT.to_string());
    let timeout_secs = overrides
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let urls = validate_urls(&raw_urls)?;
    validate_headers_file(&headers_file)?;
    validate_concurrency(concurrent_requests)?;
    validate_output_dir(&output_dir)?;
    validate_timeout(timeout_secs)?;

    Ok(Config {
        urls,
        headers_file,
        concurrent_requests: concurrent_requests as usize,
        output_dir,
        report_format,
        timeout: Duration::from_secs(timeout_secs),
    })
}

/// Loads the optional settings file and resolves it against the command line
pub fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
    let file = path.map(load_file_config).transpose()?;
    resolve_config(file, overrides)
}

/// Computes a SHA-256 hash of a configuration source
///
/// Logged when the header identity file is loaded so a run can be tied to
/// the exact identities it used.
///
/// # Returns
///
/// Hex-encoded SHA-256 digest (64 characters)
pub fn compute_source_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
