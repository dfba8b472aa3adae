use crate::url::Target;
use crate::ConfigError;
use std::path::Path;

/// Upper bound for the concurrency cap
pub const MAX_CONCURRENT_REQUESTS: u32 = 100;

/// Upper bound for the per-request timeout
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the target URL list and parses every entry
pub fn validate_urls(urls: &[String]) -> Result<Vec<Target>, ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one URL is required".to_string(),
        ));
    }

    urls.iter()
        .map(|raw| {
            Target::parse(raw)
                .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target URL '{}': {}", raw, e)))
        })
        .collect()
}

/// Validates the concurrency cap
pub fn validate_concurrency(concurrent_requests: u32) -> Result<(), ConfigError> {
    if concurrent_requests < 1 || concurrent_requests > MAX_CONCURRENT_REQUESTS {
        return Err(ConfigError::Validation(format!(
            "concurrent_requests must be between 1 and {}, got {}",
            MAX_CONCURRENT_REQUESTS, concurrent_requests
        )));
    }

    Ok(())
}

/// Validates the per-request timeout
pub fn validate_timeout(timeout_secs: u64) -> Result<(), ConfigError> {
    if timeout_secs < 1 || timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout must be between 1 and {} seconds, got {}",
            MAX_TIMEOUT_SECS, timeout_secs
        )));
    }

    Ok(())
}

/// Validates the output directory path
pub fn validate_output_dir(output_dir: &Path) -> Result<(), ConfigError> {
    if output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if output_dir.is_file() {
        return Err(ConfigError::Validation(format!(
            "output_dir '{}' exists and is not a directory",
            output_dir.display()
        )));
    }

    Ok(())
}

/// Validates the header identity file path
pub fn validate_headers_file(headers_file: &Path) -> Result<(), ConfigError> {
    if headers_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "headers_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}
