//! URL handling module for Sumi-Scrape
//!
//! This module provides authority extraction for link classification and
//! validation of the target URLs a batch is started with.

mod authority;
mod target;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use authority::{authority, href_authority};
pub use target::Target;

/// Parses and validates a batch target URL
///
/// Targets must be absolute HTTP or HTTPS URLs with a host.
///
/// # Arguments
///
/// * `url_str` - The URL string as given on the command line or in the config file
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The URL is malformed or uses an unsupported scheme
///
/// # Examples
///
/// ```
/// use sumi_scrape::url::parse_target_url;
///
/// assert!(parse_target_url("https://example.com/").is_ok());
/// assert!(parse_target_url("ftp://example.com/").is_err());
/// ```
pub fn parse_target_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(format!("{url_str}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_and_https() {
        assert_eq!(
            parse_target_url("http://site.com/").unwrap().as_str(),
            "http://site.com/"
        );
        assert_eq!(
            parse_target_url("https://site.com/page").unwrap().as_str(),
            "https://site.com/page"
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(parse_target_url("  https://site.com/  ").is_ok());
    }

    #[test]
    fn test_reject_other_schemes() {
        assert!(matches!(
            parse_target_url("ftp://site.com/file"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            parse_target_url("mailto:a@b.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_reject_relative() {
        assert!(matches!(
            parse_target_url("/just/a/path"),
            Err(UrlError::Parse(_))
        ));
    }
}
