//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a batch, including:
//! - Building the shared HTTP client
//! - GET requests carrying a per-job header identity and timeout
//! - Classification of every outcome into a `FetchResult`

use crate::headers::HeaderSet;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Timeout applied to each request unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirect hops followed by the client
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
///
/// Every failure mode is a variant, so fetching never returns an error to
/// the caller and a batch can always continue with the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The server answered 200 OK and the body decoded as text
    Success {
        /// The requested URL
        url: String,
        /// HTTP status code (always 200)
        status: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with any status other than 200
    HttpError {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// Network failure (connection refused, timeout, TLS, body decoding, etc.)
    TransportError {
        /// The requested URL
        url: String,
        /// Error description
        cause: String,
    },
}

impl FetchResult {
    /// The URL this result belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::HttpError { url, .. } | Self::TransportError { url, .. } => url,
        }
    }

    /// Returns true if the page body is available
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds the HTTP client shared by every job of a batch
///
/// Identity headers are not set here; each request carries the header set
/// drawn for its job.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_scrape::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one URL with the given identity and timeout
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 with a decodable body | `Success` |
/// | Any other HTTP status | `HttpError` (no retry) |
/// | Timeout | `TransportError` |
/// | Connection refused / DNS / TLS | `TransportError` |
/// | Body could not be read or decoded | `TransportError` |
///
/// Redirects are followed by the client and the final response is classified.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `headers` - Identity headers for this request
/// * `timeout` - Total time allowed for the request, body included
pub async fn fetch_url(client: &Client, url: &str, headers: &HeaderSet, timeout: Duration) -> FetchResult {
    let request = client
        .get(url)
        .headers(headers.header_map().clone())
        .timeout(timeout);

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::TransportError {
                url: url.to_string(),
                cause: describe_transport_error(&e, timeout),
            }
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            url: url.to_string(),
            status: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::TransportError {
            url: url.to_string(),
            cause: describe_transport_error(&e, timeout),
        },
    }
}

/// Produces a short cause description for a transport failure
fn describe_transport_error(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        format!("Request timeout after {}s", timeout.as_secs_f64())
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Redirect error: {}", error)
    } else if error.is_body() || error.is_decode() {
        format!("Failed to read body: {}", error)
    } else {
        error.to_string()
    }
}
