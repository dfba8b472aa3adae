//! Batch targets
//!
//! A target keeps the URL text exactly as the user supplied it next to the
//! parsed form. The parsed `Url` is used for fetching and link resolution; the
//! supplied text names the artifacts and heads the reports, so
//! `http://host:8080` is not rewritten to `http://host:8080/` on disk.

use crate::url::parse_target_url;
use crate::UrlResult;
use std::fmt;
use url::Url;

/// One URL of a batch, as supplied and as parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    raw: String,
    url: Url,
}

impl Target {
    /// Parses a target, keeping the supplied text (without surrounding whitespace)
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scrape::url::Target;
    ///
    /// let target = Target::parse("http://example.com:8080").unwrap();
    /// assert_eq!(target.as_str(), "http://example.com:8080");
    /// assert_eq!(target.url().as_str(), "http://example.com:8080/");
    /// ```
    pub fn parse(raw: &str) -> UrlResult<Self> {
        let url = parse_target_url(raw)?;
        Ok(Self {
            raw: raw.trim().to_string(),
            url,
        })
    }

    /// The URL text as supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns true if `text` is either the supplied or the parsed form
    pub fn matches(&self, text: &str) -> bool {
        self.raw == text || self.url.as_str() == text
    }
}

impl From<Url> for Target {
    fn from(url: Url) -> Self {
        Self {
            raw: url.to_string(),
            url,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
