//! HTML analysis for page reports
//!
//! This module parses fetched HTML and extracts the facts a report is built
//! from:
//! - Internal links (same authority as the page, resolved to absolute URLs)
//! - External links (kept exactly as authored)
//! - Image URLs (resolved to absolute URLs)
//! - Element counts for a fixed tag vocabulary

use crate::url::{authority, href_authority};
use chrono::{DateTime, Local};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Tags counted in every report, in report order
pub const TAG_VOCABULARY: [&str; 9] = ["a", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Number of elements of one vocabulary tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagCount {
    pub tag: &'static str,
    pub count: usize,
}

/// Facts extracted from one fetched page
///
/// Built once by [`analyze`] and handed to the report encoder. Internal and
/// external links never overlap: every href is classified exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFacts {
    /// The page the facts were extracted from, used to resolve relative links
    pub url: Url,

    /// The page URL as the user supplied it, printed in report headers
    pub source: String,

    /// When the page was analyzed
    pub captured_at: DateTime<Local>,

    /// Same-authority links, absolute
    pub internal_links: BTreeSet<String>,

    /// Other-authority links, as written in the markup
    pub external_links: BTreeSet<String>,

    /// Image sources, absolute
    pub images: BTreeSet<String>,

    /// One entry per vocabulary tag, in vocabulary order
    pub tag_counts: Vec<TagCount>,
}

impl PageFacts {
    /// Count for a vocabulary tag, `None` for tags outside the vocabulary
    pub fn tag_count(&self, tag: &str) -> Option<usize> {
        self.tag_counts
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.count)
    }

    /// Capture time as printed in reports
    pub fn timestamp(&self) -> String {
        self.captured_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }

    /// Replaces the URL text shown in reports
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Total number of classified links
    pub fn link_count(&self) -> usize {
        self.internal_links.len() + self.external_links.len()
    }
}

/// Classification of one anchor href
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassifiedLink {
    Internal(String),
    External(String),
}

/// Analyzes a page body, stamping the facts with the current local time
///
/// Parsing is tolerant: malformed markup still yields a best-effort tree and
/// this function never fails.
///
/// # Arguments
///
/// * `body` - The HTML content to parse
/// * `source_url` - The URL the body was fetched from
///
/// # Example
///
/// ```
/// use sumi_scrape::crawler::analyze;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/x">x</a><a href="http://other.com/y">y</a></body></html>"#;
/// let facts = analyze(html, &Url::parse("http://site.com/").unwrap());
/// assert!(facts.internal_links.contains("http://site.com/x"));
/// assert!(facts.external_links.contains("http://other.com/y"));
/// assert_eq!(facts.tag_count("a"), Some(2));
/// ```
pub fn analyze(body: &str, source_url: &Url) -> PageFacts {
    analyze_at(body, source_url, Local::now())
}

/// Analyzes a page body with an explicit capture time
pub fn analyze_at(body: &str, source_url: &Url, captured_at: DateTime<Local>) -> PageFacts {
    let document = Html::parse_document(body);

    let (internal_links, external_links) = extract_links(&document, source_url);
    let images = extract_images(&document, source_url);
    let tag_counts = count_tags(&document);

    PageFacts {
        url: source_url.clone(),
        source: source_url.to_string(),
        captured_at,
        internal_links,
        external_links,
        images,
        tag_counts,
    }
}

/// Splits all anchor hrefs into internal and external sets
fn extract_links(document: &Html, source_url: &Url) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut internal = BTreeSet::new();
    let mut external = BTreeSet::new();

    let source_authority = authority(source_url);

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            match classify_link(href, source_url, source_authority.as_deref()) {
                Some(ClassifiedLink::Internal(link)) => {
                    internal.insert(link);
                }
                Some(ClassifiedLink::External(link)) => {
                    external.insert(link);
                }
                None => tracing::debug!("Skipping unresolvable href {:?} on {}", href, source_url),
            }
        }
    }

    (internal, external)
}

/// Classifies one href against the page it appeared on
///
/// An href naming an authority different from the page's is external and
/// kept verbatim. Everything else is internal and resolved against the page
/// URL. Returns `None` for internal hrefs that cannot be resolved.
fn classify_link(href: &str, source_url: &Url, source_authority: Option<&str>) -> Option<ClassifiedLink> {
    if let Some(link_authority) = href_authority(href, source_url) {
        if source_authority != Some(link_authority.as_str()) {
            return Some(ClassifiedLink::External(href.to_string()));
        }
    }

    source_url
        .join(href)
        .ok()
        .map(|resolved| ClassifiedLink::Internal(resolved.to_string()))
}

/// Collects every image source, resolved against the page URL
fn extract_images(document: &Html, source_url: &Url) -> BTreeSet<String> {
    let mut images = BTreeSet::new();

    if let Ok(img_selector) = Selector::parse("img[src]") {
        for element in document.select(&img_selector) {
            if let Some(src) = element.value().attr("src") {
                match source_url.join(src) {
                    Ok(resolved) => {
                        images.insert(resolved.to_string());
                    }
                    Err(e) => tracing::debug!("Skipping image {:?} on {}: {}", src, source_url, e),
                }
            }
        }
    }

    images
}

/// Counts elements for every vocabulary tag, nested elements included
fn count_tags(document: &Html) -> Vec<TagCount> {
    TAG_VOCABULARY
        .iter()
        .map(|&tag| {
            let count = Selector::parse(tag)
                .map(|selector| document.select(&selector).count())
                .unwrap_or(0);
            TagCount { tag, count }
        })
        .collect()
}
