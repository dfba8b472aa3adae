use url::Url;

/// Extracts the network authority from a URL
///
/// The authority is the lowercase host, followed by `:port` when the URL
/// names a non-default port. The scheme is not part of it, so
/// `http://example.com/` and `https://example.com/` share an authority.
///
/// # Arguments
///
/// * `url` - The URL to extract the authority from
///
/// # Returns
///
/// * `Some(String)` - The authority
/// * `None` - If the URL has no host (`mailto:`, `data:`, ...)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scrape::url::authority;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://example.com:8080/").unwrap();
/// assert_eq!(authority(&url), Some("example.com:8080".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Computes the authority named by an href exactly as it was authored
///
/// Only hrefs that spell out `//` before the host carry an authority:
/// absolute ones (`scheme://host/...`) and scheme-relative ones
/// (`//host/...`). Relative paths, queries and fragments return `None`,
/// as do `http:foo` style references, which resolve against the page.
///
/// # Arguments
///
/// * `href` - The raw attribute value
/// * `base_url` - The page the href appeared on, used for scheme-relative hrefs
pub fn href_authority(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.starts_with("//") {
        return base_url.join(href).ok().and_then(|url| authority(&url));
    }

    let (_scheme, rest) = href.split_once(':')?;
    if !rest.starts_with("//") {
        return None;
    }

    Url::parse(href).ok().and_then(|url| authority(&url))
}
