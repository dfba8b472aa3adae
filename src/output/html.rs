//! HTML report generation
//!
//! The HTML report is the structured form of a page's facts. The PDF report
//! is laid out from it, so the element structure here (h1, p, h2, li, tr) is
//! also what the PDF layout walks.

use crate::crawler::PageFacts;

/// Formats page facts as an HTML report
///
/// Sections, in order: header (URL and timestamp), links (internal entries
/// before external ones, each tagged with its kind), images, and the tag
/// count table in vocabulary order.
///
/// # Arguments
///
/// * `facts` - The facts extracted from one page
///
/// # Returns
///
/// A complete HTML document
pub fn format_html_report(facts: &PageFacts) -> String {
    let url = escape_html(&facts.source);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>Report for {}</title>\n", url));
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str(&format!("<h1>Report for {}</h1>\n", url));
    html.push_str(&format!("<p>Timestamp: {}</p>\n", facts.timestamp()));

    // Links
    html.push_str("<h2>Links</h2>\n<ul>\n");
    for (kind, class, links) in [
        ("Internal", "internal", &facts.internal_links),
        ("External", "external", &facts.external_links),
    ] {
        for link in links {
            let link = escape_html(link);
            html.push_str(&format!(
                "<li class=\"{}\">{}: <a href=\"{}\">{}</a></li>\n",
                class, kind, link, link
            ));
        }
    }
    html.push_str("</ul>\n");

    // Images
    html.push_str("<h2>Images</h2>\n<ul>\n");
    for image in &facts.images {
        html.push_str(&format!(
            "<li class=\"image\"><img src=\"{}\" alt=\"Image\" /></li>\n",
            escape_html(image)
        ));
    }
    html.push_str("</ul>\n");

    // Tag counts
    html.push_str("<h2>HTML Tag Count</h2>\n<table>\n");
    html.push_str("<thead><tr><th>Tag</th><th>Count</th></tr></thead>\n<tbody>\n");
    for entry in &facts.tag_counts {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            entry.tag, entry.count
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// Escapes text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
