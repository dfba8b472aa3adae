//! Artifact naming
//!
//! The file stem for a URL is the URL text with every `/` and `\` replaced by
//! `_`. Nothing else is changed, so the mapping is predictable from the URL
//! alone.

use crate::output::ReportFormat;

/// Maps a URL to a filesystem-safe file stem
pub fn safe_file_stem(url: &str) -> String {
    url.replace(['/', '\\'], "_")
}

/// File name of the raw page artifact
pub fn page_file_name(url: &str) -> String {
    format!("{}.html", safe_file_stem(url))
}

/// File name of the report artifact
pub fn report_file_name(url: &str, format: ReportFormat) -> String {
    format!("{}_report.{}", safe_file_stem(url), format.extension())
}
