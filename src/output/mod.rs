//! Output module for page reports and batch summaries
//!
//! This module handles:
//! - Encoding page facts as HTML, CSV or PDF reports
//! - Collecting and displaying batch statistics

mod csv;
mod html;
mod pdf;
mod report;
pub mod stats;

pub use csv::format_csv_report;
pub use html::{escape_html, format_html_report};
pub use pdf::{layout, render_pdf_report};
pub use report::{Report, ReportContent, ReportError, ReportFormat, ReportResult};
pub use stats::{print_summary, BatchSummary, JobReport};

use crate::crawler::PageFacts;

/// Encodes page facts in the requested format
///
/// The PDF report is laid out from the HTML report of the same facts.
///
/// # Arguments
///
/// * `facts` - The facts extracted from one page
/// * `format` - The target encoding
///
/// # Returns
///
/// * `Ok(Report)` - The encoded report
/// * `Err(ReportError::Render)` - The PDF could not be produced
pub fn encode(facts: &PageFacts, format: ReportFormat) -> ReportResult<Report> {
    match format {
        ReportFormat::Html => Ok(Report::text(format, format_html_report(facts))),
        ReportFormat::Csv => Ok(Report::text(format, format_csv_report(facts))),
        ReportFormat::Pdf => {
            let html = format_html_report(facts);
            let title = format!("Report for {}", facts.source);
            render_pdf_report(&html, &title).map(|bytes| Report::binary(format, bytes))
        }
    }
}

/// Parses a format name and encodes in one step
///
/// # Returns
///
/// * `Err(ReportError::InvalidFormat)` - The format name is not supported
pub fn encode_named(facts: &PageFacts, format: &str) -> ReportResult<Report> {
    let format = format.parse::<ReportFormat>()?;
    encode(facts, format)
}
