//! Report types and errors
//!
//! This module defines the supported report formats, the encoded report
//! payload, and the errors report encoding can raise.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while encoding a report
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Invalid report format: {0}")]
    InvalidFormat(String),

    #[error("Failed to render report: {0}")]
    Render(String),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Supported report encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Structured markup
    Html,
    /// Comma-separated rows
    Csv,
    /// Paginated document laid out from the HTML report
    Pdf,
}

impl ReportFormat {
    /// All formats, in the order they are listed to users
    pub const ALL: [ReportFormat; 3] = [Self::Html, Self::Pdf, Self::Csv];

    /// File extension used for report artifacts
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    /// Returns true if the encoded report is binary rather than text
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    /// Parses a format name, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ReportError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encoded report content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportContent {
    Text(String),
    Binary(Vec<u8>),
}

/// An encoded report for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    format: ReportFormat,
    content: ReportContent,
}

impl Report {
    /// Creates a text report
    pub fn text(format: ReportFormat, text: String) -> Self {
        Self {
            format,
            content: ReportContent::Text(text),
        }
    }

    /// Creates a binary report
    pub fn binary(format: ReportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            content: ReportContent::Binary(bytes),
        }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn content(&self) -> &ReportContent {
        &self.content
    }

    /// The report as text, `None` for binary reports
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            ReportContent::Text(text) => Some(text),
            ReportContent::Binary(_) => None,
        }
    }

    /// The raw bytes to write to disk
    pub fn as_bytes(&self) -> &[u8] {
        match &self.content {
            ReportContent::Text(text) => text.as_bytes(),
            ReportContent::Binary(bytes) => bytes,
        }
    }
}
