/// Terminal outcome definitions for page jobs
///
/// Every URL in a batch ends in exactly one of these states. Outcomes are used
/// for per-URL status lines and the batch summary; they are never persisted.
use std::fmt;
use std::path::PathBuf;

/// Represents how the job for one URL ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    // ===== Terminal Success States =====
    /// Raw page and report were both written
    Scraped {
        page_path: PathBuf,
        report_path: PathBuf,
    },

    // ===== Fetch Failures (nothing written) =====
    /// The server answered with a status other than 200
    HttpFailed { status: u16 },

    /// The request failed before a usable response arrived
    TransportFailed { cause: String },

    // ===== Report Failures (raw page written) =====
    /// The requested report format is not supported
    InvalidFormat { page_path: PathBuf, format: String },

    /// The report could not be rendered
    ReportFailed { page_path: PathBuf, reason: String },

    // ===== Other =====
    /// An artifact could not be written
    StorageFailed { reason: String },

    /// The batch was interrupted before this job finished
    Cancelled,
}

impl JobOutcome {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Scraped { .. })
    }

    /// Returns true if this represents an error state
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Scraped { .. } | Self::Cancelled)
    }

    /// Returns true if the fetch itself failed
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::HttpFailed { .. } | Self::TransportFailed { .. })
    }

    /// Returns true if the page was fetched but its report is missing
    pub fn is_report_failure(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. } | Self::ReportFailed { .. })
    }

    /// Path of the raw page artifact, when one was written
    pub fn page_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Scraped { page_path, .. }
            | Self::InvalidFormat { page_path, .. }
            | Self::ReportFailed { page_path, .. } => Some(page_path),
            _ => None,
        }
    }

    /// Short machine-friendly label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scraped { .. } => "scraped",
            Self::HttpFailed { .. } => "http_error",
            Self::TransportFailed { .. } => "transport_error",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::ReportFailed { .. } => "report_error",
            Self::StorageFailed { .. } => "storage_error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scraped { report_path, .. } => write!(f, "scraped (report: {})", report_path.display()),
            Self::HttpFailed { status } => write!(f, "Status code: {}", status),
            Self::TransportFailed { cause } => write!(f, "Error: {}", cause),
            Self::InvalidFormat { format, .. } => write!(f, "Invalid report format: {}", format),
            Self::ReportFailed { reason, .. } => write!(f, "Report error: {}", reason),
            Self::StorageFailed { reason } => write!(f, "Storage error: {}", reason),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
