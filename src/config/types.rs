use crate::url::Target;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default header identity file
pub const DEFAULT_HEADERS_FILE: &str = "user_agents.txt";

/// Default cap on simultaneous page jobs
pub const DEFAULT_CONCURRENT_REQUESTS: u32 = 10;

/// Default directory for raw pages and reports
pub const DEFAULT_OUTPUT_DIR: &str = "scraped_pages";

/// Default report format
pub const DEFAULT_REPORT_FORMAT: &str = "csv";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved settings for one batch run
///
/// Built from the optional settings file and the command line by
/// [`crate::config::resolve_config`], and validated before any fetch happens.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pages to fetch, in the order given, with their supplied text
    pub urls: Vec<Target>,

    /// File with one header mapping per line
    pub headers_file: PathBuf,

    /// Maximum number of page jobs in flight at once
    pub concurrent_requests: usize,

    /// Directory receiving raw pages and reports
    pub output_dir: PathBuf,

    /// Requested report format, checked per page job
    pub report_format: String,

    /// Per-request timeout
    pub timeout: Duration,
}

/// Optional TOML settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    /// Target URLs; command-line URLs are appended after these
    #[serde(default)]
    pub urls: Vec<String>,

    pub headers_file: Option<PathBuf>,

    pub concurrent_requests: Option<u32>,

    pub output_dir: Option<PathBuf>,

    pub report_format: Option<String>,

    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line
///
/// Every field set here takes precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub urls: Vec<String>,
    pub headers_file: Option<PathBuf>,
    pub concurrent_requests: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub report_format: Option<String>,
    pub timeout_secs: Option<u64>,
}
