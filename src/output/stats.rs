//! Batch statistics
//!
//! This module collects the per-URL outcomes of a batch and provides
//! functionality for displaying a summary once the batch finishes.

use crate::state::JobOutcome;
use crate::url::Target;
use std::time::Duration;

/// Final outcome of one URL in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub target: Target,
    pub outcome: JobOutcome,
}

/// Summary of a completed (or interrupted) batch
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// One entry per job, in completion order
    pub reports: Vec<JobReport>,

    /// Wall-clock time for the batch
    pub elapsed: Duration,

    /// Highest number of jobs that were in flight at the same time
    pub peak_in_flight: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn scraped(&self) -> usize {
        self.count(JobOutcome::is_success)
    }

    pub fn failed(&self) -> usize {
        self.count(JobOutcome::is_failure)
    }

    pub fn http_failures(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::HttpFailed { .. }))
    }

    pub fn transport_failures(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::TransportFailed { .. }))
    }

    pub fn report_failures(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::ReportFailed { .. }))
    }

    pub fn invalid_formats(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::InvalidFormat { .. }))
    }

    pub fn storage_failures(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::StorageFailed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::Cancelled))
    }

    /// Percentage of jobs that produced both artifacts
    pub fn success_rate(&self) -> f64 {
        if self.reports.is_empty() {
            0.0
        } else {
            (self.scraped() as f64 / self.total() as f64) * 100.0
        }
    }

    /// Looks up the outcome recorded for a URL, in supplied or parsed form
    pub fn outcome_for(&self, url: &str) -> Option<&JobOutcome> {
        self.reports
            .iter()
            .find(|report| report.target.matches(url))
            .map(|report| &report.outcome)
    }

    fn count(&self, predicate: impl Fn(&JobOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

/// Prints a batch summary to stdout
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &BatchSummary) {
    println!();
    println!("=== Batch Summary ===\n");

    println!("Overview:");
    println!("  Total URLs: {}", summary.total());
    println!("  Scraped: {}", summary.scraped());
    println!("  Failed: {}", summary.failed());
    if summary.cancelled() > 0 {
        println!("  Cancelled: {}", summary.cancelled());
    }
    println!("  Elapsed: {:.2}s", summary.elapsed.as_secs_f64());
    println!("  Peak concurrent requests: {}", summary.peak_in_flight);
    println!();

    if summary.failed() > 0 {
        println!("Failure Summary:");
        for (label, count) in [
            ("HTTP status", summary.http_failures()),
            ("Transport error", summary.transport_failures()),
            ("Invalid report format", summary.invalid_formats()),
            ("Report rendering", summary.report_failures()),
            ("Storage", summary.storage_failures()),
        ] {
            if count > 0 {
                println!("  {}: {}", label, count);
            }
        }
        println!();

        println!("Failed URLs:");
        for report in summary.reports.iter().filter(|r| r.outcome.is_failure()) {
            println!("  - {} ({})", report.target, report.outcome);
        }
        println!();
    }

    println!("Success rate: {:.1}%", summary.success_rate());
}
