//! Batch coordinator - main scrape orchestration logic
//!
//! This module runs one job per URL and coordinates:
//! - Drawing a header identity for every job
//! - Capping simultaneous fetches with a semaphore
//! - Fetching, persisting, analyzing and reporting each page
//! - Interrupting outstanding jobs on cancellation
//! - Collecting per-URL outcomes into a batch summary

use crate::config::Config;
use crate::crawler::{analyze, build_http_client, fetch_url, FetchResult};
use crate::headers::{HeaderPool, HeaderSet};
use crate::output::{encode, BatchSummary, JobReport, ReportFormat};
use crate::state::JobOutcome;
use crate::storage::ArtifactStore;
use crate::url::Target;
use crate::{HeaderError, ScrapeError};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// State shared by every job of a batch
struct JobContext {
    client: Client,
    store: ArtifactStore,
    timeout: Duration,
}

/// Counts jobs currently holding a permit and remembers the peak
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(self: &Arc<Self>) -> InFlightGuard {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(Arc::clone(self))
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Main batch coordinator structure
pub struct Coordinator {
    context: Arc<JobContext>,
    pool: Arc<HeaderPool>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    concurrent_requests: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The resolved configuration
    /// * `pool` - The loaded header pool
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run batches
    /// * `Err(ScrapeError::Header)` - The header pool is empty
    /// * `Err(ScrapeError::Reqwest)` - The HTTP client could not be built
    pub fn new(config: &Config, pool: HeaderPool) -> Result<Self, ScrapeError> {
        if pool.is_empty() {
            return Err(HeaderError::EmptyPool.into());
        }

        let client = build_http_client()?;
        let concurrent_requests = config.concurrent_requests.max(1);

        Ok(Self {
            context: Arc::new(JobContext {
                client,
                store: ArtifactStore::new(config.output_dir.clone()),
                timeout: config.timeout,
            }),
            pool: Arc::new(pool),
            semaphore: Arc::new(Semaphore::new(concurrent_requests)),
            cancel: CancellationToken::new(),
            concurrent_requests,
        })
    }

    /// Token that interrupts the batch when cancelled
    ///
    /// Cancelling stops jobs that have not started fetching and drops
    /// in-flight requests. A job whose fetch already completed finishes
    /// writing its artifacts, so every file on disk has a matching outcome.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Maximum number of simultaneous fetches
    pub fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    /// Runs one job per URL and waits for all of them
    ///
    /// All jobs are spawned up front. Each job waits for a semaphore permit
    /// before fetching and releases it when it finishes, whatever the outcome.
    /// Failures of individual URLs are recorded in the summary and never stop
    /// the batch.
    ///
    /// # Arguments
    ///
    /// * `targets` - The pages to scrape
    /// * `format` - Report format name, parsed per job
    ///
    /// # Returns
    ///
    /// * `Ok(BatchSummary)` - One report per URL, in completion order
    /// * `Err(ScrapeError::Header)` - No header identity could be drawn
    pub async fn run(&self, targets: &[Target], format: &str) -> Result<BatchSummary, ScrapeError> {
        info!(
            "Scraping {} URLs with up to {} concurrent requests",
            targets.len(),
            self.concurrent_requests
        );

        let start = Instant::now();
        let in_flight = Arc::new(InFlight::default());
        let mut jobs = FuturesUnordered::new();

        for target in targets {
            let headers = self.pool.next()?;
            let job = Job {
                context: Arc::clone(&self.context),
                semaphore: Arc::clone(&self.semaphore),
                cancel: self.cancel.clone(),
                in_flight: Arc::clone(&in_flight),
                target: target.clone(),
                format: format.to_string(),
            };

            let handle = tokio::spawn(job.run(headers));
            let target = target.clone();
            jobs.push(async move { (target, handle.await) });
        }

        let mut reports = Vec::with_capacity(targets.len());

        while let Some((target, joined)) = jobs.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => {
                    error!("Job for {} was aborted: {}", target, e);
                    JobOutcome::Cancelled
                }
            };
            reports.push(JobReport { target, outcome });
        }

        let summary = BatchSummary {
            reports,
            elapsed: start.elapsed(),
            peak_in_flight: in_flight.peak(),
        };

        info!(
            "Batch finished: {} scraped, {} failed, {} cancelled in {:.2}s",
            summary.scraped(),
            summary.failed(),
            summary.cancelled(),
            summary.elapsed.as_secs_f64()
        );

        Ok(summary)
    }
}

/// One URL's unit of work
struct Job {
    context: Arc<JobContext>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    in_flight: Arc<InFlight>,
    target: Target,
    format: String,
}

impl Job {
    async fn run(self, headers: Arc<HeaderSet>) -> JobOutcome {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return JobOutcome::Cancelled,
            permit = Arc::clone(&self.semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return JobOutcome::Cancelled,
            },
        };
        let _in_flight = self.in_flight.enter();

        debug!("Fetching {}", self.target);

        process_url(&self.context, &self.target, &headers, &self.format, &self.cancel).await
    }
}

/// Fetches a page, stores it, then analyzes and reports on it
///
/// Cancellation only interrupts the fetch. Once a body has arrived the job
/// runs to its terminal state, so a written page is always reported. The raw
/// page is written before the report format is checked, so an unsupported
/// format still leaves the page on disk.
async fn process_url(
    context: &JobContext,
    target: &Target,
    headers: &HeaderSet,
    format: &str,
    cancel: &CancellationToken,
) -> JobOutcome {
    let fetched = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Cancelled {}", target);
            return JobOutcome::Cancelled;
        }
        fetched = fetch_url(&context.client, target.url().as_str(), headers, context.timeout) => fetched,
    };

    let body = match fetched {
        FetchResult::Success { body, .. } => body,
        FetchResult::HttpError { status, .. } => {
            warn!("Failed to scrape {} - Status code: {}", target, status);
            return JobOutcome::HttpFailed { status };
        }
        FetchResult::TransportError { cause, .. } => {
            warn!("Failed to scrape {} - Error: {}", target, cause);
            return JobOutcome::TransportFailed { cause };
        }
    };

    store_and_report(context, target, &body, format).await
}

/// Writes the raw page, then encodes and writes its report
async fn store_and_report(context: &JobContext, target: &Target, body: &str, format: &str) -> JobOutcome {
    let page_path = match context.store.save_page(target.as_str(), body).await {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to save page for {}: {}", target, e);
            return JobOutcome::StorageFailed {
                reason: e.to_string(),
            };
        }
    };

    info!("Scraped {}", target);

    let report_format = match format.parse::<ReportFormat>() {
        Ok(report_format) => report_format,
        Err(e) => {
            warn!("{} for {}", e, target);
            return JobOutcome::InvalidFormat {
                page_path,
                format: format.to_string(),
            };
        }
    };

    let facts = analyze(body, target.url()).with_source(target.as_str());
    debug!(
        "Analyzed {}: {} links, {} images",
        target,
        facts.link_count(),
        facts.images.len()
    );

    let report = match encode(&facts, report_format) {
        Ok(report) => report,
        Err(e) => {
            warn!("Failed to build {} report for {}: {}", report_format, target, e);
            return JobOutcome::ReportFailed {
                page_path,
                reason: e.to_string(),
            };
        }
    };

    match context.store.save_report(target.as_str(), &report).await {
        Ok(report_path) => JobOutcome::Scraped {
            page_path,
            report_path,
        },
        Err(e) => {
            error!("Failed to save report for {}: {}", target, e);
            JobOutcome::StorageFailed {
                reason: e.to_string(),
            }
        }
    }
}
