//! State module for tracking batch progress
//!
//! # Components
//!
//! - `JobOutcome`: The terminal state of one page job (scraped, failed with reason, cancelled)

mod job_outcome;

// Re-export main types
pub use job_outcome::JobOutcome;
