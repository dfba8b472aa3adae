//! Storage module for persisting page artifacts
//!
//! This module handles all filesystem writes for a batch:
//! - Mapping URLs to filesystem-safe artifact names
//! - Writing raw page bodies
//! - Writing encoded reports (text or binary)
//!
//! Jobs write distinct files without coordination. Two URLs that map to the
//! same safe name overwrite each other; the last write wins.

mod fs;
mod naming;

pub use fs::ArtifactStore;
pub use naming::{page_file_name, report_file_name, safe_file_stem};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
