//! Filesystem artifact store
//!
//! Writes raw pages and reports under one output directory using `tokio::fs`,
//! so a write is a suspension point for the job rather than a blocked thread.

use crate::output::{Report, ReportFormat};
use crate::storage::naming::{page_file_name, report_file_name};
use crate::storage::{StorageError, StorageResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes page and report artifacts into an output directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`
    ///
    /// The directory is not touched until [`ArtifactStore::ensure_root`] or
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the raw page for `url` is written to
    pub fn page_path(&self, url: &str) -> PathBuf {
        self.root.join(page_file_name(url))
    }

    /// Path the report for `url` is written to
    pub fn report_path(&self, url: &str, format: ReportFormat) -> PathBuf {
        self.root.join(report_file_name(url, format))
    }

    /// Creates the output directory and any missing parents
    pub async fn ensure_root(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })
    }

    /// Writes the exact page body for `url`
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(StorageError)` - The file could not be written
    pub async fn save_page(&self, url: &str, body: &str) -> StorageResult<PathBuf> {
        let path = self.page_path(url);
        self.write(path, body.as_bytes()).await
    }

    /// Writes an encoded report for `url`
    ///
    /// Binary reports are written byte for byte, text reports as UTF-8.
    pub async fn save_report(&self, url: &str, report: &Report) -> StorageResult<PathBuf> {
        let path = self.report_path(url, report.format());
        self.write(path, report.as_bytes()).await
    }

    async fn write(&self, path: PathBuf, contents: &[u8]) -> StorageResult<PathBuf> {
        match tokio::fs::write(&path, contents).await {
            Ok(()) => {
                debug!("Wrote {} bytes to {}", contents.len(), path.display());
                Ok(path)
            }
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}
