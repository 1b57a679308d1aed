// ABOUTME: Summary statistics produced by deploy and cleanup runs.
// ABOUTME: Serializable for JSON output, with a human-readable cleanup summary.

use crate::store::StorageEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Result of a deploy run in which every upload succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub uploaded_files: usize,
    pub uploaded_bytes: u64,
    pub dry_run: bool,
    pub elapsed_secs: f64,
}

/// Result of a cleanup run.
///
/// Deleted counters only include successful deletions; failed deletions are
/// listed in `failed_files`.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub total_listed_files: usize,
    pub retained_files: usize,
    pub total_deleted_files: usize,
    pub total_deleted_bytes: u64,
    pub failed_files: Vec<StorageEntry>,
    pub dry_run: bool,
    pub elapsed_secs: f64,
}

impl CleanupReport {
    pub(crate) fn new(
        version: &str,
        started_at: DateTime<Utc>,
        listed: usize,
        retained: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            version: version.to_string(),
            started_at,
            total_listed_files: listed,
            retained_files: retained,
            total_deleted_files: 0,
            total_deleted_bytes: 0,
            failed_files: Vec::new(),
            dry_run,
            elapsed_secs: 0.0,
        }
    }

    pub(crate) fn record_deleted(&mut self, entry: &StorageEntry) {
        self.total_deleted_files += 1;
        self.total_deleted_bytes += entry.content_length;
    }

    pub(crate) fn record_failed(&mut self, entry: StorageEntry) {
        self.failed_files.push(entry);
    }

    pub fn deleted_megabytes(&self) -> f64 {
        self.total_deleted_bytes as f64 / BYTES_PER_MEGABYTE
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_files.is_empty()
    }

    /// Multi-line summary for terminal output.
    pub fn summary(&self) -> String {
        let action = if self.dry_run {
            "Would have"
        } else {
            "Successfully"
        };
        let failed = if self.failed_files.is_empty() {
            "No".to_string()
        } else {
            self.failed_files.len().to_string()
        };

        format!(
            "{action} removed {} files totaling {:.2}MB.\n\
             {action} left {}.\n\
             Completed in {:.3}s.\n\
             {failed} files failed to be removed.",
            self.total_deleted_files,
            self.deleted_megabytes(),
            self.retained_files,
            self.elapsed_secs,
        )
    }
}
