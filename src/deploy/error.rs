// ABOUTME: Error types for deploy and cleanup runs.
// ABOUTME: Covers version parsing, local file discovery, listing, and upload failures.

use crate::listing::ListingError;
use crate::store::StoreError;
use crate::version::VersionError;
use serde::Serialize;
use std::path::PathBuf;

/// A single upload that still failed after all retry attempts.
#[derive(Debug, Clone, Serialize)]
pub struct UploadFailure {
    /// Position of the file in the upload order.
    pub index: usize,
    /// Remote path the file was destined for.
    pub path: String,
    pub error: String,
}

/// Errors that abort a deploy or cleanup run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read local files under {path}: {source}")]
    LocalFiles {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("file name is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error("failed to list existing files (page {page}): {source}")]
    ListingFailed {
        page: usize,
        #[source]
        source: StoreError,
    },

    #[error("listing exceeded {limit} pages; raise the page limit to list more")]
    TooManyPages { limit: usize },

    #[error("{} of {total} uploads failed", failures.len())]
    UploadsFailed {
        total: usize,
        failures: Vec<UploadFailure>,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    InvalidVersion,
    LocalFiles,
    ListingFailed,
    TooManyPages,
    UploadsFailed,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::InvalidVersion(_) => DeployErrorKind::InvalidVersion,
            DeployError::NotADirectory(_)
            | DeployError::NonUtf8Path(_)
            | DeployError::LocalFiles { .. } => DeployErrorKind::LocalFiles,
            DeployError::ListingFailed { .. } => DeployErrorKind::ListingFailed,
            DeployError::TooManyPages { .. } => DeployErrorKind::TooManyPages,
            DeployError::UploadsFailed { .. } => DeployErrorKind::UploadsFailed,
        }
    }

    /// Returns the failed uploads if this is an upload failure.
    pub fn upload_failures(&self) -> Option<&[UploadFailure]> {
        match self {
            DeployError::UploadsFailed { failures, .. } => Some(failures),
            _ => None,
        }
    }
}

impl From<ListingError<StoreError>> for DeployError {
    fn from(err: ListingError<StoreError>) -> Self {
        match err {
            ListingError::Page { page, source, .. } => DeployError::ListingFailed { page, source },
            ListingError::TooManyPages { limit } => DeployError::TooManyPages { limit },
        }
    }
}

/// Per-file upload errors, captured rather than propagated.
#[derive(Debug, thiserror::Error)]
pub(crate) enum UploadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
