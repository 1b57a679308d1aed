// ABOUTME: Object store collaborator used by deploy and cleanup.
// ABOUTME: Defines the BlobStore trait, listing pages, and store errors.

mod azure;
mod backend;
mod error;

pub use azure::{ConnectionString, connect_azure};
pub use backend::{BackendOptions, DEFAULT_PAGE_SIZE, ObjectStoreBackend};
pub use error::{Operation, StoreError, StoreErrorKind};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::fmt;

/// Snapshot of a remote object taken at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageEntry {
    /// `/`-delimited remote path; the first segment is the version folder.
    pub name: String,
    /// Size in bytes.
    pub content_length: u64,
}

impl StorageEntry {
    pub fn new(name: impl Into<String>, content_length: u64) -> Self {
        Self {
            name: name.into(),
            content_length,
        }
    }

    /// The first path segment of the entry's name.
    pub fn version_folder(&self) -> &str {
        self.name.split('/').next().unwrap_or_default()
    }
}

/// Opaque cursor handed back by a paged listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<StorageEntry>,
    /// Present when more results remain.
    pub next_token: Option<ContinuationToken>,
}

/// Remote primitives needed to deploy and clean up versioned assets.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `contents` to `path`, overwriting any existing object.
    async fn put(&self, path: &str, contents: Bytes, content_type: &str)
    -> Result<(), StoreError>;

    /// Delete the object at `path`. Deleting a missing object succeeds.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;

    /// Fetch one page of entries under `prefix`, starting after `token`.
    async fn list_page(
        &self,
        prefix: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<ListPage, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_folder_is_first_segment() {
        let entry = StorageEntry::new("1.2.3/nested/file.js", 10);
        assert_eq!(entry.version_folder(), "1.2.3");
    }

    #[test]
    fn version_folder_of_root_object_is_its_name() {
        let entry = StorageEntry::new("index.html", 10);
        assert_eq!(entry.version_folder(), "index.html");
    }
}
