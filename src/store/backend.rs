// ABOUTME: BlobStore implementation over any object_store::ObjectStore.
// ABOUTME: Emulates token-based paging with list_with_offset.

use super::error::{InvalidPathSnafu, RequestSnafu};
use super::{BlobStore, ContinuationToken, ListPage, Operation, StorageEntry, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path;
use object_store::{Attribute, ObjectStore, PutOptions, PutPayload};
use snafu::ResultExt;
use std::sync::Arc;
use std::time::Duration;

/// Largest page Azure returns for a single listing call.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// Connection-level settings shared by every backend.
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Entries per listing page.
    pub page_size: usize,
    /// HTTP timeout applied to each remote call.
    pub request_timeout: Option<Duration>,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: None,
        }
    }
}

/// Cloneable handle to any [`ObjectStore`] backend.
///
/// A listing page holds at most `page_size` entries. When a page is full,
/// its last key becomes the continuation token and the next page resumes
/// strictly after it.
#[derive(Clone, Debug)]
pub struct ObjectStoreBackend {
    inner: Arc<dyn ObjectStore>,
    page_size: usize,
}

impl ObjectStoreBackend {
    pub fn new(store: impl ObjectStore) -> Self {
        Self::from_arc(Arc::new(store))
    }

    pub fn from_arc(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner: store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBackend {
    #[tracing::instrument(name = "store.put", skip(self, contents), fields(size = contents.len()))]
    async fn put(
        &self,
        path: &str,
        contents: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let location = Path::parse(path).context(InvalidPathSnafu { path })?;
        let mut opts = PutOptions::default();
        opts.attributes
            .insert(Attribute::ContentType, content_type.to_string().into());

        self.inner
            .put_opts(&location, PutPayload::from(contents), opts)
            .await
            .context(RequestSnafu {
                operation: Operation::Put,
                path,
            })?;
        Ok(())
    }

    #[tracing::instrument(name = "store.delete", skip(self))]
    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let location = Path::parse(path).context(InvalidPathSnafu { path })?;

        match self.inner.delete(&location).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(source) => Err(StoreError::Request {
                operation: Operation::Delete,
                path: path.to_string(),
                source,
            }),
        }
    }

    #[tracing::instrument(name = "store.list_page", skip(self, token))]
    async fn list_page(
        &self,
        prefix: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<ListPage, StoreError> {
        let prefix_path = if prefix.is_empty() {
            None
        } else {
            Some(Path::parse(prefix).context(InvalidPathSnafu { path: prefix })?)
        };

        let mut stream = match token {
            Some(token) => {
                let offset =
                    Path::parse(token.as_str()).context(InvalidPathSnafu { path: token.as_str() })?;
                self.inner.list_with_offset(prefix_path.as_ref(), &offset)
            }
            None => self.inner.list(prefix_path.as_ref()),
        };

        let mut entries = Vec::new();
        while entries.len() < self.page_size {
            let next = stream.try_next().await.context(RequestSnafu {
                operation: Operation::List,
                path: prefix,
            })?;
            match next {
                Some(meta) => entries.push(StorageEntry {
                    name: meta.location.to_string(),
                    content_length: meta.size as u64,
                }),
                None => break,
            }
        }

        let next_token = if entries.len() == self.page_size {
            entries
                .last()
                .map(|entry| ContinuationToken::new(entry.name.clone()))
        } else {
            None
        };

        Ok(ListPage {
            entries,
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    async fn seeded(names: &[&str], page_size: usize) -> ObjectStoreBackend {
        let backend = ObjectStoreBackend::new(InMemory::new()).with_page_size(page_size);
        for name in names {
            backend
                .put(name, Bytes::from_static(b"abc"), "text/plain")
                .await
                .unwrap();
        }
        backend
    }

    #[tokio::test]
    async fn full_page_returns_token_of_last_entry() {
        let backend = seeded(&["a/1", "a/2", "a/3"], 2).await;

        let page = backend.list_page("", None).await.unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.next_token, Some(ContinuationToken::new("a/2")));

        let page = backend
            .list_page("", page.next_token.as_ref())
            .await
            .unwrap();
        assert_eq!(page.entries, vec![StorageEntry::new("a/3", 3)]);
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn prefix_restricts_listing() {
        let backend = seeded(&["1.0.0/a", "2.0.0/a", "2.0.0/b"], 10).await;

        let page = backend.list_page("2.0.0", None).await.unwrap();
        let names: Vec<_> = page.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["2.0.0/a", "2.0.0/b"]);
    }

    #[tokio::test]
    async fn deleting_missing_object_succeeds() {
        let backend = seeded(&[], 10).await;
        backend.delete("1.0.0/missing").await.unwrap();
    }

    #[tokio::test]
    async fn names_are_stored_without_encoding() {
        let store = Arc::new(InMemory::new());
        let backend = ObjectStoreBackend::from_arc(store.clone());
        let name = "3.2.1/_next/[slug]-abc.js";
        backend
            .put(name, Bytes::from_static(b"js"), "text/javascript")
            .await
            .unwrap();

        let locations: Vec<String> = store
            .list(None)
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(locations, vec![name.to_string()]);

        let page = backend.list_page("", None).await.unwrap();
        assert_eq!(page.entries, vec![StorageEntry::new(name, 2)]);

        backend.delete(name).await.unwrap();
        assert!(backend.list_page("", None).await.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn relative_segments_are_rejected() {
        let backend = seeded(&[], 10).await;
        let err = backend
            .put("1.0.0/../escape", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath { .. }));
    }

    #[tokio::test]
    async fn put_records_content_type() {
        let store = Arc::new(InMemory::new());
        let backend = ObjectStoreBackend::from_arc(store.clone());
        backend
            .put("1.0.0/index.html", Bytes::from_static(b"<html>"), "text/html")
            .await
            .unwrap();

        let result = store.get(&Path::from("1.0.0/index.html")).await.unwrap();
        assert_eq!(
            result
                .attributes
                .get(&Attribute::ContentType)
                .map(|v| v.to_string()),
            Some("text/html".to_string())
        );
    }
}
