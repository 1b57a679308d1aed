// ABOUTME: Test support utilities.
// ABOUTME: Provides a fault-injecting store and local directory fixtures.

use assetship::store::{
    BlobStore, ContinuationToken, DEFAULT_PAGE_SIZE, ListPage, ObjectStoreBackend, Operation,
    StorageEntry, StoreError,
};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("assetship=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Failures still to inject, keyed by path.
#[derive(Default)]
struct Faults {
    put: HashMap<String, u32>,
    delete: HashMap<String, u32>,
    list: u32,
}

/// In-memory store that records every call and fails on demand.
pub struct TestStore {
    inner: ObjectStoreBackend,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<(Operation, String)>>,
}

#[allow(dead_code)]
impl TestStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: ObjectStoreBackend::new(InMemory::new()).with_page_size(page_size),
            faults: Mutex::new(Faults::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Store an object without recording a call.
    pub async fn seed(&self, name: &str, size: usize) {
        self.inner
            .put(name, Bytes::from(vec![b'x'; size]), "text/plain")
            .await
            .unwrap();
    }

    /// Fail the next `times` uploads of `path`.
    pub fn fail_put(&self, path: &str, times: u32) {
        self.faults.lock().put.insert(path.to_string(), times);
    }

    /// Fail the next `times` deletions of `path`.
    pub fn fail_delete(&self, path: &str, times: u32) {
        self.faults.lock().delete.insert(path.to_string(), times);
    }

    /// Fail the next `times` listing calls.
    pub fn fail_list(&self, times: u32) {
        self.faults.lock().list = times;
    }

    /// Paths passed to `operation`, in call order. Listing calls record
    /// the continuation token, or an empty string for the first page.
    pub fn calls_for(&self, operation: Operation) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, path)| path.clone())
            .collect()
    }

    /// Every stored object, in key order.
    pub async fn entries(&self) -> Vec<StorageEntry> {
        self.inner
            .clone()
            .with_page_size(usize::MAX)
            .list_page("", None)
            .await
            .unwrap()
            .entries
    }

    pub async fn names(&self) -> Vec<String> {
        self.entries().await.into_iter().map(|e| e.name).collect()
    }

    fn record(&self, operation: Operation, path: &str) {
        self.calls.lock().push((operation, path.to_string()));
    }

    fn take_fault(remaining: Option<&mut u32>) -> bool {
        match remaining {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn injected(operation: Operation, path: &str) -> StoreError {
        StoreError::Remote {
            operation,
            path: path.to_string(),
            message: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for TestStore {
    async fn put(&self, path: &str, contents: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.record(Operation::Put, path);
        let fail = Self::take_fault(self.faults.lock().put.get_mut(path));
        if fail {
            return Err(Self::injected(Operation::Put, path));
        }
        self.inner.put(path, contents, content_type).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.record(Operation::Delete, path);
        let fail = Self::take_fault(self.faults.lock().delete.get_mut(path));
        if fail {
            return Err(Self::injected(Operation::Delete, path));
        }
        self.inner.delete(path).await
    }

    async fn list_page(
        &self,
        prefix: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<ListPage, StoreError> {
        self.record(
            Operation::List,
            token.map(ContinuationToken::as_str).unwrap_or_default(),
        );
        let fail = Self::take_fault(Some(&mut self.faults.lock().list));
        if fail {
            return Err(Self::injected(Operation::List, prefix));
        }
        self.inner.list_page(prefix, token).await
    }
}

/// Files of the sample site, relative to its root, in upload order.
#[allow(dead_code)]
pub const SAMPLE_SITE: &[&str] = &[
    "nested/file",
    "nested/file_2",
    "nested/nestednested/file",
    "nested/nestednested/file_2",
    "root_file",
];

/// Write every file in `files` under `root` with a small body.
#[allow(dead_code)]
pub fn write_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("contents of {file}")).unwrap();
    }
}
