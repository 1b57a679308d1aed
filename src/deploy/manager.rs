// ABOUTME: Deployment manager composing listing, retention, retry, and batching.
// ABOUTME: Provides the deploy and cleanup operations over a connected store.

use super::error::{DeployError, UploadError, UploadFailure};
use super::files::{self, LocalFile};
use super::report::{CleanupReport, DeployReport};
use super::state::{Connected, Uninitialized};
use crate::batch::{self, DEFAULT_CONCURRENCY};
use crate::listing::{DEFAULT_MAX_PAGES, PaginatedLister};
use crate::retention::RetentionPolicy;
use crate::retry::{self, RetryPolicy};
use crate::store::{BlobStore, StorageEntry, StoreError, StoreErrorKind};
use crate::version::VersionSpec;
use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Container used when none is configured (the static website container).
pub const DEFAULT_CONTAINER: &str = "$web";

/// Settings for a single deploy or cleanup run.
#[derive(Debug, Clone)]
pub struct DeploymentSettings {
    /// Version being deployed or protected, e.g. `master.1234` or `2.0.1`.
    pub current_version: String,
    /// Container name, used in log output.
    pub container: String,
    /// Maximum remote operations in flight.
    pub concurrency: usize,
    pub retry: RetryPolicy,
    /// Cap on listing pages during cleanup.
    pub max_pages: usize,
    /// Skip uploads and deletes while reporting them as successful.
    pub dry_run: bool,
}

impl DeploymentSettings {
    pub fn new(current_version: impl Into<String>) -> Self {
        Self {
            current_version: current_version.into(),
            container: DEFAULT_CONTAINER.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            max_pages: DEFAULT_MAX_PAGES,
            dry_run: false,
        }
    }
}

/// Manages deployments of one version to a version-partitioned container.
///
/// A manager starts [`Uninitialized`]; `deploy` and `cleanup` only become
/// available after [`connect`](DeploymentManager::connect) supplies a store.
#[derive(Debug)]
pub struct DeploymentManager<S> {
    settings: DeploymentSettings,
    state: S,
}

impl DeploymentManager<Uninitialized> {
    pub fn new(settings: DeploymentSettings) -> Self {
        DeploymentManager {
            settings,
            state: Uninitialized,
        }
    }

    /// Attach the store that uploads, deletes, and listings go to.
    pub fn connect(self, store: Arc<dyn BlobStore>) -> DeploymentManager<Connected> {
        DeploymentManager {
            settings: self.settings,
            state: Connected { store },
        }
    }
}

impl<S> DeploymentManager<S> {
    pub fn settings(&self) -> &DeploymentSettings {
        &self.settings
    }
}

impl DeploymentManager<Connected> {
    /// Upload every file under `local_root` to `<current_version>/<relative path>`.
    ///
    /// Every file is attempted even when some fail. If any upload still
    /// fails after retries, the run fails with [`DeployError::UploadsFailed`]
    /// listing each failed file.
    pub async fn deploy(&self, local_root: &Path) -> Result<DeployReport, DeployError> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let version = &self.settings.current_version;
        VersionSpec::parse(version)?;

        tracing::info!("starting deploy for {version} at {}", local_root.display());
        let uploads = files::plan_uploads(version, local_root)?;
        tracing::info!("{} files found for upload", uploads.len());

        let results = batch::run_bounded(
            uploads.iter().collect::<Vec<_>>(),
            self.settings.concurrency,
            |upload| self.upload(upload),
        )
        .await;

        let mut uploaded_bytes = 0;
        let mut failures = Vec::new();
        for (index, (upload, result)) in uploads.iter().zip(results).enumerate() {
            match result {
                Ok(size) => uploaded_bytes += size,
                Err(e) => {
                    match &e {
                        UploadError::Store(store_err) => {
                            log_store_failure("upload", &upload.remote_path, store_err)
                        }
                        UploadError::Read { .. } => {
                            tracing::error!("upload {index} ({}) failed with {e}", upload.remote_path)
                        }
                    }
                    failures.push(UploadFailure {
                        index,
                        path: upload.remote_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(DeployError::UploadsFailed {
                total: uploads.len(),
                failures,
            });
        }

        Ok(DeployReport {
            version: version.clone(),
            started_at,
            uploaded_files: uploads.len(),
            uploaded_bytes,
            dry_run: self.settings.dry_run,
            elapsed_secs: timer.elapsed().as_secs_f64(),
        })
    }

    /// Delete every object that belongs to a version superseded by the
    /// current one.
    ///
    /// Failed deletions are recorded in the report and never abort the
    /// batch. Version parsing and listing failures abort before anything is
    /// deleted.
    pub async fn cleanup(&self) -> Result<CleanupReport, DeployError> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let version = VersionSpec::parse(&self.settings.current_version)?;

        tracing::info!("starting cleanup for {version}");
        let inventory = self.list_inventory().await?;
        let listed = inventory.len();
        tracing::info!("Found {listed} files");

        let selection = RetentionPolicy::new(version).partition(inventory);
        tracing::info!("{} files found for cleanup", selection.to_delete.len());

        let mut report = CleanupReport::new(
            &self.settings.current_version,
            started_at,
            listed,
            selection.retained.len(),
            self.settings.dry_run,
        );

        let results = batch::run_bounded(
            selection.to_delete.iter().collect::<Vec<_>>(),
            self.settings.concurrency,
            |entry| self.delete(entry),
        )
        .await;

        for (entry, result) in selection.to_delete.into_iter().zip(results) {
            match result {
                Ok(()) => report.record_deleted(&entry),
                Err(e) => {
                    log_store_failure("delete", &entry.name, &e);
                    report.record_failed(entry);
                }
            }
        }

        report.elapsed_secs = timer.elapsed().as_secs_f64();
        Ok(report)
    }

    /// Every object in the container, in listing order.
    pub async fn list_inventory(&self) -> Result<Vec<StorageEntry>, DeployError> {
        let store = &self.state.store;
        let policy = &self.settings.retry;

        let entries = PaginatedLister::new(self.settings.max_pages)
            .list_all("", |token| async move {
                retry::invoke(policy, "list", || store.list_page("", token.as_ref())).await
            })
            .await?;

        Ok(entries)
    }

    async fn upload(&self, upload: &LocalFile) -> Result<u64, UploadError> {
        let contents = tokio::fs::read(&upload.path)
            .await
            .map_err(|source| UploadError::Read {
                path: upload.path.clone(),
                source,
            })?;
        let size = contents.len() as u64;
        let content_type = files::content_type(&upload.remote_path);

        tracing::info!(
            "uploading {} to {}",
            upload.remote_path,
            self.settings.container
        );
        if self.settings.dry_run {
            return Ok(size);
        }

        let contents = Bytes::from(contents);
        retry::invoke(&self.settings.retry, "put", || {
            self.state
                .store
                .put(&upload.remote_path, contents.clone(), content_type)
        })
        .await?;

        Ok(size)
    }

    async fn delete(&self, entry: &StorageEntry) -> Result<(), StoreError> {
        tracing::info!("deleting {} from {}", entry.name, self.settings.container);
        if self.settings.dry_run {
            return Ok(());
        }

        retry::invoke(&self.settings.retry, "delete", || {
            self.state.store.delete(&entry.name)
        })
        .await
    }
}

/// Transient failures may clear on a later run; anything else needs attention.
fn log_store_failure(action: &str, name: &str, err: &StoreError) {
    match err.kind() {
        StoreErrorKind::Transient => tracing::warn!("failed to {action} {name}: {err}"),
        kind @ (StoreErrorKind::Rejected | StoreErrorKind::Configuration) => {
            tracing::error!(?kind, "failed to {action} {name}: {err}")
        }
    }
}
