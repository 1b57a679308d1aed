// ABOUTME: Local directory enumeration and remote path mapping for uploads.
// ABOUTME: Walks depth-first in file name order so repeated runs upload the same list.

use super::error::DeployError;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Content type used when the file extension is not recognised.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A local file paired with the remote path it is uploaded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub remote_path: String,
}

/// Every regular file under `root`, depth-first, siblings sorted by name.
///
/// Symlinks are followed. Directories contribute only their contents.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, DeployError> {
    if !root.is_dir() {
        return Err(DeployError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| DeployError::LocalFiles {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Remote path for `file`: `<version>/<path relative to root>`, `/`-separated.
///
/// Fails when a component of the relative path is not valid UTF-8.
pub fn remote_path(version: &str, root: &Path, file: &Path) -> Result<String, DeployError> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part
                .to_str()
                .ok_or_else(|| DeployError::NonUtf8Path(file.to_path_buf()))?;
            parts.push(part);
        }
    }

    Ok(format!("{}/{}", version.trim_matches('/'), parts.join("/")))
}

/// Pair every file under `root` with its remote path under `version`.
pub fn plan_uploads(version: &str, root: &Path) -> Result<Vec<LocalFile>, DeployError> {
    collect_files(root)?
        .into_iter()
        .map(|path| {
            Ok(LocalFile {
                remote_path: remote_path(version, root, &path)?,
                path,
            })
        })
        .collect()
}

/// MIME type inferred from the file name.
pub fn content_type(name: &str) -> &'static str {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
