// ABOUTME: Decides which stored objects belong to superseded versions.
// ABOUTME: Folders that do not match the current version's shape are always kept.

use crate::store::StorageEntry;
use crate::version::VersionSpec;

/// Outcome of applying a retention policy to an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Entries of strictly older versions in the current lineage.
    pub to_delete: Vec<StorageEntry>,
    /// Everything else, in inventory order.
    pub retained: Vec<StorageEntry>,
}

/// Retention rules derived from the version currently being deployed.
///
/// An entry is deletable only when its version folder parses to the same
/// shape as the current version and is older within the same branch (for
/// branch builds) or the same major version (for semantic versions).
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    current: VersionSpec,
}

impl RetentionPolicy {
    pub fn new(current: VersionSpec) -> Self {
        Self { current }
    }

    /// Whether `entry` lives in a folder superseded by the current version.
    pub fn is_deletable(&self, entry: &StorageEntry) -> bool {
        match VersionSpec::parse(entry.version_folder()) {
            Ok(folder) => {
                folder.component_count() == self.current.component_count()
                    && self.current.supersedes(&folder)
            }
            Err(_) => false,
        }
    }

    /// The entries eligible for deletion, in inventory order.
    pub fn select(&self, entries: Vec<StorageEntry>) -> Vec<StorageEntry> {
        self.partition(entries).to_delete
    }

    /// Split the inventory into deletable and retained entries.
    pub fn partition(&self, entries: Vec<StorageEntry>) -> Selection {
        let mut selection = Selection::default();

        for entry in entries {
            if self.is_deletable(&entry) {
                selection.to_delete.push(entry);
            } else {
                tracing::debug!(name = %entry.name, "not deleting");
                selection.retained.push(entry);
            }
        }

        selection
    }
}
