// ABOUTME: Connection state markers for the deployment manager.
// ABOUTME: Deploy and cleanup only exist once a store has been connected.

use crate::store::BlobStore;
use std::fmt;
use std::sync::Arc;

/// No store connected yet.
/// Available actions: `connect()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Uninitialized;

/// Store connected.
/// Available actions: `deploy()`, `cleanup()`
#[derive(Clone)]
pub struct Connected {
    pub(crate) store: Arc<dyn BlobStore>,
}

impl fmt::Debug for Connected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connected").finish_non_exhaustive()
    }
}
