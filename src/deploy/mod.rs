// ABOUTME: Deploy and cleanup orchestration for versioned asset folders.
// ABOUTME: Exports the connection-state markers, manager, reports, and errors.

mod error;
pub mod files;
mod manager;
mod report;
mod state;

pub use error::{DeployError, DeployErrorKind, UploadFailure};
pub use manager::{DEFAULT_CONTAINER, DeploymentManager, DeploymentSettings};
pub use report::{CleanupReport, DeployReport};
pub use state::{Connected, Uninitialized};
