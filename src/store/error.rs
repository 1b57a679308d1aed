// ABOUTME: Object store error types with SNAFU pattern.
// ABOUTME: Separates remote request failures from configuration problems.

use snafu::Snafu;
use std::fmt;

/// The remote primitive that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Put,
    Delete,
    List,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Put => "put",
            Operation::Delete => "delete",
            Operation::List => "list",
        };
        write!(f, "{name}")
    }
}

/// Errors from the object store collaborator.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    #[snafu(display("{operation} failed for '{path}': {source}"))]
    Request {
        operation: Operation,
        path: String,
        source: object_store::Error,
    },

    #[snafu(display("{operation} failed for '{path}': {message}"))]
    Remote {
        operation: Operation,
        path: String,
        message: String,
    },

    #[snafu(display("invalid object path '{path}': {source}"))]
    InvalidPath {
        path: String,
        source: object_store::path::Error,
    },

    #[snafu(display("invalid connection string: {message}"))]
    InvalidConnectionString { message: String },

    #[snafu(display("failed to configure object store: {source}"))]
    Configure { source: object_store::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// A remote call failed; retrying may succeed.
    Transient,
    /// The remote call was rejected for a reason retrying will not fix.
    Rejected,
    /// The store could not be set up.
    Configuration,
}

impl StoreError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Request { source, .. } => match source {
                object_store::Error::PermissionDenied { .. }
                | object_store::Error::Unauthenticated { .. }
                | object_store::Error::Precondition { .. } => StoreErrorKind::Rejected,
                _ => StoreErrorKind::Transient,
            },
            StoreError::Remote { .. } => StoreErrorKind::Transient,
            StoreError::InvalidPath { .. } => StoreErrorKind::Rejected,
            StoreError::InvalidConnectionString { .. } | StoreError::Configure { .. } => {
                StoreErrorKind::Configuration
            }
        }
    }

}
