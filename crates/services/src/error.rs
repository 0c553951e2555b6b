//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Errors emitted by the annotation session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no images available for session")]
    Empty,
    #[error("unknown image identity: {identity:?}")]
    UnknownIdentity { identity: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
