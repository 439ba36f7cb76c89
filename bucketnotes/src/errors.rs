use std::path::PathBuf;
use thiserror::Error;

use crate::NoteID;

#[derive(Error, Debug)]
pub enum NoteStoreError {
    #[error("note `{0}` doesn't exist")]
    NoteNotExist(NoteID),
    #[error("note id `{0}` is not a valid UUID")]
    NotUuid(String),
    #[error("io error")]
    IOError(#[from] std::io::Error),
    #[error("serde error")]
    SerdeError(#[from] serde_json::Error),
    #[error("PostgreSQL error")]
    PostgreSQLError(#[from] sqlx::Error),
}

/// Error type for attachment uploads.
#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("io error")]
    IOError(#[from] std::io::Error),
    /// The stored blob cannot be expressed as a `file://` URL.
    ///
    /// For example, the configured attachment root is a relative path that
    /// no longer resolves.
    #[error("attachment root `{0}` cannot be turned into a URL")]
    RootNotUrl(PathBuf),
}

#[derive(Error, Debug)]
pub enum SessionError {
    /// A note-targeting operation was called while no note is selected.
    #[error("no note is selected")]
    NoSelection,
    #[error(transparent)]
    Store(#[from] NoteStoreError),
}
