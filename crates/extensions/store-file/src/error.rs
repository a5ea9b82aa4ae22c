//! File store errors.

use std::path::PathBuf;
use thiserror::Error;

use zegoop_protocols::StoreError;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not a JSON object.
    #[error("Corrupt settings file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Storage path not set")]
    StoragePathNotSet,

    #[error("Failed to create storage directory at {path}: {reason}")]
    CreateDirFailed { path: PathBuf, reason: String },
}

impl From<FileStoreError> for StoreError {
    fn from(err: FileStoreError) -> Self {
        match err {
            FileStoreError::Io(e) => StoreError::Io(e),
            FileStoreError::Corrupt { .. } => StoreError::Serialization(err.to_string()),
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}
