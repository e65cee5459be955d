use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by storage backends and stored atoms
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create storage directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage keys must not be empty")]
    EmptyKey,

    #[error("storage I/O failed for key '{key}'")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize value for key '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
