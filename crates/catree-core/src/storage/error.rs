use std::path::PathBuf;
use thiserror::Error;

use crate::category::CategoryId;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Category not found in store: {0}")]
    NotFound(CategoryId),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Category id {0} is reserved for roots and cannot be stored")]
    InvalidId(CategoryId),

    #[error("No category ids left to assign")]
    IdsExhausted,

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
