//! Result and error types for the core library

use std::path::PathBuf;

use thiserror::Error;

/// Core library error type
///
/// Every variant is terminal for the request that triggered it; nothing in
/// the core retries.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    AccessDenied,

    #[error("Corrupt store {}: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a persistence error for a write against `path`
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// True for faults of the store itself rather than of the request
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::CorruptStore { .. } | Self::Persistence { .. } | Self::Io(_) | Self::Json(_)
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
