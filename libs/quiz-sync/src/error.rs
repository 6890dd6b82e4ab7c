//! Error types for quiz-sync.

use serde::Serialize;
use thiserror::Error;

/// Storage collaborator errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the error only says the file was already absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            Self::InvalidName(_) => false,
        }
    }
}

/// Sync queue errors.
///
/// Payloads are strings so the error can be cloned onto every subscriber of
/// the event channel.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncError {
    #[error("Failed to write {file}: {message}")]
    StorageWriteFailed { file: String, message: String },

    #[error("Failed to delete {file}: {message}")]
    StorageDeleteFailed { file: String, message: String },

    #[error("Question has no id - save it before queueing")]
    MissingId,

    #[error("Question title is empty")]
    EmptyTitle,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Per-file errors while loading documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Parse error: {0}")]
    Parse(#[from] quiz_core::ParseError),
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_detection() {
        assert!(StorageError::NotFound("a.md".to_string()).is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(StorageError::Io(io).is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(!StorageError::Io(io).is_not_found());
        assert!(!StorageError::InvalidName("../x".to_string()).is_not_found());
    }

    #[test]
    fn display_write_failed() {
        let err = SyncError::StorageWriteFailed {
            file: "closures.md".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to write closures.md: disk full");
    }
}
