//! Snapshot error types.

use docsnap_diff::ExtractionError;
use docsnap_storage::StorageError;
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Source file, snapshot content or snapshot record missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No extractor is registered for the extension.
    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    /// An extractor failed while reading or rendering a document.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The version index or undo stack could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot content no longer matches its recorded hash.
    #[error("Snapshot storage corrupted: {0}")]
    Corrupted(String),

    /// Operation failed.
    #[error("Snapshot operation failed: {0}")]
    OperationFailed(String),
}

impl SnapshotError {
    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed(message.into())
    }

    /// Map an IO error on `path`, turning a missing file into `NotFound`.
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = SnapshotError::from_io(
            Path::new("/docs/gone.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, SnapshotError::NotFound(ref p) if p == "/docs/gone.txt"));

        let err = SnapshotError::from_io(
            Path::new("/docs/locked.txt"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, SnapshotError::Io(_)));
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = SnapshotError::UnsupportedFormat(".xyz".to_string());
        assert_eq!(err.to_string(), "Unsupported snapshot format: .xyz");
    }
}
