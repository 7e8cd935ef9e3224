//! Diff error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for extractor operations.
pub type ExtractResult<T> = Result<T, ExtractionError>;

/// Errors raised by an extractor while reading or rendering a document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content is not valid for the format.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A document could not be rendered back to bytes.
    #[error("failed to render document: {0}")]
    Render(String),
}

impl ExtractionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised inside a diff strategy or the extractor registry.
///
/// The engine never lets these escape: they are turned into a
/// `DiffResult` whose `raw` text explains the failure.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A strategy was run on a path whose extractor lacks the capability it needs.
    #[error("no paragraph-capable extractor for {}", .0.display())]
    MissingCapability(PathBuf),

    /// Extension registration with an empty extension.
    #[error("extension may not be empty")]
    EmptyExtension,
}
