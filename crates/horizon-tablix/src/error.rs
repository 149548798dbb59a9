//! Error types for the grid engine.
//!
//! The engine degrades instead of failing: navigator inconsistencies are
//! clamped, binder failures leave a cell empty, and undersized resizes are
//! clamped to the minimum. The only fallible public surface is persistence.

use std::path::PathBuf;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, TablixError>;

/// Errors that can occur in the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum TablixError {
    /// Reading or writing a persisted size file failed.
    #[error("Failed to access size store '{path}': {source}")]
    PersistenceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted size document could not be parsed or produced.
    #[error("Invalid size store document: {0}")]
    PersistenceFormat(#[from] serde_json::Error),
}

impl TablixError {
    /// Create a persistence I/O error.
    pub fn persistence_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PersistenceIo {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by a [`CellBinder`](crate::model::CellBinder).
///
/// Bind failures are logged and the affected cell is rendered empty. They
/// never abort a rendering session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cell binding failed: {message}")]
pub struct BindError {
    message: String,
}

impl BindError {
    /// Create a bind error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
