//! Error types for the master-detail core.

use std::path::PathBuf;

use crate::model::EntityPath;

/// Result type alias for master-detail operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the master-detail core.
///
/// Absence conditions (empty list, unknown path, selection disabled) are
/// never errors; they are logged and resolved as no-ops.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A list has already been bound to this selector.
    #[error("A list has already been bound to this selector")]
    AlreadyBound,

    /// The entity service rejected a request.
    #[error("Entity service error: {0}")]
    Service(#[from] ServiceError),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Configuration file could not be read.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors reported by an [`EntityService`](crate::service::EntityService).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No entity exists at the given path.
    #[error("No entity at {0}")]
    NotFound(EntityPath),

    /// The service could not answer.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// An entity with the same key already exists.
    #[error("Entity already exists at {0}")]
    Conflict(EntityPath),

    /// The entity sent to the service is incomplete.
    #[error("Invalid entity: {0}")]
    Invalid(String),
}
