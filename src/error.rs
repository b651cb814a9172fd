//! Error type shared by the store and the catalog service.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Every failure the catalog can report. All variants except the two storage
/// failures are expected outcomes the shell turns into a status message.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field was blank or input could not be interpreted.
    #[error("{0}")]
    Validation(String),

    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    /// Song creation referenced an artist that does not exist.
    #[error("Artist '{0}' not found. Song not created")]
    ArtistNotFound(String),

    #[error("{kind} {key} already exists")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("catalog storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    /// The directory holding the catalog file could not be created.
    #[error("catalog storage unavailable: cannot create `{}`: {source}", .path.display())]
    StorageDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    pub(crate) fn not_found(kind: &'static str, key: impl ToString) -> Self {
        CatalogError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn duplicate(kind: &'static str, key: impl ToString) -> Self {
        CatalogError::DuplicateKey {
            kind,
            key: key.to_string(),
        }
    }

    /// False only for storage failures, which the caller must treat as fatal
    /// or retry on its own.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            CatalogError::StorageUnavailable(_) | CatalogError::StorageDirectory { .. }
        )
    }
}
