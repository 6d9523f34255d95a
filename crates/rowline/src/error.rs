//! Error types for the list toolbar.
//!
//! Only collaborator failures and invalid caller input surface as errors.
//! Resolution misses (unknown column identifiers, filter values without a
//! matching option, unknown groups) are tolerated and logged instead.

use std::path::PathBuf;

/// Boxed error returned by external collaborators (page sources, dialogs).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for toolbar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the toolbar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote page source rejected a request.
    #[error("Page source failed: {0}")]
    Source(#[source] CollaboratorError),

    /// A dialog collaborator failed before producing a result.
    #[error("The {dialog} dialog failed: {source}")]
    Dialog {
        dialog: &'static str,
        #[source]
        source: CollaboratorError,
    },

    /// Reading or writing a preference file failed.
    #[error("Failed to access preference file '{path}': {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A preference file did not contain valid preference data.
    #[error("Invalid preference data in '{path}': {source}")]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Toolbar configuration could not be parsed.
    #[error("Invalid toolbar configuration: {0}")]
    Config(#[source] serde_json::Error),

    /// A page size of zero was requested.
    #[error("Page size must be greater than zero")]
    InvalidPageSize,
}

impl Error {
    /// Create a page source error.
    pub fn page_source(err: impl Into<CollaboratorError>) -> Self {
        Self::Source(err.into())
    }

    /// Create a dialog error.
    pub fn dialog(dialog: &'static str, err: impl Into<CollaboratorError>) -> Self {
        Self::Dialog {
            dialog,
            source: err.into(),
        }
    }

    /// Create a preference file I/O error.
    pub fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreIo {
            path: path.into(),
            source,
        }
    }

    /// Create a preference file format error.
    pub fn store_format(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::StoreFormat {
            path: path.into(),
            source,
        }
    }
}
