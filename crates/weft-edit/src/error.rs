//! Error types for workspace edit application.
//!
//! Every variant is fatal to the transaction that raised it. The coordinator
//! never lets these escape `apply`; they are rendered into a single failure
//! report instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::edit::DocumentId;
use crate::resource::ResourceOperationKind;

/// A filesystem action failed or its options forbade it.
#[derive(Debug, Error)]
#[error("{kind} failed: {detail}")]
pub struct ResourceOperationError {
    kind: ResourceOperationKind,
    detail: String,
}

impl ResourceOperationError {
    /// Builds an error for the given operation kind.
    #[must_use]
    pub fn new(kind: ResourceOperationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Wraps a filesystem error, naming the path involved.
    pub(crate) fn io(kind: ResourceOperationKind, path: &std::path::Path, error: &io::Error) -> Self {
        Self::new(kind, format!("{}: {error}", path.display()))
    }

    /// Kind of operation that failed.
    #[must_use]
    pub const fn kind(&self) -> ResourceOperationKind {
        self.kind
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// The document store could not provide a live document.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The identifier is not something this store can open.
    #[error("cannot open '{document}': unsupported document identifier")]
    UnsupportedId {
        /// Identifier that was requested.
        document: DocumentId,
    },

    /// No document is registered under the identifier.
    #[error("no open document for '{document}'")]
    NotFound {
        /// Identifier that was requested.
        document: DocumentId,
    },

    /// Reading the document's backing file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Backing file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised while applying one operation of a workspace edit.
#[derive(Debug, Error)]
pub enum WorkspaceEditError {
    /// Two edits in one document overlap in original coordinates.
    #[error("found overlapping edit ranges in {document}")]
    EditConflict {
        /// Path or identifier of the document.
        document: String,
    },

    /// An edit starts outside the current buffer content.
    #[error("out of range edit on {document}:{row}:{column}")]
    EditRange {
        /// Path or identifier of the document.
        document: String,
        /// Row of the edit start (one-based).
        row: u64,
        /// Column of the edit start (one-based).
        column: u64,
    },

    /// A resource operation failed.
    #[error(transparent)]
    ResourceOperation(#[from] ResourceOperationError),

    /// The document could not be resolved.
    #[error("failed to resolve {document}: {source}")]
    Resolution {
        /// Identifier that was requested.
        document: DocumentId,
        /// Underlying store error.
        #[source]
        source: ResolutionError,
    },
}

impl WorkspaceEditError {
    /// Builds an overlap error for a document.
    pub(crate) fn conflict(document: impl Into<String>) -> Self {
        Self::EditConflict {
            document: document.into(),
        }
    }

    /// Builds an out-of-range error from zero-based coordinates.
    pub(crate) fn out_of_range(document: impl Into<String>, line: u32, column: u32) -> Self {
        Self::EditRange {
            document: document.into(),
            row: u64::from(line) + 1,
            column: u64::from(column) + 1,
        }
    }

    /// Short label for the failure class, used in reports.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::EditConflict { .. } => String::from("edit conflict"),
            Self::EditRange { .. } => String::from("edit out of range"),
            Self::ResourceOperation(error) => format!("{} operation failed", error.kind()),
            Self::Resolution { .. } => String::from("document unavailable"),
        }
    }
}
