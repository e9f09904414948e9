//! Atomic application of workspace edits to live documents.
//!
//! A workspace edit bundles text edits for several documents with filesystem
//! resource operations. The [`TransactionCoordinator`] applies one edit as a
//! unit: operations run concurrently on a worker pool, each edited document
//! contributes a [`Checkpoint`], and a single failure reverts every document
//! that was already changed.
//!
//! ## Components
//!
//! - [`WorkspaceEdit::normalize`] turns either producer shape into one
//!   ordered list of [`DocumentChange`]s.
//! - [`apply_edits`] applies a batch of edits to one [`Document`], from the
//!   end of the document towards its start, rejecting overlaps and edits that
//!   start outside the buffer.
//! - [`ResourceOperationHandler`] creates, renames, and deletes files through
//!   a [`FileSystem`].
//! - [`NotificationSink`] receives one [`FailureReport`] per failed
//!   transaction.
//!
//! Filesystem changes made by resource operations are not undone when a
//! transaction is rolled back.

mod applier;
mod document;
mod edit;
mod error;
mod lsp;
mod notify;
mod resource;
mod transaction;
mod workspace_edit;

pub use applier::apply_edits;
pub use document::{
    Checkpoint, Document, DocumentStore, FileDocumentStore, MemoryDocumentStore, SaveError,
    SharedDocument, TextBuffer,
};
pub use edit::{DocumentEditGroup, DocumentId, Position, TextEdit, TextRange};
pub use error::{ResolutionError, ResourceOperationError, WorkspaceEditError};
pub use notify::{FailureReport, NotificationSink, TracingNotificationSink};
pub use resource::{
    CreateOptions, DeleteOptions, EntryKind, FileSystem, LocalFileSystem, RenameOptions,
    ResourceOperation, ResourceOperationHandler, ResourceOperationKind,
};
pub use transaction::{
    CoordinatorError, CoordinatorOptions, TransactionCoordinator, TransactionOutcome,
};
pub use workspace_edit::{DocumentChange, WorkspaceEdit};

#[cfg(test)]
mod tests;
