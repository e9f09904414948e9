//! Host document abstraction and the stores that hand documents out.
//!
//! A [`Document`] is a live, mutable text buffer owned by its host (an
//! editor, or the in-memory [`TextBuffer`]). The transaction engine only
//! ever touches documents through this trait, which keeps host-specific undo
//! machinery behind a checkpoint interface.

mod buffer;
mod store;

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use buffer::TextBuffer;
pub use store::{FileDocumentStore, MemoryDocumentStore, SaveError};

use crate::edit::{DocumentId, Position, TextRange};
use crate::error::ResolutionError;

/// Opaque marker for a reversible point in a document's edit history.
///
/// Checkpoints are issued by the document that owns them and are only
/// meaningful to that document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checkpoint(u64);

impl Checkpoint {
    /// Wraps a host-assigned checkpoint number.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "checkpoint#{}", self.0)
    }
}

/// Behaviour required from a host document.
pub trait Document: Send {
    /// Captures the current state so it can be restored later.
    fn create_checkpoint(&mut self) -> Checkpoint;

    /// Replaces the text in `range` with `text`.
    ///
    /// Columns count UTF-16 code units. Positions outside the buffer are
    /// clipped to the nearest valid position, and a column inside a surrogate
    /// pair is clipped to the start of that character.
    fn set_text_in_range(&mut self, range: TextRange, text: &str);

    /// Length of `row` in UTF-16 code units, excluding its line terminator,
    /// or `None` when the row does not exist.
    fn line_length_for_row(&self, row: u32) -> Option<u32>;

    /// Returns true when `position` falls between the two code units of a
    /// surrogate pair.
    fn splits_character(&self, position: Position) -> bool;

    /// Merges every change made since `checkpoint` into a single undo unit.
    ///
    /// Returns false when the checkpoint is unknown to this document.
    fn group_changes_since_checkpoint(&mut self, checkpoint: Checkpoint) -> bool;

    /// Restores the state captured by `checkpoint`, consuming it.
    ///
    /// Returns false when the checkpoint is unknown to this document.
    fn revert_to_checkpoint(&mut self, checkpoint: Checkpoint) -> bool;

    /// Releases a checkpoint that will no longer be reverted.
    fn forget_checkpoint(&mut self, checkpoint: Checkpoint) {
        let _ = checkpoint;
    }

    /// Backing file path, when the document has one.
    fn path(&self) -> Option<&Path>;
}

/// A document shared between its store and running transactions.
pub type SharedDocument = Arc<Mutex<dyn Document>>;

/// Locks a shared document, recovering the guard if a previous holder
/// panicked.
pub(crate) fn lock_document(document: &SharedDocument) -> MutexGuard<'_, dyn Document + 'static> {
    document.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolves document identifiers to live documents.
pub trait DocumentStore: Send + Sync {
    /// Returns the live document for `id`, opening it if necessary.
    fn resolve(&self, id: &DocumentId) -> Result<SharedDocument, ResolutionError>;
}

impl<T> DocumentStore for Arc<T>
where
    T: DocumentStore + ?Sized,
{
    fn resolve(&self, id: &DocumentId) -> Result<SharedDocument, ResolutionError> {
        (**self).resolve(id)
    }
}

/// Label used for a document in diagnostics: its path when it has one,
/// otherwise its identifier.
pub(crate) fn document_label(document: &dyn Document, id: &DocumentId) -> String {
    document
        .path()
        .map_or_else(|| id.to_string(), |path| path.display().to_string())
}
