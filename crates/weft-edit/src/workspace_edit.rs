//! Workspace edits and their canonical ordered form.

use crate::edit::{DocumentEditGroup, DocumentId, TextEdit};
use crate::resource::ResourceOperation;

/// One entry of a normalised workspace edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentChange {
    /// Text edits for a single document.
    Edit(DocumentEditGroup),
    /// A filesystem action.
    Resource(ResourceOperation),
}

impl From<DocumentEditGroup> for DocumentChange {
    fn from(group: DocumentEditGroup) -> Self {
        Self::Edit(group)
    }
}

impl From<ResourceOperation> for DocumentChange {
    fn from(operation: ResourceOperation) -> Self {
        Self::Resource(operation)
    }
}

/// A batch of document changes to be applied as one unit.
///
/// Producers either send a plain mapping from document to edits, or an
/// explicit ordered list that may interleave resource operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEdit {
    /// Document to edits mapping, in insertion order.
    Changes(Vec<(DocumentId, Vec<TextEdit>)>),
    /// Explicit ordered sequence of changes.
    DocumentChanges(Vec<DocumentChange>),
}

impl Default for WorkspaceEdit {
    fn default() -> Self {
        Self::DocumentChanges(Vec::new())
    }
}

impl WorkspaceEdit {
    /// Converts the edit into its canonical ordered sequence.
    ///
    /// The explicit form is returned unchanged. Mapping entries become
    /// unversioned edit groups in insertion order.
    #[must_use]
    pub fn normalize(self) -> Vec<DocumentChange> {
        match self {
            Self::DocumentChanges(changes) => changes,
            Self::Changes(changes) => changes
                .into_iter()
                .map(|(document, edits)| {
                    DocumentChange::Edit(DocumentEditGroup::unversioned(document, edits))
                })
                .collect(),
        }
    }
}
