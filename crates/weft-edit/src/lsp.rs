//! Conversion from Language Server Protocol workspace edits.
//!
//! LSP character offsets use the protocol's default `utf-16` position
//! encoding, which is also the column unit of [`Position`]; they are carried
//! over unchanged and resolved against the live line by the document.

use lsp_types::{
    DocumentChangeOperation, DocumentChanges, OneOf, ResourceOp, TextDocumentEdit, Uri,
};

use crate::edit::{DocumentEditGroup, DocumentId, Position, TextEdit};
use crate::resource::{CreateOptions, DeleteOptions, RenameOptions, ResourceOperation};
use crate::workspace_edit::{DocumentChange, WorkspaceEdit};

impl From<lsp_types::WorkspaceEdit> for WorkspaceEdit {
    /// `document_changes` wins when present. The `changes` map has no
    /// inherent order, so its entries are sorted by URI to keep application
    /// order deterministic.
    fn from(edit: lsp_types::WorkspaceEdit) -> Self {
        if let Some(document_changes) = edit.document_changes {
            let changes: Vec<DocumentChange> = match document_changes {
                DocumentChanges::Edits(edits) => edits.into_iter().map(convert_document_edit).collect(),
                DocumentChanges::Operations(operations) => operations
                    .into_iter()
                    .map(|operation| match operation {
                        DocumentChangeOperation::Edit(edit) => convert_document_edit(edit),
                        DocumentChangeOperation::Op(op) => {
                            DocumentChange::Resource(convert_resource_op(op))
                        }
                    })
                    .collect(),
            };
            return Self::DocumentChanges(changes);
        }

        let mut entries: Vec<_> = edit
            .changes
            .unwrap_or_default()
            .into_iter()
            .map(|(uri, edits)| {
                (
                    document_id(&uri),
                    edits.into_iter().map(convert_text_edit).collect(),
                )
            })
            .collect();
        entries.sort_by(|(left, _), (right, _)| left.cmp(right));
        Self::Changes(entries)
    }
}

fn document_id(uri: &Uri) -> DocumentId {
    DocumentId::new(uri.as_str())
}

const fn convert_position(position: lsp_types::Position) -> Position {
    Position::new(position.line, position.character)
}

fn convert_text_edit(edit: lsp_types::TextEdit) -> TextEdit {
    TextEdit::from_positions(
        convert_position(edit.range.start),
        convert_position(edit.range.end),
        edit.new_text,
    )
}

fn convert_document_edit(edit: TextDocumentEdit) -> DocumentChange {
    let edits = edit
        .edits
        .into_iter()
        .map(|edit| match edit {
            OneOf::Left(plain) => convert_text_edit(plain),
            OneOf::Right(annotated) => convert_text_edit(annotated.text_edit),
        })
        .collect();
    DocumentChange::Edit(DocumentEditGroup::new(
        document_id(&edit.text_document.uri),
        edit.text_document.version,
        edits,
    ))
}

fn convert_resource_op(op: ResourceOp) -> ResourceOperation {
    match op {
        ResourceOp::Create(create) => {
            let options = create.options.as_ref();
            ResourceOperation::create(
                document_id(&create.uri),
                CreateOptions {
                    ignore_if_exists: options.is_some_and(|o| o.ignore_if_exists == Some(true)),
                    overwrite: options.is_some_and(|o| o.overwrite == Some(true)),
                },
            )
        }
        ResourceOp::Rename(rename) => {
            let options = rename.options.as_ref();
            ResourceOperation::rename(
                document_id(&rename.old_uri),
                document_id(&rename.new_uri),
                RenameOptions {
                    ignore_if_exists: options.is_some_and(|o| o.ignore_if_exists == Some(true)),
                    overwrite: options.is_some_and(|o| o.overwrite == Some(true)),
                },
            )
        }
        ResourceOp::Delete(delete) => {
            let options = delete.options.as_ref();
            ResourceOperation::delete(
                document_id(&delete.uri),
                DeleteOptions {
                    recursive: options.is_some_and(|o| o.recursive == Some(true)),
                    ignore_if_not_exists: options.is_some_and(|o| o.ignore_if_not_exists == Some(true)),
                },
            )
        }
    }
}
