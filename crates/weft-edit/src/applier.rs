//! Application of a batch of text edits to one live document.
//!
//! Edits carry positions in the coordinates of the unmodified document.
//! Applying them from the end of the document towards its start keeps the
//! positions of the edits not yet applied valid.

use tracing::warn;

use crate::document::{Checkpoint, Document, document_label};
use crate::edit::{DocumentId, TextEdit};
use crate::error::WorkspaceEditError;

/// Applies `edits` to `document` as a single undo unit.
///
/// A checkpoint is taken before anything changes. On success every mutation
/// made since that checkpoint is grouped and the checkpoint is returned so a
/// caller can still revert the whole batch. On failure the document is
/// restored to the checkpoint before the error is returned.
///
/// # Errors
///
/// Returns [`WorkspaceEditError::EditConflict`] when two edits overlap and
/// [`WorkspaceEditError::EditRange`] when an edit starts outside the current
/// content.
pub fn apply_edits(
    document: &mut dyn Document,
    id: &DocumentId,
    edits: &[TextEdit],
) -> Result<Checkpoint, WorkspaceEditError> {
    let checkpoint = document.create_checkpoint();

    if let Err(error) = apply_in_reverse(document, id, edits) {
        if !document.revert_to_checkpoint(checkpoint) {
            warn!(
                target: "weft::applier",
                event = "revert_failed",
                document = %id,
                %checkpoint,
                "document rejected its own checkpoint"
            );
        }
        return Err(error);
    }

    document.group_changes_since_checkpoint(checkpoint);
    Ok(checkpoint)
}

fn apply_in_reverse(
    document: &mut dyn Document,
    id: &DocumentId,
    edits: &[TextEdit],
) -> Result<(), WorkspaceEditError> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|left, right| right.range().cmp(&left.range()));

    let mut previous: Option<&TextEdit> = None;
    for edit in ordered {
        let range = edit.range();
        if let Some(later) = previous
            && range.end > later.range().start
        {
            return Err(WorkspaceEditError::conflict(document_label(document, id)));
        }

        let start = range.start;
        let fits = document
            .line_length_for_row(start.line)
            .is_some_and(|length| start.column <= length)
            && !document.splits_character(start);
        if !fits {
            return Err(WorkspaceEditError::out_of_range(
                document_label(document, id),
                start.line,
                start.column,
            ));
        }

        document.set_text_in_range(range, edit.new_text());
        previous = Some(edit);
    }
    Ok(())
}
