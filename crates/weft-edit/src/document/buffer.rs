//! In-memory text buffer with checkpointed undo history.
//!
//! The buffer keeps its content as a single string plus a table of line start
//! offsets. Every mutation is recorded as a [`Change`] so the buffer can undo
//! individual units, revert to a checkpoint, or collapse a run of changes
//! into one undo unit.

use std::path::{Path, PathBuf};

use super::{Checkpoint, Document};
use crate::edit::{Position, TextRange};

/// One recorded replacement, stored with enough context to reverse it.
#[derive(Debug, Clone)]
struct Change {
    /// Byte offset where the replacement starts.
    offset: usize,
    /// Text that was removed.
    removed: String,
    /// Text that was inserted.
    inserted: String,
}

/// Active checkpoint and the history length it refers to.
#[derive(Debug, Clone, Copy)]
struct Mark {
    checkpoint: Checkpoint,
    history_len: usize,
}

/// Mutable document content with undo history.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    path: Option<PathBuf>,
    text: String,
    line_starts: Vec<usize>,
    changes: Vec<Change>,
    /// Indices into `changes` where each undo unit begins, ascending.
    unit_starts: Vec<usize>,
    marks: Vec<Mark>,
    next_checkpoint: u64,
    saved_text: String,
}

impl TextBuffer {
    /// Creates a buffer with no backing file.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            path: None,
            line_starts: compute_line_starts(&text),
            saved_text: text.clone(),
            text,
            changes: Vec::new(),
            unit_starts: Vec::new(),
            marks: Vec::new(),
            next_checkpoint: 0,
        }
    }

    /// Creates a buffer backed by `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let mut buffer = Self::new(text);
        buffer.path = Some(path.into());
        buffer
    }

    /// Current content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of rows, counting a trailing empty row after a final newline.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Number of undo units currently recorded.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.unit_starts.len()
    }

    /// Returns true when the content differs from the last saved state.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.text != self.saved_text
    }

    /// Records the current content as saved.
    pub fn mark_saved(&mut self) {
        self.saved_text.clone_from(&self.text);
    }

    /// Reverses the most recent undo unit.
    ///
    /// Checkpoints that refer to history removed by the undo are dropped.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(start) = self.unit_starts.pop() else {
            return false;
        };
        self.rewind_to(start);
        self.marks.retain(|mark| mark.history_len <= start);
        true
    }

    /// Byte offset of `position`, clipped to the buffer.
    ///
    /// Rows past the end clip to the end of the last row. Columns past the
    /// row end clip to the row end, and a column between the halves of a
    /// surrogate pair clips to the start of that character.
    fn position_to_offset(&self, position: Position) -> usize {
        let last_row = self.line_starts.len().saturating_sub(1);
        let row = usize::try_from(position.line).unwrap_or(usize::MAX);
        if row > last_row {
            return self.line_content_end(last_row);
        }
        let Some((start, content)) = self.row_content(row) else {
            return self.text.len();
        };

        let column = usize::try_from(position.column).unwrap_or(usize::MAX);
        let mut units = 0;
        for (index, character) in content.char_indices() {
            units += character.len_utf16();
            if units > column {
                return start + index;
            }
        }
        start + content.len()
    }

    /// Start offset and content of `row`, without its line terminator.
    fn row_content(&self, row: usize) -> Option<(usize, &str)> {
        let start = *self.line_starts.get(row)?;
        let content = self.text.get(start..self.line_content_end(row))?;
        Some((start, content))
    }

    /// Byte offset of the end of `row`'s content, before any line terminator.
    fn line_content_end(&self, row: usize) -> usize {
        let line_end = self
            .line_starts
            .get(row + 1)
            .copied()
            .unwrap_or(self.text.len());
        let bytes = self.text.as_bytes();
        let line_start = self.line_starts.get(row).copied().unwrap_or(0);
        if line_end > line_start && bytes.get(line_end - 1) == Some(&b'\n') {
            if line_end - 1 > line_start && bytes.get(line_end - 2) == Some(&b'\r') {
                line_end - 2
            } else {
                line_end - 1
            }
        } else {
            line_end
        }
    }

    fn replace(&mut self, start: usize, end: usize, text: &str) -> Change {
        let removed = self.text.get(start..end).unwrap_or_default().to_owned();
        self.text.replace_range(start..end, text);
        self.line_starts = compute_line_starts(&self.text);
        Change {
            offset: start,
            removed,
            inserted: text.to_owned(),
        }
    }

    /// Reverses recorded changes until only `history_len` remain.
    fn rewind_to(&mut self, history_len: usize) {
        while self.changes.len() > history_len {
            let Some(change) = self.changes.pop() else {
                break;
            };
            let end = change.offset + change.inserted.len();
            self.text.replace_range(change.offset..end, &change.removed);
        }
        self.line_starts = compute_line_starts(&self.text);
        self.unit_starts.retain(|start| *start < history_len);
    }

    fn mark_index(&self, checkpoint: Checkpoint) -> Option<usize> {
        self.marks
            .iter()
            .position(|mark| mark.checkpoint == checkpoint)
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Document for TextBuffer {
    fn create_checkpoint(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint::from_raw(self.next_checkpoint);
        self.next_checkpoint += 1;
        self.marks.push(Mark {
            checkpoint,
            history_len: self.changes.len(),
        });
        checkpoint
    }

    fn set_text_in_range(&mut self, range: TextRange, text: &str) {
        let start = self.position_to_offset(range.start);
        let end = self.position_to_offset(range.end).max(start);
        if start == end && text.is_empty() {
            return;
        }
        let change = self.replace(start, end, text);
        self.unit_starts.push(self.changes.len());
        self.changes.push(change);
    }

    fn line_length_for_row(&self, row: u32) -> Option<u32> {
        let (_, content) = self.row_content(usize::try_from(row).ok()?)?;
        u32::try_from(content.encode_utf16().count()).ok()
    }

    fn splits_character(&self, position: Position) -> bool {
        let Some((_, content)) = usize::try_from(position.line)
            .ok()
            .and_then(|row| self.row_content(row))
        else {
            return false;
        };
        let column = usize::try_from(position.column).unwrap_or(usize::MAX);
        let mut units = 0;
        for character in content.chars() {
            let next = units + character.len_utf16();
            if next > column {
                return units < column;
            }
            units = next;
        }
        false
    }

    fn group_changes_since_checkpoint(&mut self, checkpoint: Checkpoint) -> bool {
        let Some(index) = self.mark_index(checkpoint) else {
            return false;
        };
        let history_len = self.marks.get(index).map_or(0, |mark| mark.history_len);
        self.unit_starts.retain(|start| *start < history_len);
        if self.changes.len() > history_len {
            self.unit_starts.push(history_len);
        }
        true
    }

    fn revert_to_checkpoint(&mut self, checkpoint: Checkpoint) -> bool {
        let Some(index) = self.mark_index(checkpoint) else {
            return false;
        };
        let history_len = self.marks.get(index).map_or(0, |mark| mark.history_len);
        self.rewind_to(history_len);
        self.marks.truncate(index);
        true
    }

    fn forget_checkpoint(&mut self, checkpoint: Checkpoint) {
        if let Some(index) = self.mark_index(checkpoint) {
            self.marks.remove(index);
        }
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Computes the byte offset of each line start.
///
/// Handles both LF and CRLF terminators: a line always starts after `\n`.
fn compute_line_starts(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (idx, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            offsets.push(idx + 1);
        }
    }
    offsets
}
