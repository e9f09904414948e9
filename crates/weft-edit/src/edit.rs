//! Types describing text edits and the documents they target.
//!
//! These types form the text half of a workspace edit. Positions are
//! expressed in the coordinates of the document as it was when the edit batch
//! was produced; the applier is responsible for ordering edits so those
//! coordinates stay valid while the buffer changes underneath them.

use std::fmt;
use std::path::PathBuf;

use url::Url;

/// A position within a document.
///
/// Uses zero-based line (row) and column offsets. Column offsets count UTF-16
/// code units within the line, the LSP default position encoding. Positions
/// order lexicographically by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (zero-based).
    pub line: u32,
    /// Column offset (zero-based, UTF-16 code units).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A range within a document, defined by start and end positions.
///
/// Ranges order by start position, then end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextRange {
    /// Start of the range (inclusive).
    pub start: Position,
    /// End of the range (exclusive).
    pub end: Position,
}

impl TextRange {
    /// Creates a new range between two positions.
    ///
    /// Reversed endpoints are swapped so that `start <= end` always holds.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Creates a zero-length range at the given position.
    #[must_use]
    pub const fn point(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns true when the range covers no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

/// A single text replacement within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Range being replaced, in original document coordinates.
    range: TextRange,
    /// Replacement text.
    new_text: String,
}

impl TextEdit {
    /// Builds a text edit from a range and replacement text.
    #[must_use]
    pub fn new(range: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Builds a text edit from positions and replacement text.
    #[must_use]
    pub fn from_positions(start: Position, end: Position, new_text: impl Into<String>) -> Self {
        Self::new(TextRange::new(start, end), new_text)
    }

    /// Creates an insertion at the specified position.
    #[must_use]
    pub fn insert_at(position: Position, new_text: impl Into<String>) -> Self {
        Self::new(TextRange::point(position), new_text)
    }

    /// Creates a deletion spanning the given range.
    #[must_use]
    pub fn delete_range(start: Position, end: Position) -> Self {
        Self::new(TextRange::new(start, end), String::new())
    }

    /// Range being replaced.
    #[must_use]
    pub const fn range(&self) -> TextRange {
        self.range
    }

    /// Replacement text.
    #[must_use]
    pub fn new_text(&self) -> &str {
        &self.new_text
    }
}

/// Identifier of a document, usually a `file://` URI.
///
/// Identifiers are compared verbatim; no URI normalisation is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds a `file://` identifier for an absolute path.
    ///
    /// Returns `None` when the path is relative or cannot be expressed as a
    /// URL.
    #[must_use]
    pub fn from_file_path(path: &std::path::Path) -> Option<Self> {
        Url::from_file_path(path)
            .ok()
            .map(|url| Self(String::from(url)))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves a `file://` identifier to a local path.
    #[must_use]
    pub fn to_file_path(&self) -> Option<PathBuf> {
        let url = Url::parse(&self.0).ok()?;
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Edits destined for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEditGroup {
    document: DocumentId,
    /// Version the edits were computed against. Informational only.
    version: Option<i32>,
    edits: Vec<TextEdit>,
}

impl DocumentEditGroup {
    /// Creates a group of edits for a document.
    #[must_use]
    pub fn new(document: DocumentId, version: Option<i32>, edits: Vec<TextEdit>) -> Self {
        Self {
            document,
            version,
            edits,
        }
    }

    /// Creates a group whose document version is unknown.
    #[must_use]
    pub fn unversioned(document: DocumentId, edits: Vec<TextEdit>) -> Self {
        Self::new(document, None, edits)
    }

    /// Identifier of the targeted document.
    #[must_use]
    pub const fn document(&self) -> &DocumentId {
        &self.document
    }

    /// Version the edits were computed against, if the producer supplied one.
    #[must_use]
    pub const fn version(&self) -> Option<i32> {
        self.version
    }

    /// Edits to apply.
    #[must_use]
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }
}
