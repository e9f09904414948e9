//! Document stores backed by memory and by the local filesystem.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::{Document, DocumentStore, SharedDocument, TextBuffer};
use crate::edit::DocumentId;
use crate::error::ResolutionError;

type BufferMap = HashMap<DocumentId, Arc<Mutex<TextBuffer>>>;

fn lock_map(map: &Mutex<BufferMap>) -> MutexGuard<'_, BufferMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store holding documents registered up front.
///
/// Identifiers are arbitrary strings; nothing is read from disk.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<BufferMap>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document, replacing any existing one with the same id.
    pub fn insert(&self, id: impl Into<DocumentId>, text: impl Into<String>) -> Arc<Mutex<TextBuffer>> {
        let buffer = Arc::new(Mutex::new(TextBuffer::new(text)));
        lock_map(&self.documents).insert(id.into(), Arc::clone(&buffer));
        buffer
    }

    /// Returns the buffer registered under `id`.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<Arc<Mutex<TextBuffer>>> {
        lock_map(&self.documents).get(id).cloned()
    }

    /// Current text of the document registered under `id`.
    #[must_use]
    pub fn text(&self, id: &DocumentId) -> Option<String> {
        self.get(id).map(|buffer| {
            buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .text()
                .to_owned()
        })
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn resolve(&self, id: &DocumentId) -> Result<SharedDocument, ResolutionError> {
        let buffer = self
            .get(id)
            .ok_or_else(|| ResolutionError::NotFound { document: id.clone() })?;
        let shared: SharedDocument = buffer;
        Ok(shared)
    }
}

/// Failure while writing a modified buffer back to disk.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Writing the buffer's file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Store that opens `file://` documents from disk on first use.
///
/// Opened buffers are cached so that repeated resolutions observe earlier
/// edits. Nothing is written back until [`FileDocumentStore::save_modified`]
/// is called.
#[derive(Debug, Default)]
pub struct FileDocumentStore {
    documents: Mutex<BufferMap>,
}

impl FileDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached buffer for `id`, if it has been opened.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<Arc<Mutex<TextBuffer>>> {
        lock_map(&self.documents).get(id).cloned()
    }

    /// Writes every buffer whose content changed since it was opened or last
    /// saved, returning how many files were written.
    ///
    /// Each buffer is first written to a temporary file next to its target.
    /// Targets are only replaced once every temporary file has been written,
    /// so a write failure leaves all files on disk untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] for the first file that cannot be written or
    /// moved into place.
    pub fn save_modified(&self) -> Result<usize, SaveError> {
        let buffers: Vec<_> = lock_map(&self.documents).values().cloned().collect();
        let mut staged = Vec::new();
        for buffer in &buffers {
            let guard = buffer.lock().unwrap_or_else(PoisonError::into_inner);
            if !guard.is_modified() {
                continue;
            }
            let Some(path) = guard.path().map(Path::to_path_buf) else {
                continue;
            };
            let temp_file = stage_file(&path, guard.text())?;
            staged.push((guard, path, temp_file));
        }

        let saved = staged.len();
        for (mut guard, path, temp_file) in staged {
            temp_file.persist(&path).map_err(|error| SaveError::Write {
                path: path.clone(),
                source: error.error,
            })?;
            guard.mark_saved();
            debug!(target: "weft::store", event = "document_saved", path = %path.display());
        }
        Ok(saved)
    }

    fn open(path: &Path) -> Result<TextBuffer, ResolutionError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(TextBuffer::with_path(path, text)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Ok(TextBuffer::with_path(path, String::new()))
            }
            Err(source) => Err(ResolutionError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl DocumentStore for FileDocumentStore {
    fn resolve(&self, id: &DocumentId) -> Result<SharedDocument, ResolutionError> {
        let mut documents = lock_map(&self.documents);
        if let Some(buffer) = documents.get(id) {
            let shared: SharedDocument = buffer.clone();
            return Ok(shared);
        }

        let path = id
            .to_file_path()
            .ok_or_else(|| ResolutionError::UnsupportedId { document: id.clone() })?;
        let buffer = Arc::new(Mutex::new(Self::open(&path)?));
        documents.insert(id.clone(), Arc::clone(&buffer));
        debug!(target: "weft::store", event = "document_opened", path = %path.display());
        let shared: SharedDocument = buffer;
        Ok(shared)
    }
}

/// Writes content to a temporary file in the target's directory.
///
/// The file is removed again if it is dropped without being persisted.
fn stage_file(path: &Path, content: &str) -> Result<NamedTempFile, SaveError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let write_error = |source: io::Error| SaveError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_error)?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(write_error)?;
    temp_file.flush().map_err(write_error)?;
    Ok(temp_file)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::edit::{Position, TextRange};

    fn file_id(path: &Path) -> DocumentId {
        DocumentId::from_file_path(path).expect("absolute temp path")
    }

    #[test]
    fn memory_store_rejects_unknown_ids() {
        let store = MemoryDocumentStore::new();
        store.insert("docA", "text");

        assert!(store.resolve(&DocumentId::new("docA")).is_ok());
        let error = store
            .resolve(&DocumentId::new("docB"))
            .err()
            .expect("docB is not registered");
        assert!(matches!(error, ResolutionError::NotFound { .. }));
    }

    #[test]
    fn memory_store_hands_out_the_registered_buffer() {
        let store = MemoryDocumentStore::new();
        store.insert("docA", "abc");
        let id = DocumentId::new("docA");

        let document = store.resolve(&id).expect("resolve docA");
        document
            .lock()
            .expect("lock document")
            .set_text_in_range(TextRange::point(Position::new(0, 3)), "d");

        assert_eq!(store.text(&id).as_deref(), Some("abcd"));
    }

    #[test]
    fn file_store_rejects_non_file_ids() {
        let store = FileDocumentStore::new();
        let error = store
            .resolve(&DocumentId::new("untitled:Untitled-1"))
            .err()
            .expect("untitled documents have no path");
        assert!(matches!(error, ResolutionError::UnsupportedId { .. }));
    }

    #[test]
    fn file_store_caches_opened_buffers() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("cached.txt");
        fs::write(&path, "one").expect("write file");
        let store = FileDocumentStore::new();
        let id = file_id(&path);

        let first = store.resolve(&id).expect("first resolve");
        first
            .lock()
            .expect("lock document")
            .set_text_in_range(TextRange::point(Position::new(0, 3)), " two");
        let second = store.resolve(&id).expect("second resolve");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            fs::read_to_string(&path).expect("read file"),
            "one",
            "edits stay in memory until saved"
        );
    }

    #[test]
    fn save_modified_writes_changed_buffers_only() {
        let dir = TempDir::new().expect("create temp dir");
        let edited = dir.path().join("edited.txt");
        let untouched = dir.path().join("untouched.txt");
        fs::write(&edited, "before").expect("write edited");
        fs::write(&untouched, "same").expect("write untouched");
        let store = FileDocumentStore::new();

        let document = store.resolve(&file_id(&edited)).expect("resolve edited");
        store.resolve(&file_id(&untouched)).expect("resolve untouched");
        document.lock().expect("lock document").set_text_in_range(
            TextRange::new(Position::new(0, 0), Position::new(0, 6)),
            "after",
        );

        assert_eq!(store.save_modified().expect("save"), 1);
        assert_eq!(fs::read_to_string(&edited).expect("read edited"), "after");
        assert_eq!(fs::read_to_string(&untouched).expect("read untouched"), "same");
        assert_eq!(store.save_modified().expect("second save"), 0);
    }

    #[test]
    fn failed_write_leaves_every_file_untouched() {
        let dir = TempDir::new().expect("create temp dir");
        let existing = dir.path().join("existing.txt");
        let orphan = dir.path().join("no-such-dir").join("orphan.txt");
        fs::write(&existing, "original").expect("write existing");
        let store = FileDocumentStore::new();

        for path in [&existing, &orphan] {
            store
                .resolve(&file_id(path))
                .expect("resolve document")
                .lock()
                .expect("lock document")
                .set_text_in_range(TextRange::point(Position::new(0, 0)), "edited ");
        }

        let error = store.save_modified().expect_err("orphan has no parent directory");

        assert!(matches!(error, SaveError::Write { ref path, .. } if path == &orphan));
        assert_eq!(fs::read_to_string(&existing).expect("read existing"), "original");
        let leftovers = fs::read_dir(dir.path()).expect("list temp dir").count();
        assert_eq!(leftovers, 1, "staged files are cleaned up");
    }

    #[test]
    fn missing_files_open_empty_and_save_as_new_files() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("new.txt");
        let store = FileDocumentStore::new();

        let document = store.resolve(&file_id(&path)).expect("resolve new file");
        assert_eq!(document.lock().expect("lock").line_length_for_row(0), Some(0));
        document
            .lock()
            .expect("lock document")
            .set_text_in_range(TextRange::point(Position::new(0, 0)), "fresh\n");

        store.save_modified().expect("save");
        assert_eq!(fs::read_to_string(&path).expect("read new file"), "fresh\n");
    }

    #[test]
    fn unreadable_paths_fail_resolution() {
        let dir = TempDir::new().expect("create temp dir");
        let store = FileDocumentStore::new();

        let error = store
            .resolve(&file_id(dir.path()))
            .err()
            .expect("directories cannot be read as text");
        assert!(matches!(error, ResolutionError::Read { .. }));
    }
}
