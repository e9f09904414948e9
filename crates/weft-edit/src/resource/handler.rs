//! Executes resource operations against a [`FileSystem`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{
    CreateOptions, DeleteOptions, EntryKind, FileSystem, LocalFileSystem, RenameOptions,
    ResourceOperation, ResourceOperationKind,
};
use crate::edit::DocumentId;
use crate::error::ResourceOperationError;

/// Applies create, rename, and delete operations.
#[derive(Clone)]
pub struct ResourceOperationHandler {
    filesystem: Arc<dyn FileSystem>,
    create_parent_directories: bool,
}

impl Default for ResourceOperationHandler {
    fn default() -> Self {
        Self::new(Arc::new(LocalFileSystem))
    }
}

impl std::fmt::Debug for ResourceOperationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceOperationHandler")
            .field("create_parent_directories", &self.create_parent_directories)
            .finish_non_exhaustive()
    }
}

impl ResourceOperationHandler {
    /// Creates a handler that leaves missing parent directories alone.
    #[must_use]
    pub fn new(filesystem: Arc<dyn FileSystem>) -> Self {
        Self {
            filesystem,
            create_parent_directories: false,
        }
    }

    /// Creates missing parent directories before create and rename.
    #[must_use]
    pub const fn with_parent_directories(mut self, enabled: bool) -> Self {
        self.create_parent_directories = enabled;
        self
    }

    /// Performs `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceOperationError`] when the operation's options forbid
    /// it, a URI does not name a local file, or the filesystem call fails.
    pub fn handle(&self, operation: &ResourceOperation) -> Result<(), ResourceOperationError> {
        debug!(
            target: "weft::resource",
            event = "resource_operation",
            operation = %operation.kind(),
            target_uri = %operation.target(),
        );
        match operation {
            ResourceOperation::Create { uri, options } => self.create(uri, *options),
            ResourceOperation::Rename {
                old_uri,
                new_uri,
                options,
            } => self.rename(old_uri, new_uri, *options),
            ResourceOperation::Delete { uri, options } => self.delete(uri, *options),
        }
    }

    fn create(&self, uri: &DocumentId, options: CreateOptions) -> Result<(), ResourceOperationError> {
        const KIND: ResourceOperationKind = ResourceOperationKind::Create;
        let path = local_path(KIND, uri)?;
        let exists = self.entry_kind(KIND, &path)?.exists();
        if exists && options.ignore_if_exists && !options.overwrite {
            return Ok(());
        }

        self.ensure_parent(KIND, &path)?;
        self.filesystem
            .create_empty_file(&path)
            .map_err(|error| ResourceOperationError::io(KIND, &path, &error))
    }

    fn rename(
        &self,
        old_uri: &DocumentId,
        new_uri: &DocumentId,
        options: RenameOptions,
    ) -> Result<(), ResourceOperationError> {
        const KIND: ResourceOperationKind = ResourceOperationKind::Rename;
        let from = local_path(KIND, old_uri)?;
        let to = local_path(KIND, new_uri)?;

        if self.entry_kind(KIND, &to)?.exists() && !options.overwrite {
            if options.ignore_if_exists {
                return Ok(());
            }
            return Err(ResourceOperationError::new(KIND, "Target exists"));
        }

        self.ensure_parent(KIND, &to)?;
        self.filesystem
            .rename(&from, &to)
            .map_err(|error| ResourceOperationError::io(KIND, &from, &error))
    }

    fn delete(&self, uri: &DocumentId, options: DeleteOptions) -> Result<(), ResourceOperationError> {
        const KIND: ResourceOperationKind = ResourceOperationKind::Delete;
        let path = local_path(KIND, uri)?;

        let result = match self.entry_kind(KIND, &path)? {
            EntryKind::Missing if options.ignore_if_not_exists => return Ok(()),
            EntryKind::Missing => {
                return Err(ResourceOperationError::new(KIND, "Target doesn't exist"));
            }
            EntryKind::Directory if options.recursive => self.filesystem.remove_dir_all(&path),
            EntryKind::Directory => self.filesystem.remove_dir(&path),
            EntryKind::File => self.filesystem.remove_file(&path),
        };
        result.map_err(|error| ResourceOperationError::io(KIND, &path, &error))
    }

    fn entry_kind(
        &self,
        kind: ResourceOperationKind,
        path: &Path,
    ) -> Result<EntryKind, ResourceOperationError> {
        self.filesystem
            .entry_kind(path)
            .map_err(|error| ResourceOperationError::io(kind, path, &error))
    }

    fn ensure_parent(
        &self,
        kind: ResourceOperationKind,
        path: &Path,
    ) -> Result<(), ResourceOperationError> {
        if !self.create_parent_directories {
            return Ok(());
        }
        let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) else {
            return Ok(());
        };
        if self.entry_kind(kind, parent)?.exists() {
            return Ok(());
        }
        self.filesystem
            .create_dir_all(parent)
            .map_err(|error| ResourceOperationError::io(kind, parent, &error))
    }
}

fn local_path(kind: ResourceOperationKind, uri: &DocumentId) -> Result<PathBuf, ResourceOperationError> {
    uri.to_file_path()
        .ok_or_else(|| ResourceOperationError::new(kind, format!("'{uri}' is not a local file URI")))
}
